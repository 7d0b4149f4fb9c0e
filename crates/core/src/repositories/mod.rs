//! Repository management modules.
//!
//! This module contains the student collection and the utilities its operations share.

mod helpers;
pub mod students;
