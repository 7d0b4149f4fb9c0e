//! Grading policy.
//!
//! Maps an average mark onto a letter grade and decides pass/fail. Thresholds are
//! right-inclusive and evaluated from the top band down. Inputs outside 0..=100 are
//! classified as-is; range checking belongs to whoever collects the marks.

/// Minimum average (inclusive) required to pass.
pub const PASS_MARK: f64 = 40.0;

/// Letter grade bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    /// 90 and above.
    APlus,
    /// 80 to below 90.
    A,
    /// 70 to below 80.
    B,
    /// 60 to below 70.
    C,
    /// 50 to below 60.
    D,
    /// 40 to below 50.
    E,
    /// Below 40.
    F,
}

impl Grade {
    /// Every grade, best first. Reports enumerate buckets in this order.
    pub const ALL: [Grade; 7] = [
        Grade::APlus,
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
    ];

    /// Classify an average mark.
    ///
    /// NaN falls through every comparison and lands on [`Grade::F`].
    pub fn from_average(average: f64) -> Self {
        if average >= 90.0 {
            Grade::APlus
        } else if average >= 80.0 {
            Grade::A
        } else if average >= 70.0 {
            Grade::B
        } else if average >= 60.0 {
            Grade::C
        } else if average >= 50.0 {
            Grade::D
        } else if average >= PASS_MARK {
            Grade::E
        } else {
            Grade::F
        }
    }

    /// The printed letter for this grade.
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `pad` so that width/alignment specifiers in report templates apply.
        f.pad(self.as_str())
    }
}

/// Whether an average mark is a pass.
pub fn passed(average: f64) -> bool {
    average >= PASS_MARK
}
