use std::fmt;

/// Result of one pass through the load controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The catalog's completion marker was already set; nothing was written.
    Skipped,
    /// Every record was written.
    Loaded(usize),
    /// The write pass finished but this many records failed.
    PartialFailure(usize),
}

impl LoadOutcome {
    pub fn from_counts(written: usize, failed: usize) -> Self {
        if failed == 0 {
            LoadOutcome::Loaded(written)
        } else {
            LoadOutcome::PartialFailure(failed)
        }
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Skipped => write!(f, "skipped (catalog already indexed)"),
            LoadOutcome::Loaded(count) => write!(f, "loaded {count} record(s)"),
            LoadOutcome::PartialFailure(failed) => {
                write!(f, "partial failure ({failed} record(s) not written)")
            }
        }
    }
}
