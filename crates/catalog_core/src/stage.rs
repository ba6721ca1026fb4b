use std::fmt;

/// Phases of one pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    EnsureIndex,
    Extracting,
    Loading,
    Searching,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::EnsureIndex => "ensure-index",
            Stage::Extracting => "extract",
            Stage::Loading => "load",
            Stage::Searching => "search",
            Stage::Done => "done",
        };
        f.write_str(label)
    }
}
