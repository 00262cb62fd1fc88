use std::fmt;

use serde::{Deserialize, Serialize};

/// Finish bracket a rank falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Winner,
    Podium,
    Top10,
    Top50,
    Finished,
}

impl Standing {
    pub const fn for_rank(rank: u32) -> Self {
        match rank {
            0 | 1 => Self::Winner,
            2..=3 => Self::Podium,
            4..=10 => Self::Top10,
            11..=50 => Self::Top50,
            _ => Self::Finished,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Winner => "WINNER!",
            Self::Podium => "PODIUM!",
            Self::Top10 => "TOP 10!",
            Self::Top50 => "TOP 50!",
            Self::Finished => "FINISHED!",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
