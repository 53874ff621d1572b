use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub type LoopId = String;
pub type EntryId = String;
pub type IdeaId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopStatus {
    Open,
    Done,
}

/// An open commitment the user intends to close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loop {
    pub id: LoopId,
    pub title: String,
    #[serde(default)]
    pub criterion: String,
    pub status: LoopStatus,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
}

impl Loop {
    pub fn is_open(&self) -> bool {
        self.status == LoopStatus::Open
    }
}

/// A logged, completed action ("Beleg").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub output: String,
    pub fulfilled: bool,
}

/// A parked thought, deliberately not tracked as a loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: IdeaId,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Local>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Operator,
    Overload,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Operator => "operator",
            Mode::Overload => "overload",
        }
    }

    pub fn toggled(self) -> Mode {
        match self {
            Mode::Operator => Mode::Overload,
            Mode::Overload => Mode::Operator,
        }
    }

    /// Guidance lines shown next to the mode switch.
    pub fn guidance(self) -> &'static [&'static str] {
        match self {
            Mode::Operator => &[
                "Pick one open loop and close it.",
                "Log every finished action as an entry.",
                "Park new thoughts as ideas instead of opening loops.",
            ],
            Mode::Overload => &[
                "Stop opening new loops.",
                "Run one short focus block on the smallest open loop.",
                "Write down what is pressing, then step away for a moment.",
            ],
        }
    }
}
