use serde::{Deserialize, Serialize};

/// The closed set of countdown durations a task can carry. Serialized as the
/// label text the user picks from the timer keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerChoice {
    #[serde(rename = "10 min")]
    Min10,
    #[serde(rename = "15 min")]
    Min15,
    #[serde(rename = "20 min")]
    Min20,
    #[serde(rename = "30 min")]
    Min30,
}

/// Keyboard order: two rows of two.
pub const TIMER_CHOICES: [TimerChoice; 4] = [
    TimerChoice::Min10,
    TimerChoice::Min15,
    TimerChoice::Min20,
    TimerChoice::Min30,
];

impl TimerChoice {
    pub fn label(self) -> &'static str {
        match self {
            Self::Min10 => "10 min",
            Self::Min15 => "15 min",
            Self::Min20 => "20 min",
            Self::Min30 => "30 min",
        }
    }

    pub fn minutes(self) -> u64 {
        match self {
            Self::Min10 => 10,
            Self::Min15 => 15,
            Self::Min20 => 20,
            Self::Min30 => 30,
        }
    }

    /// Parses a duration label. Anything other than an exact label is
    /// rejected; there is no "unknown means zero wait" fallback.
    pub fn parse(text: &str) -> Option<Self> {
        TIMER_CHOICES
            .into_iter()
            .find(|choice| choice.label() == text.trim())
    }
}

/// A pending unit of work. The name doubles as the identifier; stored
/// documents keep the loose `task`/`timer` field names the store is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task")]
    pub name: String,
    #[serde(rename = "timer")]
    pub timer: TimerChoice,
    #[serde(default)]
    pub created_at: String,
}
