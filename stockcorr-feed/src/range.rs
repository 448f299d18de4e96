use crate::error::FeedError;
use serde::{Deserialize, Serialize};

/// Lookback window requested from the stock API.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimeRange {
    #[default]
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::FiveMinutes,
        TimeRange::FifteenMinutes,
        TimeRange::ThirtyMinutes,
        TimeRange::SixtyMinutes,
    ];

    pub fn minutes(&self) -> u32 {
        match self {
            TimeRange::FiveMinutes => 5,
            TimeRange::FifteenMinutes => 15,
            TimeRange::ThirtyMinutes => 30,
            TimeRange::SixtyMinutes => 60,
        }
    }
}

impl TryFrom<u32> for TimeRange {
    type Error = FeedError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.minutes() == minutes)
            .ok_or(FeedError::UnsupportedTimeRange(minutes))
    }
}

impl From<TimeRange> for u32 {
    fn from(value: TimeRange) -> Self {
        value.minutes()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m", self.minutes())
    }
}
