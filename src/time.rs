use chrono::NaiveDateTime;
use chrono::Timelike;
use std::fmt::{Display, Formatter};

/// Sentinel travel time meaning "no path found".
///
/// All travel times handled by the engine are seconds encoded as `u32`,
/// with `UNREACHED` flowing through computations instead of an error.
pub const UNREACHED: u32 = u32::MAX;

/// Adds a duration to a travel time, saturating to `UNREACHED`.
pub fn clamp_add(time: u32, duration: u32) -> u32 {
    if time == UNREACHED {
        return UNREACHED;
    }
    time.checked_add(duration).unwrap_or(UNREACHED)
}

/// Number of seconds elapsed since the start of the day of `datetime`.
pub fn seconds_of_day(datetime: NaiveDateTime) -> u32 {
    datetime.time().num_seconds_from_midnight()
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, serde::Deserialize)]
#[serde(transparent)]
pub struct PositiveDuration {
    pub(crate) seconds: u32,
}

impl PositiveDuration {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> PositiveDuration {
        let total_seconds = seconds + 60 * minutes + 60 * 60 * hours;
        PositiveDuration {
            seconds: total_seconds,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

impl std::ops::Add for PositiveDuration {
    type Output = PositiveDuration;

    fn add(self, other: Self) -> Self::Output {
        PositiveDuration {
            seconds: self.seconds + other.seconds,
        }
    }
}

impl std::ops::Mul<u32> for PositiveDuration {
    type Output = PositiveDuration;

    fn mul(self, rhs: u32) -> Self::Output {
        PositiveDuration {
            seconds: self.seconds * rhs,
        }
    }
}
