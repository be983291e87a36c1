use std::fmt;

/// Errors produced by clock sampling and timer scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The host clock could not be read.
    ClockUnavailable(String),
    /// A component is outside its range (hour 0–23, minute/second 0–59).
    InvalidTime { hour: u32, minute: u32, second: u32 },
    /// A recurring timer was requested with a zero period.
    InvalidPeriod,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::ClockUnavailable(reason) => write!(f, "clock unavailable: {reason}"),
            ClockError::InvalidTime { hour, minute, second } => {
                write!(f, "invalid wall-clock time {hour}:{minute}:{second}")
            }
            ClockError::InvalidPeriod => write!(f, "timer period must be non-zero"),
        }
    }
}

impl std::error::Error for ClockError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_time_names_components() {
        let e = ClockError::InvalidTime { hour: 24, minute: 0, second: 7 };
        assert_eq!(e.to_string(), "invalid wall-clock time 24:0:7");
    }

    #[test]
    fn unavailable_carries_reason() {
        let e = ClockError::ClockUnavailable("rtc offline".into());
        assert!(e.to_string().contains("rtc offline"));
    }
}
