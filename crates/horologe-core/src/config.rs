use std::time::Duration;

use crate::format::TextStyle;

/// Clock behavior configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    /// Interval between ticks. One second for a wall clock.
    pub tick_period: Duration,

    /// How long each hand takes to rotate to a new reading.
    ///
    /// Zero disables animation: hands jump straight to the new angle.
    pub animation_duration: Duration,

    /// Digital readout style.
    pub text_style: TextStyle,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            animation_duration: Duration::from_millis(100),
            text_style: TextStyle::Legacy,
        }
    }
}
