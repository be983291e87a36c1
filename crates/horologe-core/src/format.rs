//! Digital readout formatting.

use crate::time::WallClockTime;

/// How the digital readout renders a time.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextStyle {
    /// Each component as `"<n> "`, joined with `":"`: `14 :30 :5 `.
    ///
    /// No zero padding, and a trailing space after the seconds.
    #[default]
    Legacy,
    /// `HH:MM:SS`, zero padded: `14:30:05`.
    ZeroPadded,
}

/// Renders the digital readout for `t`.
pub fn digital_time_text(t: WallClockTime, style: TextStyle) -> String {
    match style {
        TextStyle::Legacy => [t.hour(), t.minute(), t.second()]
            .iter()
            .map(|n| format!("{n} "))
            .collect::<Vec<_>>()
            .join(":"),
        TextStyle::ZeroPadded => {
            format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
        }
    }
}
