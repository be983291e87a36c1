mod app;
mod face;
mod presenter;

use std::time::Duration;

use horologe_core::{ClockConfig, TextStyle};
use horologe_engine::logging::{init_logging, LoggingConfig};

use crate::app::Application;

fn main() {
    println!();
    println!("  ╔══════════════════════════════╗");
    println!("  ║        HOROLOGE v0.1         ║");
    println!("  ║  analog + digital wall clock ║");
    println!("  ╚══════════════════════════════╝");
    println!();

    init_logging(LoggingConfig::default());

    let result = Application::new()
        .title("Horologe")
        .size(320.0, 360.0)
        .font("body", load_font())
        .clock(clock_config(std::env::args().skip(1)))
        .run();

    if let Err(e) = result {
        eprintln!("horologe runtime error: {e:#}");
        std::process::exit(1);
    }
}

/// `--zero-padded` switches the readout to `HH:MM:SS`; `--no-animation` makes
/// the hands jump. Anything else is ignored with a warning.
fn clock_config(args: impl IntoIterator<Item = String>) -> ClockConfig {
    let mut config = ClockConfig::default();
    for arg in args {
        match arg.as_str() {
            "--zero-padded" => config.text_style = TextStyle::ZeroPadded,
            "--no-animation" => config.animation_duration = Duration::ZERO,
            other => log::warn!("ignoring unknown argument {other:?}"),
        }
    }
    config
}

/// First system font found in the usual locations; empty when none exists.
fn load_font() -> Vec<u8> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .unwrap_or_default()
}
