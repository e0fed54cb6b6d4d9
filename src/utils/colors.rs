/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Percentage color: at risk → red, perfect → green, otherwise reset.
pub fn color_for_percentage(pct: f64, risk_threshold: f64) -> &'static str {
    if pct < risk_threshold {
        RED
    } else if pct >= 100.0 {
        GREEN
    } else {
        RESET
    }
}
