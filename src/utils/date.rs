use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a `YYYY-MM-DD` argument; `today` is accepted as a shortcut.
pub fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    if s.trim().eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_date("2024-05-01"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(parse_date("01/05/2024").is_none());
        assert!(matches!(parse_date_arg("2024-13-01"), Err(AppError::InvalidDate(_))));
    }
}
