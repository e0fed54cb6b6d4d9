use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

fn invalid(msg: &str) -> AppError {
    AppError::InvalidRange(msg.to_string())
}

fn last_day_of_month(y: i32, m: u32) -> Option<NaiveDate> {
    let (ny, nm) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

/// First and last day covered by a single period token.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid("invalid year"))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid("invalid year"))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid("invalid year"))?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 => {
            let d1 = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d")
                .map_err(|_| invalid("invalid month"))?;
            let d2 =
                last_day_of_month(d1.year(), d1.month()).ok_or_else(|| invalid("invalid month"))?;
            Ok((d1, d2))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| invalid("invalid date"))?;
            Ok((d, d))
        }
        _ => Err(invalid("unsupported --range format")),
    }
}

/// Parse --range (year / month / day / interval).
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();
    match r.split_once(':') {
        Some((start_raw, end_raw)) => {
            let (start, end) = (start_raw.trim(), end_raw.trim());
            if start.len() != end.len() {
                return Err(invalid("start and end must have same format"));
            }
            let (d1, _) = period_bounds(start)?;
            let (_, d2) = period_bounds(end)?;
            if d1 > d2 {
                return Err(invalid("start is after end"));
            }
            Ok((d1, d2))
        }
        None => period_bounds(r),
    }
}
