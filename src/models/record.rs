use chrono::NaiveDate;
use serde::Serialize;

/// Canonical "yes" token stored in the attendance log.
pub const YES: &str = "SÍ";
/// Canonical "no" token stored in the attendance log.
pub const NO: &str = "NO";

pub const COL_DATE: &str = "Fecha";
pub const COL_PLAYER: &str = "Jugadora";
pub const COL_ATTENDED: &str = "Asistió";
pub const COL_LATE: &str = "Llegó tarde";
pub const COL_COMMENT: &str = "Comentario";

/// Header written when a new attendance worksheet is created.
pub const LOG_HEADERS: [&str; 5] = [COL_DATE, COL_PLAYER, COL_ATTENDED, COL_LATE, COL_COMMENT];

pub fn yes_no(flag: bool) -> &'static str {
    if flag { YES } else { NO }
}

/// Case-insensitive read of a yes/no cell: only `SÍ` counts as true.
pub fn is_yes(cell: &str) -> bool {
    cell.trim().to_uppercase() == YES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub player: String,
    pub attended: bool,
    pub late: bool,
    pub comment: String,
}

impl AttendanceRecord {
    /// `late` is dropped when the player did not attend; comments are stored
    /// trimmed and upper-cased.
    pub fn new(date: NaiveDate, player: &str, attended: bool, late: bool, comment: &str) -> Self {
        Self {
            date,
            player: player.trim().to_string(),
            attended,
            late: attended && late,
            comment: comment.trim().to_uppercase(),
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Composite identity used by the upsert: (date string, trimmed player).
    pub fn key(&self) -> (String, String) {
        (self.date_str(), self.player.trim().to_string())
    }

    /// Value for one of the log columns, by canonical header name.
    pub fn cell(&self, column: &str) -> String {
        match column {
            COL_DATE => self.date_str(),
            COL_PLAYER => self.player.clone(),
            COL_ATTENDED => yes_no(self.attended).to_string(),
            COL_LATE => yes_no(self.late).to_string(),
            COL_COMMENT => self.comment.clone(),
            _ => String::new(),
        }
    }
}
