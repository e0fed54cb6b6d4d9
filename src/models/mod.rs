pub mod player;
pub mod record;
pub mod summary;

pub use player::{Category, CategoryFilter, RosterEntry};
pub use record::AttendanceRecord;
pub use summary::{SummaryBundle, Table};
