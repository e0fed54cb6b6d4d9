//! Upsert of submitted attendance into the persisted log.
//!
//! Rows are matched on the (date, player) composite key. Existing rows are
//! rewritten in place, unmatched keys are appended, and the two phases are
//! issued as at most two batched writes: updates first, then appends.

use crate::core::normalize::ColumnMap;
use crate::errors::{AppError, AppResult};
use crate::models::record::{AttendanceRecord, COL_DATE, COL_PLAYER, LOG_HEADERS};
use crate::sheets::{RowUpdate, SheetStore};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertReport {
    pub updated: usize,
    pub inserted: usize,
}

type Key = (String, String);

/// Submitted records keyed by (date, player): the last submission of a key
/// wins, and keys keep the order in which they were first submitted.
struct PendingRows<'a> {
    order: Vec<Key>,
    by_key: HashMap<Key, &'a AttendanceRecord>,
}

impl<'a> PendingRows<'a> {
    fn new(records: &'a [AttendanceRecord]) -> Self {
        let mut order = Vec::new();
        let mut by_key = HashMap::new();
        for rec in records {
            let key = rec.key();
            if by_key.insert(key.clone(), rec).is_none() {
                order.push(key);
            }
        }
        Self { order, by_key }
    }
}

/// Lay a record out according to the sheet's header. Unknown columns are
/// left blank; the row is never shorter than the header.
fn render_row(record: &AttendanceRecord, header: &[String], columns: &ColumnMap) -> Vec<String> {
    let mut row = vec![String::new(); header.len()];
    for name in LOG_HEADERS {
        if let Some(idx) = columns.index(name) {
            row[idx] = record.cell(name);
        }
    }
    row
}

pub fn upsert<S: SheetStore + ?Sized>(
    store: &mut S,
    sheet: &str,
    records: &[AttendanceRecord],
) -> AppResult<UpsertReport> {
    let rows = store.read_all_rows(sheet)?;

    let Some((header, existing)) = rows.split_first() else {
        return Err(AppError::Schema {
            sheet: sheet.to_string(),
            missing: vec![COL_DATE.to_string(), COL_PLAYER.to_string()],
        });
    };

    let columns = ColumnMap::resolve(header, &[COL_DATE, COL_PLAYER]).map_err(|missing| {
        AppError::Schema {
            sheet: sheet.to_string(),
            missing,
        }
    })?;

    if records.is_empty() {
        return Ok(UpsertReport::default());
    }

    let pending = PendingRows::new(records);
    let key_width = columns.max_index(&[COL_DATE, COL_PLAYER]);

    let mut applied: HashSet<Key> = HashSet::new();
    let mut updates = Vec::new();

    for (i, row) in existing.iter().enumerate() {
        if row.len() <= key_width {
            continue;
        }

        let key = (
            columns.get(row, COL_DATE).to_string(),
            columns.get(row, COL_PLAYER).to_string(),
        );

        // only the first stored row of a key is rewritten
        if applied.contains(&key) {
            continue;
        }

        if let Some(rec) = pending.by_key.get(&key) {
            updates.push(RowUpdate::new(i + 2, render_row(rec, header, &columns)));
            applied.insert(key);
        }
    }

    let appends: Vec<Vec<String>> = pending
        .order
        .iter()
        .filter(|key| !applied.contains(*key))
        .filter_map(|key| pending.by_key.get(key))
        .map(|rec| render_row(rec, header, &columns))
        .collect();

    if !updates.is_empty() {
        store.batch_write(sheet, &updates)?;
    }

    if !appends.is_empty() {
        store.append_rows(sheet, &appends)?;
    }

    Ok(UpsertReport {
        updated: updates.len(),
        inserted: appends.len(),
    })
}
