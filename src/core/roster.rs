use crate::core::normalize::{ColumnMap, normalize};
use crate::errors::{AppError, AppResult};
use crate::models::player::{Category, CategoryFilter, RosterEntry};
use crate::sheets::SheetStore;
use std::collections::{BTreeSet, HashSet};

pub const COL_NAME: &str = "Jugadora";
pub const COL_CATEGORY: &str = "Categoría";

/// Header written when a new roster worksheet is created.
pub const ROSTER_HEADERS: [&str; 2] = [COL_NAME, COL_CATEGORY];

/// Every player name in the first column, trimmed, without blanks or
/// duplicates, in lexicographic order.
pub fn load_roster<S: SheetStore + ?Sized>(store: &S, sheet: &str) -> AppResult<BTreeSet<String>> {
    let rows = store.read_all_rows(sheet)?;

    Ok(rows
        .iter()
        .skip(1)
        .filter_map(|r| r.first())
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

/// Roster rows with their category markings, sorted by name.
///
/// Duplicate names keep the first row. Categories come either from a
/// `Categoría` column or from `Primera` / `Intermedia` marker columns.
pub fn load_roster_with_category<S: SheetStore + ?Sized>(
    store: &S,
    sheet: &str,
) -> AppResult<Vec<RosterEntry>> {
    let rows = store.read_all_rows(sheet)?;
    let Some((header, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let columns = ColumnMap::new(header);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for row in data {
        let name = row.first().map(|n| n.trim()).unwrap_or("");
        if name.is_empty() || !seen.insert(name.to_string()) {
            continue;
        }

        let detected = detect_categories(&columns, row);
        out.push(RosterEntry {
            name: name.to_string(),
            category: detected.first().copied(),
            both: detected.len() > 1,
        });
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

fn detect_categories(columns: &ColumnMap, row: &[String]) -> Vec<Category> {
    let mut found = parse_category_cell(columns.get(row, COL_CATEGORY));

    for cat in Category::ALL {
        let mark = normalize(columns.get(row, cat.label()));
        if !mark.is_empty() && mark != "no" && !found.contains(&cat) {
            found.push(cat);
        }
    }

    found.sort();
    found
}

/// Categories named in a free-text cell such as `1`, `1,2`, `1 y 2`,
/// `ambas` or `Primera`. Unknown tokens are ignored.
pub fn parse_category_cell(cell: &str) -> Vec<Category> {
    let norm = normalize(cell);
    if matches!(norm.as_str(), "ambas" | "both" | "todas") {
        return Category::ALL.to_vec();
    }

    let mut found: Vec<Category> = norm
        .split(|c: char| !c.is_alphanumeric())
        .filter_map(Category::from_token)
        .collect();
    found.sort();
    found.dedup();
    found
}

/// Strict variant for user input: every token must be a known category.
pub fn parse_category_codes(input: &str) -> AppResult<Vec<Category>> {
    let norm = normalize(input);
    if matches!(norm.as_str(), "ambas" | "both") {
        return Ok(Category::ALL.to_vec());
    }

    let mut found = Vec::new();
    for token in norm.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() || token == "y" {
            continue;
        }
        let cat =
            Category::from_token(token).ok_or_else(|| AppError::InvalidCategory(token.to_string()))?;
        if !found.contains(&cat) {
            found.push(cat);
        }
    }
    found.sort();
    Ok(found)
}

/// Names belonging to the selected category, sorted and deduplicated.
/// Players marked for both categories only count for the first one.
pub fn filter_players(entries: &[RosterEntry], filter: CategoryFilter) -> Vec<String> {
    let names: BTreeSet<String> = match filter.category() {
        None => entries.iter().map(|e| e.name.clone()).collect(),
        Some(cat) => entries
            .iter()
            .filter(|e| e.category == Some(cat))
            .map(|e| e.name.clone())
            .collect(),
    };
    names.into_iter().collect()
}

/// Append a player to the roster. Returns `false` when the exact name is
/// already listed.
pub fn add_player<S: SheetStore + ?Sized>(
    store: &mut S,
    sheet: &str,
    name: &str,
    categories: &[Category],
) -> AppResult<bool> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::UnknownPlayer(String::new()));
    }

    let rows = store.read_all_rows(sheet)?;
    if rows.iter().skip(1).any(|r| r.first().map(|n| n.trim()) == Some(name)) {
        return Ok(false);
    }

    let header = rows.first().cloned().unwrap_or_default();
    let columns = ColumnMap::new(&header);

    let mut row = vec![name.to_string()];
    let mut put = |idx: usize, value: String| {
        if row.len() <= idx {
            row.resize(idx + 1, String::new());
        }
        row[idx] = value;
    };

    if let Some(idx) = columns.index(COL_CATEGORY) {
        let codes: Vec<&str> = categories.iter().map(|c| c.code()).collect();
        put(idx, codes.join(","));
    } else {
        for cat in categories {
            if let Some(idx) = columns.index(cat.label()) {
                put(idx, "X".to_string());
            }
        }
    }

    store.append_rows(sheet, &[row])?;
    Ok(true)
}
