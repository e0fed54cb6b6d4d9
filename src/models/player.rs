use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Primera,    // 1
    Intermedia, // 2
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Primera, Category::Intermedia];

    pub fn code(&self) -> &'static str {
        match self {
            Category::Primera => "1",
            Category::Intermedia => "2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Primera => "Primera",
            Category::Intermedia => "Intermedia",
        }
    }

    /// Accepts the numeric code or the (normalized) label.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1" | "primera" => Some(Category::Primera),
            "2" | "intermedia" => Some(Category::Intermedia),
            _ => None,
        }
    }
}

/// Category selection offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize)]
pub enum CategoryFilter {
    Primera,
    Intermedia,
    #[default]
    Todas,
}

impl CategoryFilter {
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::Primera => Some(Category::Primera),
            CategoryFilter::Intermedia => Some(Category::Intermedia),
            CategoryFilter::Todas => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::Primera => "Primera",
            CategoryFilter::Intermedia => "Intermedia",
            CategoryFilter::Todas => "Todas",
        }
    }
}

/// A roster row as loaded from the roster worksheet.
///
/// When the row qualifies for more than one category, `both` is set and
/// `category` holds the first one detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub name: String,
    pub category: Option<Category>,
    pub both: bool,
}
