//! Sorting helpers shared by list views.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sorting the active field flips the direction; sorting another field makes
/// it active and resets to ascending.
pub fn toggle_sort(sort_by: &mut Option<String>, direction: &mut SortDirection, field: &str) {
    if sort_by.as_deref() == Some(field) {
        *direction = direction.toggled();
    } else {
        *sort_by = Some(field.to_string());
        *direction = SortDirection::Asc;
    }
}

/// Sort indicator for a column header.
pub fn get_sort_indicator(sort_by: Option<&str>, field: &str, direction: SortDirection) -> &'static str {
    if sort_by == Some(field) {
        match direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        }
    } else {
        " ⇅"
    }
}
