//! The closed set of expense categories.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed set of categories an expense can belong to. Anything the
/// service sends that is not recognized resolves to `Other`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Ord,
    PartialOrd,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Housing,
    Shopping,
    Health,
    Education,
    #[default]
    Other,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// Lenient parse for wire values: case-insensitive, with unknown or
    /// missing values mapping to `Other` rather than failing.
    pub fn from_wire(value: Option<&str>) -> Category {
        match value {
            Some(s) => Category::from_str(s.trim().to_lowercase().as_str()).unwrap_or_default(),
            None => Category::Other,
        }
    }

    /// Human-readable label used in tables and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food & Dining",
            Category::Transport => "Transportation",
            Category::Housing => "Housing",
            Category::Shopping => "Shopping",
            Category::Health => "Health & Medical",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_resolve_to_the_closed_set() {
        assert_eq!(Category::from_wire(Some("food")), Category::Food);
        assert_eq!(Category::from_wire(Some("Transport")), Category::Transport);
        assert_eq!(Category::from_wire(Some("groceries")), Category::Other);
        assert_eq!(Category::from_wire(Some("")), Category::Other);
        assert_eq!(Category::from_wire(None), Category::Other);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for c in [Category::Food, Category::Health, Category::Other] {
            assert_eq!(Category::from_str(&c.to_string()).unwrap(), c);
        }
    }
}
