//! Event type categories.
//!
//! The category decides which envelope fields the broker mandates on top of
//! the owner's schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Broker-defined classification of an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "undefined")]
    Undefined,
    #[serde(rename = "business")]
    Business,
    #[serde(rename = "data")]
    DataChange,
}

/// Root fields a data change envelope requires besides `metadata`.
const DATA_CHANGE_FIELDS: &[&str] = &["data_op", "data_type", "data"];

impl Category {
    pub const ALL: [Category; 3] = [Category::Undefined, Category::Business, Category::DataChange];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Undefined => "undefined",
            Category::Business => "business",
            Category::DataChange => "data",
        }
    }

    /// Whether events must carry the broker `metadata` object.
    pub fn requires_metadata(&self) -> bool {
        !matches!(self, Category::Undefined)
    }

    /// Root fields required in addition to `metadata`, in declaration order.
    pub fn extra_required_fields(&self) -> &'static [&'static str] {
        match self {
            Category::DataChange => DATA_CHANGE_FIELDS,
            _ => &[],
        }
    }

    /// Whether unknown root keys are rejected regardless of the user schema.
    pub fn closes_root(&self) -> bool {
        matches!(self, Category::DataChange)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "undefined" => Ok(Category::Undefined),
            "business" => Ok(Category::Business),
            "data" | "data_change" | "data-change" => Ok(Category::DataChange),
            other => Err(format!("unknown event type category: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_table() {
        assert!(!Category::Undefined.requires_metadata());
        assert!(Category::Business.requires_metadata());
        assert!(Category::DataChange.requires_metadata());

        assert!(Category::Undefined.extra_required_fields().is_empty());
        assert!(Category::Business.extra_required_fields().is_empty());
        assert_eq!(
            Category::DataChange.extra_required_fields(),
            &["data_op", "data_type", "data"]
        );

        assert!(!Category::Business.closes_root());
        assert!(Category::DataChange.closes_root());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("business".parse::<Category>(), Ok(Category::Business));
        assert_eq!("DATA".parse::<Category>(), Ok(Category::DataChange));
        assert_eq!("data_change".parse::<Category>(), Ok(Category::DataChange));
        assert!("audit".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_names() {
        assert_eq!(
            serde_json::to_string(&Category::DataChange).unwrap(),
            "\"data\""
        );
        let parsed: Category = serde_json::from_str("\"undefined\"").unwrap();
        assert_eq!(parsed, Category::Undefined);
    }
}
