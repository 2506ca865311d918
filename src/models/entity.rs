//! Entity kinds and the column-access seam shared by validation and queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::{AttributesJson, Numeric, Sequence};
use crate::error::Error;

/// The three entity collections of a scheduling dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Clients requesting tasks.
    Clients,
    /// Workers providing skills and slots.
    Workers,
    /// Tasks to be scheduled.
    Tasks,
}

impl EntityType {
    /// All entity types, in reporting order.
    pub const ALL: [EntityType; 3] = [Self::Clients, Self::Workers, Self::Tasks];

    /// Collection name as used on the wire (`"clients"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Workers => "workers",
            Self::Tasks => "tasks",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clients" => Ok(Self::Clients),
            "workers" => Ok(Self::Workers),
            "tasks" => Ok(Self::Tasks),
            other => Err(Error::UnknownEntityType(other.to_string())),
        }
    }
}

/// Borrowed view of a single column of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Column not present in the record.
    Missing,
    /// Free text (identifiers, names, group tags).
    Text(&'a str),
    /// A numeric column.
    Number(&'a Numeric),
    /// A list of labels (skills, task IDs).
    Labels(&'a Sequence<String>),
    /// A list of numbers (slots, phases).
    Numbers(&'a Sequence<Numeric>),
    /// The `AttributesJSON` column.
    Attributes(&'a AttributesJson),
    /// An extra column outside the declared schema.
    Other(&'a Value),
}

impl FieldValue<'_> {
    /// Whether the column is present.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Missing)
    }

    /// The raw JSON form of the column (`Null` when missing).
    pub fn to_value(&self) -> Value {
        match self {
            Self::Missing => Value::Null,
            Self::Text(s) => Value::String((*s).to_string()),
            Self::Number(n) => n.to_value(),
            Self::Labels(seq) => serde_json::to_value(seq).unwrap_or(Value::Null),
            Self::Numbers(seq) => serde_json::to_value(seq).unwrap_or(Value::Null),
            Self::Attributes(a) => serde_json::to_value(a).unwrap_or(Value::Null),
            Self::Other(v) => (*v).clone(),
        }
    }
}

/// A row of one of the entity collections.
///
/// Implementors are closed, typed records with an open side table for
/// columns outside the declared schema.
pub trait Entity: Serialize {
    /// Which collection this record belongs to.
    const TYPE: EntityType;

    /// Name of the identifier column.
    const ID_COLUMN: &'static str;

    /// Columns every record of this type must carry.
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// The record identifier, if present.
    fn id(&self) -> Option<&str>;

    /// Looks up a column by its tabular name.
    fn field(&self, name: &str) -> FieldValue<'_>;

    /// Required columns absent from this record, in declaration order.
    fn missing_columns(&self) -> Vec<&'static str> {
        Self::REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !self.field(col).is_present())
            .collect()
    }

    /// Renders the record back to its raw row.
    fn to_record(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_round_trip() {
        for ty in EntityType::ALL {
            assert_eq!(ty.as_str().parse::<EntityType>().unwrap(), ty);
        }
        assert!(matches!(
            "machines".parse::<EntityType>(),
            Err(Error::UnknownEntityType(_))
        ));
    }

    #[test]
    fn test_entity_type_serde_name() {
        let json = serde_json::to_string(&EntityType::Workers).unwrap();
        assert_eq!(json, "\"workers\"");
    }

    #[test]
    fn test_field_value_presence() {
        let n = Numeric::from(2);
        assert!(FieldValue::Number(&n).is_present());
        assert!(!FieldValue::Missing.is_present());
        assert_eq!(FieldValue::Missing.to_value(), Value::Null);
    }
}
