use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Field types of a Data Extension.
///
/// Parsed case-insensitively from platform type names; anything unrecognized
/// is treated as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub enum FieldType {
    Text,
    #[serde(rename = "Number")]
    Integer,
    Decimal,
    Date,
    Boolean,
    EmailAddress,
    Phone,
    Locale,
}

impl FieldType {
    pub fn from_platform_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "number" | "integer" | "int" => FieldType::Integer,
            "decimal" => FieldType::Decimal,
            "date" | "datetime" => FieldType::Date,
            "boolean" | "bool" => FieldType::Boolean,
            "emailaddress" | "email" => FieldType::EmailAddress,
            "phone" => FieldType::Phone,
            "locale" => FieldType::Locale,
            _ => FieldType::Text,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Integer => "Number",
            FieldType::Decimal => "Decimal",
            FieldType::Date => "Date",
            FieldType::Boolean => "Boolean",
            FieldType::EmailAddress => "EmailAddress",
            FieldType::Phone => "Phone",
            FieldType::Locale => "Locale",
        }
    }

    /// Types stored as character data, which carry a length.
    pub const fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldType::Text | FieldType::EmailAddress | FieldType::Phone | FieldType::Locale
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(FieldType::from_platform_name(&name))
    }
}

/// A declared field of a table, as returned by a metadata fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            length: None,
        }
    }

    pub fn text(name: impl Into<String>, length: u32) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Text,
            length: Some(length),
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

/// Output schema entry for one SELECT-list column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InferredField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parsing_is_case_insensitive() {
        assert_eq!(FieldType::from_platform_name("number"), FieldType::Integer);
        assert_eq!(FieldType::from_platform_name("EMAILADDRESS"), FieldType::EmailAddress);
        assert_eq!(FieldType::from_platform_name("Decimal"), FieldType::Decimal);
        assert_eq!(FieldType::from_platform_name("whatever"), FieldType::Text);
    }

    #[test]
    fn test_field_deserializes_platform_json() {
        let field: Field =
            serde_json::from_str(r#"{"name":"Age","type":"number"}"#).unwrap();
        assert_eq!(field.field_type, FieldType::Integer);
        assert_eq!(field.length, None);
    }

    #[test]
    fn test_inferred_field_serialization() {
        let field = InferredField {
            name: "Total".to_string(),
            field_type: FieldType::Decimal,
            length: None,
            scale: Some(2),
            precision: Some(18),
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "Decimal");
        assert_eq!(json["precision"], 18);
        assert!(json.get("length").is_none());
    }
}
