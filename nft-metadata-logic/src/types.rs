use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Identifier of a token inside the configured collection.
///
/// Parsed from the decimal representation only: signs, hex prefixes,
/// surrounding whitespace and values that do not fit into `uint256`
/// are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(U256);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenIdParseError {
    #[error("token id is empty")]
    Empty,
    #[error("token id must be a non-negative decimal integer, got '{0}'")]
    NotDecimal(String),
    #[error("token id '{0}' does not fit into uint256")]
    Overflow(String),
}

impl TokenId {
    pub fn into_inner(self) -> U256 {
        self.0
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl FromStr for TokenId {
    type Err = TokenIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TokenIdParseError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenIdParseError::NotDecimal(s.to_string()));
        }
        U256::from_str_radix(s, 10)
            .map(Self)
            .map_err(|_| TokenIdParseError::Overflow(s.to_string()))
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Latest chain head at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(u64),
    Text(String),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: AttributeValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<DisplayType>,
}

impl Attribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
            display_type: None,
        }
    }

    pub fn number(trait_type: impl Into<String>, value: u64) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: AttributeValue::Number(value),
            display_type: Some(DisplayType::Number),
        }
    }
}

/// The document served by the per-token metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl ResolvedMetadata {
    pub fn attribute(&self, trait_type: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|attribute| attribute.trait_type == trait_type)
            .map(|attribute| &attribute.value)
    }
}

/// Off-chain document referenced by `tokenURI`.
///
/// Every field is optional and a field of unexpected type is treated as
/// missing, so one bad field never discards the rest of the document.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalDocument {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub description: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub image: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub attributes: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_token_id() {
        assert_eq!("42".parse::<TokenId>().unwrap(), TokenId::from(42));
        assert_eq!("0".parse::<TokenId>().unwrap(), TokenId::from(0));
        assert_eq!(
            "007".parse::<TokenId>().unwrap().to_string(),
            "7".to_string()
        );

        let max = U256::MAX.to_string();
        assert_eq!(max.parse::<TokenId>().unwrap().into_inner(), U256::MAX);
    }

    #[test]
    fn reject_invalid_token_id() {
        assert_eq!("".parse::<TokenId>(), Err(TokenIdParseError::Empty));
        for value in ["-1", "+1", "abc", "0x10", " 1", "1.5", "1e3"] {
            assert_eq!(
                value.parse::<TokenId>(),
                Err(TokenIdParseError::NotDecimal(value.to_string())),
                "value {value} should be rejected"
            );
        }

        let too_big = format!("{}0", U256::MAX);
        assert!(matches!(
            too_big.parse::<TokenId>(),
            Err(TokenIdParseError::Overflow(_))
        ));
    }

    #[test]
    fn serialize_attributes() {
        let attributes = vec![
            Attribute::new("Owned NFTs", "6"),
            Attribute::number("Reputation Score", 6),
        ];
        let value = serde_json::to_value(attributes).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"trait_type": "Owned NFTs", "value": "6"},
                {"trait_type": "Reputation Score", "value": 6, "display_type": "number"},
            ])
        );
    }

    #[test]
    fn missing_image_serializes_as_null() {
        let metadata = ResolvedMetadata {
            name: "name".into(),
            description: "description".into(),
            image: None,
            attributes: vec![],
        };
        let value = serde_json::to_value(metadata).unwrap();
        assert_eq!(value["image"], serde_json::Value::Null);
    }

    #[test]
    fn external_document_tolerates_bad_fields() {
        let document: ExternalDocument = serde_json::from_str(
            r#"{"name": 15, "description": "Some token", "image": null, "attributes": "oops", "extra": true}"#,
        )
        .unwrap();
        assert_eq!(
            document,
            ExternalDocument {
                name: None,
                description: Some("Some token".into()),
                image: None,
                attributes: vec![],
            }
        );
    }
}
