use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const CUSTOMER_ID_ATTRIBUTE: &str = "customer_id";
pub const FIRST_NAME_ATTRIBUTE: &str = "first_name";
pub const LAST_NAME_ATTRIBUTE: &str = "last_name";
pub const INTERESTS_ATTRIBUTE: &str = "interests";
pub const AGE_ATTRIBUTE: &str = "age";
pub const COLD_EMAIL_ATTRIBUTE: &str = "cold_email_content";

/// Attribute-name to typed-value map, as stored in the customer table and
/// delivered in change-stream images.
pub type Item = BTreeMap<String, AttributeValue>;

/// Typed attribute value in the store's single-key wire encoding
/// (`{"S": "text"}`, `{"N": "42"}`, ...).
///
/// Numbers stay in their decimal string form; binary values stay base64 text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AttributeValue {
    #[serde(rename = "S")]
    String(String),
    #[serde(rename = "N")]
    Number(String),
    #[serde(rename = "B")]
    Binary(String),
    #[serde(rename = "BOOL")]
    Boolean(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(rename = "SS")]
    StringSet(Vec<String>),
    #[serde(rename = "NS")]
    NumberSet(Vec<String>),
    #[serde(rename = "BS")]
    BinarySet(Vec<String>),
    #[serde(rename = "L")]
    List(Vec<AttributeValue>),
    #[serde(rename = "M")]
    Map(Item),
}

impl AttributeValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&str> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::String(_) => "S",
            Self::Number(_) => "N",
            Self::Binary(_) => "B",
            Self::Boolean(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::StringSet(_) => "SS",
            Self::NumberSet(_) => "NS",
            Self::BinarySet(_) => "BS",
            Self::List(_) => "L",
            Self::Map(_) => "M",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("age must be a whole number, got '{0}'")]
    InvalidAge(String),
    #[error("missing attribute '{0}'")]
    MissingAttribute(&'static str),
    #[error("attribute '{name}' must be of type {expected}, found {found}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// A prospective customer as stored in the customer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Comma separated free text, kept exactly as the operator typed it.
    pub interests: String,
    pub age: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cold_email_content: Option<String>,
}

impl CustomerRecord {
    pub fn new(
        customer_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        interests: impl Into<String>,
        age: i64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            interests: interests.into(),
            age,
            cold_email_content: None,
        }
    }

    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(
            CUSTOMER_ID_ATTRIBUTE.to_string(),
            AttributeValue::String(self.customer_id.clone()),
        );
        item.insert(
            FIRST_NAME_ATTRIBUTE.to_string(),
            AttributeValue::String(self.first_name.clone()),
        );
        item.insert(
            LAST_NAME_ATTRIBUTE.to_string(),
            AttributeValue::String(self.last_name.clone()),
        );
        item.insert(
            INTERESTS_ATTRIBUTE.to_string(),
            AttributeValue::String(self.interests.clone()),
        );
        item.insert(
            AGE_ATTRIBUTE.to_string(),
            AttributeValue::Number(self.age.to_string()),
        );
        if let Some(content) = &self.cold_email_content {
            item.insert(
                COLD_EMAIL_ATTRIBUTE.to_string(),
                AttributeValue::String(content.clone()),
            );
        }
        item
    }

    pub fn from_item(item: &Item) -> Result<Self, RecordError> {
        let age_text = required_number(item, AGE_ATTRIBUTE)?;
        let age = age_text
            .parse::<i64>()
            .map_err(|_| RecordError::InvalidAge(age_text.to_string()))?;

        Ok(Self {
            customer_id: required_string(item, CUSTOMER_ID_ATTRIBUTE)?.to_string(),
            first_name: required_string(item, FIRST_NAME_ATTRIBUTE)?.to_string(),
            last_name: required_string(item, LAST_NAME_ATTRIBUTE)?.to_string(),
            interests: required_string(item, INTERESTS_ATTRIBUTE)?.to_string(),
            age,
            cold_email_content: optional_string(item, COLD_EMAIL_ATTRIBUTE)?.map(str::to_string),
        })
    }
}

/// Parses operator-entered age text. Surrounding whitespace is ignored.
pub fn parse_age(raw: &str) -> Result<i64, RecordError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| RecordError::InvalidAge(trimmed.to_string()))
}

pub fn required_string<'a>(item: &'a Item, name: &'static str) -> Result<&'a str, RecordError> {
    optional_string(item, name)?.ok_or(RecordError::MissingAttribute(name))
}

pub fn optional_string<'a>(
    item: &'a Item,
    name: &'static str,
) -> Result<Option<&'a str>, RecordError> {
    match item.get(name) {
        None => Ok(None),
        Some(value) => value.as_string().map(Some).ok_or(RecordError::WrongType {
            name,
            expected: "S",
            found: value.type_tag(),
        }),
    }
}

fn required_number<'a>(item: &'a Item, name: &'static str) -> Result<&'a str, RecordError> {
    let value = item.get(name).ok_or(RecordError::MissingAttribute(name))?;
    value.as_number().ok_or(RecordError::WrongType {
        name,
        expected: "N",
        found: value.type_tag(),
    })
}
