use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{
    optional_string, required_string, Item, RecordError, CUSTOMER_ID_ATTRIBUTE,
    FIRST_NAME_ATTRIBUTE, INTERESTS_ATTRIBUTE,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Insert,
    Modify,
    Remove,
    #[serde(other)]
    Unknown,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Modify => "MODIFY",
            Self::Remove => "REMOVE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamPayload {
    #[serde(rename = "Keys", default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Item>,
    #[serde(rename = "NewImage", default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<Item>,
    #[serde(rename = "OldImage", default, skip_serializing_if = "Option::is_none")]
    pub old_image: Option<Item>,
    #[serde(
        rename = "SequenceNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_number: Option<String>,
}

/// One change notification from the customer table's stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamRecord {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(rename = "eventName")]
    pub event_name: EventKind,
    #[serde(default)]
    pub dynamodb: StreamPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prospect {
    pub customer_id: String,
    pub first_name: String,
    pub interests: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotInsert(EventKind),
    NoInterests,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInsert(kind) => write!(f, "event {kind} is not a new entry"),
            Self::NoInterests => f.write_str("new entry has no interests attribute"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentTarget {
    Ready(Prospect),
    Skip(SkipReason),
    Malformed(String),
}

impl StreamRecord {
    /// Decides whether this notification should produce a cold email.
    ///
    /// Only inserts qualify, so the handler's own `MODIFY` write-back never
    /// re-enters enrichment.
    pub fn enrichment_target(&self) -> EnrichmentTarget {
        if self.event_name != EventKind::Insert {
            return EnrichmentTarget::Skip(SkipReason::NotInsert(self.event_name));
        }

        let Some(image) = self.dynamodb.new_image.as_ref() else {
            return EnrichmentTarget::Malformed("insert notification has no NewImage".to_string());
        };

        match prospect_from_image(image) {
            Ok(Some(prospect)) => EnrichmentTarget::Ready(prospect),
            Ok(None) => EnrichmentTarget::Skip(SkipReason::NoInterests),
            Err(error) => EnrichmentTarget::Malformed(error.to_string()),
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        let payload = &self.dynamodb;
        [payload.new_image.as_ref(), payload.keys.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|item| item.get(CUSTOMER_ID_ATTRIBUTE)?.as_string())
    }
}

fn prospect_from_image(image: &Item) -> Result<Option<Prospect>, RecordError> {
    let Some(interests) = optional_string(image, INTERESTS_ATTRIBUTE)? else {
        return Ok(None);
    };

    Ok(Some(Prospect {
        customer_id: required_string(image, CUSTOMER_ID_ATTRIBUTE)?.to_string(),
        first_name: required_string(image, FIRST_NAME_ATTRIBUTE)?.to_string(),
        interests: interests.to_string(),
    }))
}

/// Splits a raw stream batch into individually decoded notifications.
///
/// A record that fails to decode does not poison its neighbours; the error
/// text is returned in its slot instead.
pub fn decode_stream_records(event: &Value) -> Result<Vec<Result<StreamRecord, String>>, String> {
    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .ok_or_else(|| "stream event must include Records array".to_string())?;

    Ok(records
        .iter()
        .map(|record| {
            StreamRecord::deserialize(record)
                .map_err(|error| format!("invalid stream record: {error}"))
        })
        .collect())
}
