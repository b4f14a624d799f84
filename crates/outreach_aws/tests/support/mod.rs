#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use outreach_aws::adapters::customer_store::{CustomerStore, InsertOutcome, StoreError};
use outreach_aws::adapters::text_generator::{ModelError, TextGenerator};
use outreach_aws::handlers::intake::{CandidateSource, IntakeError};
use outreach_core::prompt::GenerationRequest;
use outreach_core::record::{AttributeValue, CustomerRecord, Item, COLD_EMAIL_ATTRIBUTE};
use serde_json::{json, Value};

/// Item-level stand-in for the customer table.
pub struct InMemoryTable {
    items: Mutex<BTreeMap<String, Item>>,
    lookups: Mutex<usize>,
    writes: Mutex<usize>,
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            lookups: Mutex::new(0),
            writes: Mutex::new(0),
        }
    }

    pub fn seed(&self, record: &CustomerRecord) {
        self.items
            .lock()
            .expect("poisoned mutex")
            .insert(record.customer_id.clone(), record.to_item());
    }

    pub fn item(&self, customer_id: &str) -> Option<Item> {
        self.items
            .lock()
            .expect("poisoned mutex")
            .get(customer_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("poisoned mutex").len()
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().expect("poisoned mutex")
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().expect("poisoned mutex")
    }
}

impl CustomerStore for InMemoryTable {
    fn customer_exists(&self, customer_id: &str) -> Result<bool, StoreError> {
        *self.lookups.lock().expect("poisoned mutex") += 1;
        Ok(self
            .items
            .lock()
            .expect("poisoned mutex")
            .contains_key(customer_id))
    }

    fn insert_customer(&self, record: &CustomerRecord) -> Result<InsertOutcome, StoreError> {
        let mut items = self.items.lock().expect("poisoned mutex");
        if items.contains_key(&record.customer_id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        items.insert(record.customer_id.clone(), record.to_item());
        *self.writes.lock().expect("poisoned mutex") += 1;
        Ok(InsertOutcome::Inserted)
    }

    fn set_cold_email(&self, customer_id: &str, content: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().expect("poisoned mutex");
        let item = items
            .get_mut(customer_id)
            .ok_or_else(|| StoreError::Update {
                customer_id: customer_id.to_string(),
                message: "conditional check failed".to_string(),
            })?;
        item.insert(
            COLD_EMAIL_ATTRIBUTE.to_string(),
            AttributeValue::String(content.to_string()),
        );
        *self.writes.lock().expect("poisoned mutex") += 1;
        Ok(())
    }
}

/// Replies with queued results in order and records every request it saw.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<Vec<u8>, ModelError>>>,
    requests: Mutex<Vec<(String, GenerationRequest)>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn reply_with(self, generation: &str) -> Self {
        self.replies
            .lock()
            .expect("poisoned mutex")
            .push_back(Ok(json!({
                "generation": generation,
                "prompt_token_count": 240,
                "generation_token_count": 180,
                "stop_reason": "stop"
            })
            .to_string()
            .into_bytes()));
        self
    }

    pub fn fail_with(self, message: &str) -> Self {
        self.replies
            .lock()
            .expect("poisoned mutex")
            .push_back(Err(ModelError {
                model_id: "scripted".to_string(),
                message: message.to_string(),
            }));
        self
    }

    pub fn requests(&self) -> Vec<(String, GenerationRequest)> {
        self.requests.lock().expect("poisoned mutex").clone()
    }
}

impl TextGenerator for ScriptedModel {
    fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>, ModelError> {
        let request: GenerationRequest =
            serde_json::from_slice(body).expect("handler should send a generation request");
        self.requests
            .lock()
            .expect("poisoned mutex")
            .push((model_id.to_string(), request));
        self.replies
            .lock()
            .expect("poisoned mutex")
            .pop_front()
            .expect("unexpected model call")
    }
}

pub struct ScriptedOperator {
    candidates: VecDeque<CustomerRecord>,
    pub rejected: Vec<String>,
}

impl ScriptedOperator {
    pub fn new(candidates: Vec<CustomerRecord>) -> Self {
        Self {
            candidates: candidates.into(),
            rejected: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.candidates.len()
    }
}

impl CandidateSource for ScriptedOperator {
    fn read_candidate(&mut self) -> Result<CustomerRecord, IntakeError> {
        self.candidates.pop_front().ok_or(IntakeError::InputClosed)
    }

    fn reject_duplicate(&mut self, customer_id: &str) -> Result<(), IntakeError> {
        self.rejected.push(customer_id.to_string());
        Ok(())
    }
}

pub fn insert_event(record: &CustomerRecord) -> Value {
    json!({
        "eventID": format!("evt-{}", record.customer_id),
        "eventName": "INSERT",
        "eventVersion": "1.1",
        "eventSource": "aws:dynamodb",
        "awsRegion": "us-east-1",
        "dynamodb": {
            "Keys": {"customer_id": {"S": record.customer_id}},
            "NewImage": record.to_item(),
            "SequenceNumber": "4421584500000000017450439091",
            "SizeBytes": 120,
            "StreamViewType": "NEW_IMAGE"
        }
    })
}

pub fn batch(records: Vec<Value>) -> Value {
    json!({ "Records": records })
}
