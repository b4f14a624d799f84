use std::time::Instant;

use outreach_core::prompt::{
    ContractError, GenerationRequest, GenerationResponse, GenerationSettings,
};
use outreach_core::stream::{decode_stream_records, EnrichmentTarget, SkipReason, StreamRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::customer_store::{CustomerStore, StoreError};
use crate::adapters::text_generator::{ModelError, TextGenerator};

pub const BATCH_COMPLETE_MESSAGE: &str = "Process Complete";

/// Fixed acknowledgement returned to the stream trigger for every batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

pub fn batch_response() -> BatchResponse {
    BatchResponse {
        status_code: 200,
        body: Value::from(BATCH_COMPLETE_MESSAGE).to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichmentError {
    #[error("malformed notification: {0}")]
    Malformed(String),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Enriched {
        customer_id: String,
    },
    Skipped(SkipReason),
    Failed {
        customer_id: Option<String>,
        error: EnrichmentError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub outcomes: Vec<NotificationOutcome>,
}

impl BatchSummary {
    pub fn enriched(&self) -> usize {
        self.count(|outcome| matches!(outcome, NotificationOutcome::Enriched { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, NotificationOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, NotificationOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&NotificationOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|outcome| predicate(outcome)).count()
    }
}

/// Processes a raw change-stream batch. Always completes; per-notification
/// failures are logged and recorded in the summary.
pub fn handle_stream_payload(
    event: &Value,
    store: &impl CustomerStore,
    generator: &impl TextGenerator,
    settings: &GenerationSettings,
) -> BatchSummary {
    let started_at = Instant::now();
    let records = match decode_stream_records(event) {
        Ok(records) => records,
        Err(message) => {
            error!(
                component = "enrichment_handler",
                event = "batch_rejected",
                error = %message,
                "stream batch could not be decoded"
            );
            return BatchSummary::default();
        }
    };

    let mut summary = BatchSummary {
        outcomes: Vec::with_capacity(records.len()),
    };
    for record in records {
        let outcome = match record {
            Ok(record) => enrich_record(&record, store, generator, settings),
            Err(message) => {
                let failure = EnrichmentError::Malformed(message);
                log_failure(None, None, &failure);
                NotificationOutcome::Failed {
                    customer_id: None,
                    error: failure,
                }
            }
        };
        summary.outcomes.push(outcome);
    }

    info!(
        component = "enrichment_handler",
        event = "batch_completed",
        notifications = summary.outcomes.len(),
        enriched = summary.enriched(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "stream batch processed"
    );
    summary
}

/// Handles one notification: filter, prompt, generate, write back.
pub fn enrich_record(
    record: &StreamRecord,
    store: &impl CustomerStore,
    generator: &impl TextGenerator,
    settings: &GenerationSettings,
) -> NotificationOutcome {
    let event_id = record.event_id.as_deref();
    let prospect = match record.enrichment_target() {
        EnrichmentTarget::Ready(prospect) => prospect,
        EnrichmentTarget::Skip(reason) => {
            info!(
                component = "enrichment_handler",
                event = "notification_skipped",
                event_id,
                customer_id = record.customer_id(),
                reason = %reason,
                "skipping notification"
            );
            return NotificationOutcome::Skipped(reason);
        }
        EnrichmentTarget::Malformed(message) => {
            let failure = EnrichmentError::Malformed(message);
            log_failure(event_id, record.customer_id(), &failure);
            return NotificationOutcome::Failed {
                customer_id: record.customer_id().map(str::to_string),
                error: failure,
            };
        }
    };

    info!(
        component = "enrichment_handler",
        event = "notification_started",
        event_id,
        customer_id = %prospect.customer_id,
        interests = %prospect.interests,
        "generating cold email"
    );

    let result = GenerationRequest::for_prospect(&prospect, settings)
        .to_body()
        .map_err(EnrichmentError::from)
        .and_then(|body| Ok(generator.invoke_model(&settings.model_id, &body)?))
        .and_then(|reply| Ok(GenerationResponse::from_body(&reply)?))
        .and_then(|response| {
            store.set_cold_email(&prospect.customer_id, &response.generation)?;
            Ok(response)
        });

    match result {
        Ok(response) => {
            info!(
                component = "enrichment_handler",
                event = "notification_enriched",
                event_id,
                customer_id = %prospect.customer_id,
                generation_token_count = response.generation_token_count,
                "cold email content stored"
            );
            NotificationOutcome::Enriched {
                customer_id: prospect.customer_id,
            }
        }
        Err(failure) => {
            log_failure(event_id, Some(&prospect.customer_id), &failure);
            NotificationOutcome::Failed {
                customer_id: Some(prospect.customer_id),
                error: failure,
            }
        }
    }
}

fn log_failure(event_id: Option<&str>, customer_id: Option<&str>, failure: &EnrichmentError) {
    warn!(
        component = "enrichment_handler",
        event = "notification_failed",
        event_id,
        customer_id,
        error = %failure,
        "notification abandoned"
    );
}
