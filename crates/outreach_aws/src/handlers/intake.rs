use outreach_core::record::{CustomerRecord, RecordError};
use tracing::{info, warn};

use crate::adapters::customer_store::{CustomerStore, InsertOutcome, StoreError};

pub const DUPLICATE_ID_NOTICE: &str =
    "Customer ID already exists. Please enter a unique customer ID.";

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("failed to read operator input: {0}")]
    Input(#[from] std::io::Error),
    #[error("operator input closed before a record was complete")]
    InputClosed,
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Supplies candidate records, normally by prompting an operator.
pub trait CandidateSource {
    fn read_candidate(&mut self) -> Result<CustomerRecord, IntakeError>;

    /// Tells the operator the last candidate's id is taken.
    fn reject_duplicate(&mut self, customer_id: &str) -> Result<(), IntakeError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Inserted { customer_id: String, attempts: usize },
    Abandoned { attempts: usize },
}

/// Collects candidates until one with an unused `customer_id` is stored, or
/// `max_attempts` candidates have been rejected.
///
/// Every attempt performs one lookup; only a unique id reaches the insert. The
/// insert itself is conditional, so an id claimed between the lookup and the
/// write is rejected the same way as one found by the lookup.
pub fn submit_customer(
    source: &mut impl CandidateSource,
    store: &impl CustomerStore,
    max_attempts: usize,
) -> Result<SubmissionOutcome, IntakeError> {
    for attempt in 1..=max_attempts {
        let candidate = source.read_candidate()?;

        if store.customer_exists(&candidate.customer_id)? {
            warn!(
                component = "intake",
                event = "duplicate_customer_id",
                customer_id = %candidate.customer_id,
                attempt,
                "customer id already present"
            );
            source.reject_duplicate(&candidate.customer_id)?;
            continue;
        }

        match store.insert_customer(&candidate)? {
            InsertOutcome::Inserted => {
                info!(
                    component = "intake",
                    event = "customer_inserted",
                    customer_id = %candidate.customer_id,
                    attempt,
                    "customer record stored"
                );
                return Ok(SubmissionOutcome::Inserted {
                    customer_id: candidate.customer_id,
                    attempts: attempt,
                });
            }
            InsertOutcome::AlreadyExists => {
                warn!(
                    component = "intake",
                    event = "insert_conflict",
                    customer_id = %candidate.customer_id,
                    attempt,
                    "customer id claimed between lookup and insert"
                );
                source.reject_duplicate(&candidate.customer_id)?;
            }
        }
    }

    warn!(
        component = "intake",
        event = "submission_abandoned",
        attempts = max_attempts,
        "no unique customer id supplied"
    );
    Ok(SubmissionOutcome::Abandoned {
        attempts: max_attempts,
    })
}
