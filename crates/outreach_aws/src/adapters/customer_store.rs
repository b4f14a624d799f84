use outreach_core::record::CustomerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The conditional put found an item with the same `customer_id`.
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("failed to look up customer '{customer_id}': {message}")]
    Lookup {
        customer_id: String,
        message: String,
    },
    #[error("failed to insert customer '{customer_id}': {message}")]
    Insert {
        customer_id: String,
        message: String,
    },
    #[error("failed to update customer '{customer_id}': {message}")]
    Update {
        customer_id: String,
        message: String,
    },
}

/// Customer table operations used by intake and enrichment.
pub trait CustomerStore {
    fn customer_exists(&self, customer_id: &str) -> Result<bool, StoreError>;

    /// Writes a new record only if no item with the same key exists.
    fn insert_customer(&self, record: &CustomerRecord) -> Result<InsertOutcome, StoreError>;

    /// Sets `cold_email_content` on an existing record, leaving every other
    /// attribute untouched.
    fn set_cold_email(&self, customer_id: &str, content: &str) -> Result<(), StoreError>;
}
