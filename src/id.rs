//! Transaction ID generation
//!
//! IDs must be globally unique and sort by creation time.

use uuid::Uuid;

/// ID generation errors
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    #[error("ID source unavailable: {0}")]
    Unavailable(String),
}

/// Produces a unique, time-ordered string on each call
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Result<String, IdError>;
}

/// UUIDv7 generator (48-bit millisecond timestamp prefix)
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> Result<String, IdError> {
        Ok(Uuid::now_v7().to_string())
    }
}
