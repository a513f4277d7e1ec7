//! The contract of server-side identifier generation.

use async_trait::async_trait;
use thiserror::Error;

/// Produces distinct values usable as primary keys.
#[async_trait]
pub trait IdGenerator: Send + Sync {
    /// Generate a single identifier.
    async fn generate(&self) -> Result<serde_json::Value, IdGenerationError>;

    /// Generate `count` identifiers in one call.
    async fn generate_batch(
        &self,
        count: usize,
    ) -> Result<Vec<serde_json::Value>, IdGenerationError> {
        let mut identifiers = Vec::with_capacity(count);
        for _ in 0..count {
            identifiers.push(self.generate().await?);
        }
        Ok(identifiers)
    }
}

/// A failure of an identifier generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct IdGenerationError(pub String);
