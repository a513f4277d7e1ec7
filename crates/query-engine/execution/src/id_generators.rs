//! Identifier generators for entities that ask for server-side keys.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use query_engine_metadata::metadata::IdGeneratorKind;
use query_engine_translation::translation::mutation::id_generator::{
    IdGenerationError, IdGenerator,
};

/// Random version 4 UUIDs, as strings.
#[derive(Debug, Default)]
pub struct UuidGenerator;

#[async_trait]
impl IdGenerator for UuidGenerator {
    async fn generate(&self) -> Result<serde_json::Value, IdGenerationError> {
        Ok(serde_json::Value::String(uuid::Uuid::new_v4().to_string()))
    }
}

/// Increasing integers. A batch reserves a contiguous range.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: AtomicI64,
}

impl SequenceGenerator {
    pub fn starting_at(first: i64) -> SequenceGenerator {
        SequenceGenerator {
            next: AtomicI64::new(first),
        }
    }

    fn reserve(&self, count: usize) -> Result<i64, IdGenerationError> {
        let count = i64::try_from(count)
            .map_err(|_| IdGenerationError(format!("cannot reserve {count} identifiers")))?;
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                next.checked_add(count)
            })
            .map_err(|_| IdGenerationError("identifier sequence exhausted".to_string()))
    }
}

impl Default for SequenceGenerator {
    fn default() -> SequenceGenerator {
        SequenceGenerator::starting_at(1)
    }
}

#[async_trait]
impl IdGenerator for SequenceGenerator {
    async fn generate(&self) -> Result<serde_json::Value, IdGenerationError> {
        Ok(serde_json::Value::from(self.reserve(1)?))
    }

    async fn generate_batch(
        &self,
        count: usize,
    ) -> Result<Vec<serde_json::Value>, IdGenerationError> {
        let first = self.reserve(count)?;
        Ok((0..count)
            .zip(first..)
            .map(|(_, id)| serde_json::Value::from(id))
            .collect())
    }
}

/// Counts the identifiers handed out by another generator.
pub struct Metered {
    inner: Arc<dyn IdGenerator>,
    counter: prometheus::IntCounter,
}

impl Metered {
    pub fn new(inner: Arc<dyn IdGenerator>, counter: prometheus::IntCounter) -> Metered {
        Metered { inner, counter }
    }
}

#[async_trait]
impl IdGenerator for Metered {
    async fn generate(&self) -> Result<serde_json::Value, IdGenerationError> {
        let id = self.inner.generate().await?;
        self.counter.inc();
        Ok(id)
    }

    async fn generate_batch(
        &self,
        count: usize,
    ) -> Result<Vec<serde_json::Value>, IdGenerationError> {
        let ids = self.inner.generate_batch(count).await?;
        self.counter.inc_by(ids.len() as u64);
        Ok(ids)
    }
}

/// The generator for an entity's declared kind.
pub fn for_kind(kind: IdGeneratorKind) -> Arc<dyn IdGenerator> {
    match kind {
        IdGeneratorKind::Uuid => Arc::new(UuidGenerator),
        IdGeneratorKind::Sequence => Arc::new(SequenceGenerator::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequences_reserve_ranges() {
        let generator = SequenceGenerator::starting_at(5);
        assert_eq!(generator.generate().await.unwrap(), serde_json::json!(5));
        assert_eq!(
            generator.generate_batch(3).await.unwrap(),
            vec![serde_json::json!(6), serde_json::json!(7), serde_json::json!(8)]
        );
        assert_eq!(generator.generate().await.unwrap(), serde_json::json!(9));
    }

    #[tokio::test]
    async fn exhausted_sequences_fail() {
        let generator = SequenceGenerator::starting_at(i64::MAX - 2);
        assert_eq!(
            generator.generate().await.unwrap(),
            serde_json::json!(i64::MAX - 2)
        );
        assert!(generator.generate_batch(2).await.is_err());
        // a failed reservation leaves the sequence where it was
        assert_eq!(
            generator.generate().await.unwrap(),
            serde_json::json!(i64::MAX - 1)
        );
        assert!(generator.generate().await.is_err());
    }

    #[tokio::test]
    async fn uuids_are_distinct() {
        let ids = UuidGenerator.generate_batch(2).await.unwrap();
        assert_ne!(ids[0], ids[1]);
        assert!(ids[0].as_str().is_some_and(|id| id.len() == 36));
    }

    #[tokio::test]
    async fn metered_generators_count() {
        let counter = prometheus::IntCounter::new("ids", "ids").unwrap();
        let generator = Metered::new(for_kind(IdGeneratorKind::Sequence), counter.clone());
        generator.generate_batch(4).await.unwrap();
        generator.generate().await.unwrap();
        assert_eq!(counter.get(), 5);
    }
}
