//! Transient state used by the server.
//!
//! This is initialized on startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info_span, Instrument};

use query_engine_execution::id_generators::{self, Metered, SequenceGenerator};
use query_engine_execution::{metrics, Executor, MemoryStore, Row};
use query_engine_metadata::metadata::{EntityInfo, IdGeneratorKind};
use query_engine_translation::translation::mutation::id_generator::IdGenerator;
use rest_store_configuration::Configuration;

/// Rows loaded into the store on startup, by entity name.
pub type SeedData = BTreeMap<String, Vec<Row>>;

/// State for our server.
#[derive(Clone)]
pub struct ServerState {
    pub configuration: Arc<Configuration>,
    pub executor: Arc<dyn Executor>,
    /// Identifier generators of the entities that declare one, by entity name.
    pub id_generators: Arc<BTreeMap<String, Arc<dyn IdGenerator>>>,
    pub metrics: metrics::Metrics,
    pub metrics_registry: prometheus::Registry,
}

impl ServerState {
    pub fn id_generator(&self, entity_name: &str) -> Option<&dyn IdGenerator> {
        self.id_generators.get(entity_name).map(AsRef::as_ref)
    }
}

/// Create the in-memory store, load the seed rows into it and wrap it inside a server state.
pub async fn create_state(
    configuration: Configuration,
    seed: SeedData,
) -> Result<ServerState, InitializationError> {
    let mut metrics_registry = prometheus::Registry::new();
    let metrics = async { metrics::initialise_metrics(&mut metrics_registry) }
        .instrument(info_span!("Setup metrics"))
        .await?;

    let id_generators = configuration
        .metadata
        .entities
        .0
        .values()
        .filter_map(|entity| {
            let kind = entity.id_generator?;
            let inner: Arc<dyn IdGenerator> = match kind {
                // seeded rows must not collide with generated keys
                IdGeneratorKind::Sequence => Arc::new(SequenceGenerator::starting_at(
                    next_sequence_value(entity, seed.get(&entity.name)),
                )),
                IdGeneratorKind::Uuid => id_generators::for_kind(kind),
            };
            let generator: Arc<dyn IdGenerator> = Arc::new(Metered::new(
                inner,
                metrics.generated_identifiers_total.clone(),
            ));
            Some((entity.name.clone(), generator))
        })
        .collect();

    let store = MemoryStore::new(configuration.metadata.clone());
    async {
        for (entity_name, rows) in seed {
            tracing::info!(entity = %entity_name, rows = rows.len(), "seeding store");
            store.seed(&entity_name, rows).await?;
        }
        Ok::<_, InitializationError>(())
    }
    .instrument(info_span!("Seed store"))
    .await?;

    Ok(ServerState {
        configuration: Arc::new(configuration),
        executor: Arc::new(store),
        id_generators: Arc::new(id_generators),
        metrics,
        metrics_registry,
    })
}

/// One past the greatest integer key among the rows, or 1.
fn next_sequence_value(entity: &EntityInfo, rows: Option<&Vec<Row>>) -> i64 {
    rows.into_iter()
        .flatten()
        .filter_map(|row| row.get(&entity.primary_key)?.as_i64())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("error initializing metrics: {0}")]
    MetricsError(#[from] metrics::InitializationError),
    #[error("unable to seed the store: {0}")]
    SeedError(#[from] query_engine_execution::Error),
}
