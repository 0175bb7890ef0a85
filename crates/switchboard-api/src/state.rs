//! Application state wiring the orchestrator to its infrastructure.
//!
//! The orchestrator is generic over its collaborator traits; `AppState`
//! pins them to the concrete infra implementations and adds the
//! cancellation registry the HTTP layer uses to reach in-flight tasks.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use switchboard_core::orchestrator::Orchestrator;
use switchboard_infra::browse::HttpBrowsingAgent;
use switchboard_infra::config::{api_key_from_env, data_dir, load_global_config};
use switchboard_infra::llm::HttpCompletionBackend;
use switchboard_infra::store::JsonFileMemoryStore;
use switchboard_types::config::GlobalConfig;

/// The orchestrator pinned to the concrete infra implementations.
pub type ConcreteOrchestrator =
    Orchestrator<JsonFileMemoryStore, HttpCompletionBackend, HttpBrowsingAgent>;

/// Shared application state used by the CLI and the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    /// In-flight tasks by id; the cancel endpoint fires these tokens.
    pub tasks: Arc<DashMap<String, CancellationToken>>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub store_path: PathBuf,
}

impl AppState {
    /// Load configuration and wire the orchestrator.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let api_key = api_key_from_env()
            .ok_or_else(|| anyhow::anyhow!("SWITCHBOARD_API_KEY or OPENAI_API_KEY is required"))?;

        let store_path = JsonFileMemoryStore::default_path(&data_dir);
        let memory = JsonFileMemoryStore::open(store_path.clone());
        let backend = HttpCompletionBackend::new(
            api_key,
            config.backend_base_url.clone(),
            config.model.clone(),
        );
        let browser = HttpBrowsingAgent::new(
            config.browse_base_url.clone(),
            config.browse_timeout_secs,
            config.browse_attempts,
        );
        let orchestrator = Orchestrator::new(memory, backend, browser, config.max_history_turns);

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            tasks: Arc::new(DashMap::new()),
            config,
            data_dir,
            store_path,
        })
    }
}
