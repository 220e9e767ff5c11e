use anyhow::Context;
use hub_config::Config;
use hub_core::preprocess::QueryPreprocessor;
use hub_engine::SearchEngine;
use hub_fetch::NaverClient;
use hub_state::StateStore;

pub struct AppState {
    pub engine: SearchEngine<NaverClient>,
    pub store: StateStore,
    pub preprocessor: QueryPreprocessor,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client =
            NaverClient::new(config.network.clone()).context("Failed to build HTTP client")?;
        let engine = SearchEngine::new(client, &config);

        let store = StateStore::new(&config.state);
        store
            .init()
            .with_context(|| format!("Failed to open data dir {}", store.data_dir().display()))?;

        Ok(Self {
            engine,
            store,
            preprocessor: QueryPreprocessor,
        })
    }
}
