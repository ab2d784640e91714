//! Serving-config resource-path composition.
//!
//! The search service locates an index through a fully-qualified
//! serving-config path. Two addressing modes exist — by data store or by
//! engine — and deployments disagree on which serving-config ids are
//! actually exposed, so the adapter works through an ordered candidate list
//! instead of a single hardcoded path.

use docgate_core::config::RetrievalConfig;
use docgate_core::error::{DocGateError, Result};

/// How the search index is addressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Addressing {
    DataStore(String),
    Engine(String),
}

/// Resolves the ordered list of fully-qualified serving-config candidates.
#[derive(Debug, Clone)]
pub struct ResourcePaths {
    project: String,
    location: String,
    collection: String,
    addressing: Option<Addressing>,
    serving_configs: Vec<String>,
    explicit: Option<String>,
}

impl ResourcePaths {
    pub fn from_config(cfg: &RetrievalConfig) -> Result<Self> {
        let addressing = match (cfg.data_store.is_empty(), cfg.engine.is_empty()) {
            (false, false) => {
                return Err(DocGateError::Config(
                    "Set either retrieval.data_store or retrieval.engine, not both".into(),
                ));
            }
            (false, true) => Some(Addressing::DataStore(cfg.data_store.clone())),
            (true, false) => Some(Addressing::Engine(cfg.engine.clone())),
            (true, true) => None,
        };

        let explicit = (!cfg.serving_config_path.is_empty()).then(|| cfg.serving_config_path.clone());
        if addressing.is_some() && cfg.project.is_empty() {
            return Err(DocGateError::Config("retrieval.project is not set".into()));
        }
        if addressing.is_none() && explicit.is_none() {
            return Err(DocGateError::Config(
                "No addressing configured: set a data store, an engine, or an explicit serving-config path".into(),
            ));
        }

        Ok(Self {
            project: cfg.project.clone(),
            location: cfg.location.clone(),
            collection: cfg.collection.clone(),
            addressing,
            serving_configs: cfg.serving_configs.clone(),
            explicit,
        })
    }

    fn serving_config_path(&self, addressing: &Addressing, id: &str) -> String {
        let (kind, target) = match addressing {
            Addressing::DataStore(d) => ("dataStores", d),
            Addressing::Engine(e) => ("engines", e),
        };
        format!(
            "projects/{}/locations/{}/collections/{}/{kind}/{target}/servingConfigs/{id}",
            self.project, self.location, self.collection
        )
    }

    /// Ordered candidates to try; the explicit path, when configured, comes
    /// last.
    pub fn candidates(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(addressing) = &self.addressing {
            for id in &self.serving_configs {
                out.push(self.serving_config_path(addressing, id));
            }
        }
        if let Some(path) = &self.explicit {
            out.push(path.clone());
        }
        out
    }
}

/// API base for the search call; non-global indexes live on a
/// location-prefixed host.
pub fn search_endpoint(cfg: &RetrievalConfig) -> String {
    if !cfg.endpoint.is_empty() {
        return cfg.endpoint.trim_end_matches('/').to_string();
    }
    if cfg.location == "global" {
        "https://discoveryengine.googleapis.com/v1beta".to_string()
    } else {
        format!("https://{}-discoveryengine.googleapis.com/v1beta", cfg.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> RetrievalConfig {
        let mut cfg = RetrievalConfig::default();
        cfg.project = "28062079972".into();
        cfg
    }

    #[test]
    fn test_data_store_paths() {
        let mut cfg = base_config();
        cfg.data_store = "docs_gcs_store".into();
        let paths = ResourcePaths::from_config(&cfg).unwrap();
        let candidates = paths.candidates();
        assert_eq!(
            candidates,
            vec![
                "projects/28062079972/locations/global/collections/default_collection/dataStores/docs_gcs_store/servingConfigs/default_search",
                "projects/28062079972/locations/global/collections/default_collection/dataStores/docs_gcs_store/servingConfigs/default_serving_config",
            ]
        );
    }

    #[test]
    fn test_engine_paths() {
        let mut cfg = base_config();
        cfg.engine = "docs-engine".into();
        cfg.serving_configs = vec!["default_search".into()];
        let candidates = ResourcePaths::from_config(&cfg).unwrap().candidates();
        assert_eq!(
            candidates,
            vec![
                "projects/28062079972/locations/global/collections/default_collection/engines/docs-engine/servingConfigs/default_search",
            ]
        );
    }

    #[test]
    fn test_explicit_path_appended_last() {
        let mut cfg = base_config();
        cfg.data_store = "store".into();
        cfg.serving_configs = vec!["default_search".into()];
        cfg.serving_config_path = "projects/p/locations/global/collections/c/engines/e/servingConfigs/s".into();
        let candidates = ResourcePaths::from_config(&cfg).unwrap().candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1], cfg.serving_config_path);
    }

    #[test]
    fn test_explicit_path_alone_is_enough() {
        let mut cfg = RetrievalConfig::default();
        cfg.serving_config_path = "projects/p/locations/global/collections/c/dataStores/d/servingConfigs/s".into();
        let candidates = ResourcePaths::from_config(&cfg).unwrap().candidates();
        assert_eq!(candidates, vec![cfg.serving_config_path.clone()]);
    }

    #[test]
    fn test_both_modes_rejected() {
        let mut cfg = base_config();
        cfg.data_store = "store".into();
        cfg.engine = "engine".into();
        assert!(ResourcePaths::from_config(&cfg).is_err());
    }

    #[test]
    fn test_no_addressing_rejected() {
        let cfg = base_config();
        assert!(ResourcePaths::from_config(&cfg).is_err());
    }

    #[test]
    fn test_search_endpoint_by_location() {
        let mut cfg = base_config();
        assert_eq!(
            search_endpoint(&cfg),
            "https://discoveryengine.googleapis.com/v1beta"
        );
        cfg.location = "eu".into();
        assert_eq!(
            search_endpoint(&cfg),
            "https://eu-discoveryengine.googleapis.com/v1beta"
        );
        cfg.endpoint = "https://mock.local/v1beta/".into();
        assert_eq!(search_endpoint(&cfg), "https://mock.local/v1beta");
    }
}
