//! Lookup from a widget's configured `type` to the adapter that polls it.
//!
//! The registry is built once at startup from an explicit list of adapters
//! and then shared read-only by every poll.

use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use reqwest::Client;

use crate::config::{ConfigField, WidgetConfig};
use crate::error::{JuError, Result};
use crate::providers::gocd::GocdPipeline;
use crate::providers::jenkins::JenkinsJob;
use crate::providers::travis::TravisCi;
use crate::providers::Adapter;

#[derive(Default)]
pub struct AdapterRegistry {
    adapters: IndexMap<String, Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every built-in adapter on a shared HTTP client.
    pub fn with_builtin(client: &Client) -> Self {
        let adapters: [Arc<dyn Adapter>; 3] = [
            Arc::new(JenkinsJob::new(client.clone())),
            Arc::new(TravisCi::new(client.clone())),
            Arc::new(GocdPipeline::new(client.clone())),
        ];

        let mut registry = Self::new();
        for adapter in adapters {
            registry.register(adapter.type_name(), adapter);
        }
        registry
    }

    /// Registers `adapter` under `type_name`, replacing any previous one.
    pub fn register(&mut self, type_name: impl Into<String>, adapter: Arc<dyn Adapter>) {
        let type_name = type_name.into();
        debug!("Registering adapter '{type_name}'");
        self.adapters.insert(type_name, adapter);
    }

    pub fn resolve(&self, type_name: &str) -> Result<Arc<dyn Adapter>> {
        self.adapters.get(type_name).cloned().ok_or_else(|| {
            JuError::Configuration(format!("unknown widget type '{type_name}'"))
        })
    }

    /// Registered types, in registration order.
    pub fn types(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }

    pub fn schema(&self, type_name: &str) -> Result<Vec<ConfigField>> {
        Ok(self.resolve(type_name)?.config_schema())
    }

    /// Polls and renders `widget` with the adapter its `type` names.
    pub async fn check(&self, widget: &WidgetConfig) -> Result<String> {
        let adapter = self.resolve(&widget.widget_type)?;
        adapter.check(widget).await
    }
}
