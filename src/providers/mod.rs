pub mod gocd;
pub mod http;
pub mod jenkins;
pub mod travis;

use async_trait::async_trait;
use log::info;

use crate::config::{ConfigField, WidgetConfig};
use crate::error::Result;
use crate::models::PollResult;

/// A CI data source a widget can poll.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// The widget `type` this adapter serves, e.g. `jenkins_job`.
    fn type_name(&self) -> &'static str;

    /// Form fields the widget needs. The adapter trusts its input and does
    /// not validate against this itself.
    fn config_schema(&self) -> Vec<ConfigField>;

    /// Fetches the current builds from the remote server.
    async fn poll(&self, options: &WidgetConfig) -> Result<PollResult>;

    fn render(&self, data: &PollResult, options: &WidgetConfig) -> Result<String>;

    fn style(&self) -> Result<String>;

    /// Poll, then render.
    async fn check(&self, options: &WidgetConfig) -> Result<String> {
        let data = self.poll(options).await?;
        info!(
            "{} widget '{}' polled {} builds",
            self.type_name(),
            options.name,
            data.builds.len()
        );
        self.render(&data, options)
    }
}
