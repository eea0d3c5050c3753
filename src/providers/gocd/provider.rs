use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

use super::transform::transform;
use super::types::GocdHistoryDto;
use crate::config::{ConfigField, FieldDefault, WidgetConfig};
use crate::error::{JuError, Result};
use crate::models::PollResult;
use crate::providers::http::{fetch_json, parse_base_url};
use crate::providers::Adapter;
use crate::render::{render_style, render_widget, DEFAULT_LAYOUT};
use crate::time::ago_in_words;

const TYPE_NAME: &str = "gocd_pipeline";
const ERROR_PREFIX: &str = "Failed to get GoCD pipeline information.";
const DEFAULT_BASE_URL: &str = "http://localhost:8153";

/// Polls the instance history of a GoCD pipeline.
pub struct GocdPipeline {
    client: Client,
}

impl GocdPipeline {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn history_url(base_url: &str, pipeline: &str) -> Result<Url> {
        let mut url = parse_base_url(base_url, ERROR_PREFIX)?;
        url.path_segments_mut()
            .map_err(|()| JuError::remote(ERROR_PREFIX, format!("{base_url} cannot be a base URL")))?
            .pop_if_empty()
            .extend(["go", "api", "pipelines", pipeline, "history", "0"]);
        Ok(url)
    }
}

#[async_trait]
impl Adapter for GocdPipeline {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn config_schema(&self) -> Vec<ConfigField> {
        vec![
            ConfigField::new(
                "base_url",
                "Server Base URL",
                r"^[0-9a-zA-Z\-_:/.]+$",
                "Server base URL is not a valid URL.",
            )
            .with_default(FieldDefault::Text(DEFAULT_BASE_URL)),
            ConfigField::new(
                "pipeline",
                "Pipeline Name",
                r"^[0-9a-zA-Z\-_.]+$",
                "Pipeline Name can only contain alphanumeric characters, dash, underscore and period.",
            ),
            ConfigField::new("user", "User Name", "^.*$", "User Name can be any characters."),
            ConfigField::new("password", "Password", "^.*$", "Password can be any characters."),
            ConfigField::new(
                "number_of_instances",
                "Number of Instances",
                "^[0-9]+$",
                "Number of Instances must be digits.",
            )
            .with_default(FieldDefault::Number(3)),
        ]
    }

    async fn poll(&self, options: &WidgetConfig) -> Result<PollResult> {
        let pipeline = options.pipeline()?;
        let url = Self::history_url(options.base_url(DEFAULT_BASE_URL), pipeline)?;
        debug!("Polling GoCD pipeline history at {url}");

        let mut request = self.client.get(url);
        if let Some(user) = options.user() {
            request = request.basic_auth(user, options.password.as_ref().map(|p| p.as_str()));
        }

        let history = fetch_json::<GocdHistoryDto>(request, ERROR_PREFIX).await?;
        Ok(transform(
            history,
            options.number_of_instances()?,
            &ago_in_words,
        ))
    }

    fn render(&self, data: &PollResult, options: &WidgetConfig) -> Result<String> {
        let title = format!("Pipeline: {}", options.pipeline.as_deref().unwrap_or_default());
        render_widget(TYPE_NAME, data, options, &title, &DEFAULT_LAYOUT)
    }

    fn style(&self) -> Result<String> {
        render_style(TYPE_NAME, &DEFAULT_LAYOUT)
    }
}
