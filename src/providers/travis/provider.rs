use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use url::Url;

use super::transform::transform;
use super::types::TravisBuildsDto;
use crate::config::{ConfigField, FieldDefault, WidgetConfig};
use crate::error::{JuError, Result};
use crate::models::PollResult;
use crate::providers::http::{fetch_json, parse_base_url};
use crate::providers::Adapter;
use crate::render::{render_style, render_widget, Layout, DEFAULT_LAYOUT};
use crate::time::ago_in_words;

const TYPE_NAME: &str = "travis_ci";
const ERROR_PREFIX: &str = "Failed to get travis-ci build information.";
const DEFAULT_BASE_URL: &str = "https://api.travis-ci.org";

// API v2 only answers clients that send this media type and a client-style agent.
const ACCEPT_V2: &str = "application/vnd.travis-ci.2+json";
const CLIENT_AGENT: &str = "MyClient/1.0.0";

const LAYOUT: Layout = Layout {
    details_margin: 4,
    ..DEFAULT_LAYOUT
};

/// Polls the build history of a Travis CI repository.
pub struct TravisCi {
    client: Client,
}

impl TravisCi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn builds_url(base_url: &str, repo_path: &str) -> Result<Url> {
        let mut url = parse_base_url(base_url, ERROR_PREFIX)?;
        url.path_segments_mut()
            .map_err(|()| JuError::remote(ERROR_PREFIX, format!("{base_url} cannot be a base URL")))?
            .pop_if_empty()
            .push("repos")
            .extend(repo_path.split('/').filter(|s| !s.is_empty()))
            .push("builds");
        Ok(url)
    }
}

#[async_trait]
impl Adapter for TravisCi {
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
                "repo_path",
                "Repository Path",
                r"^[0-9a-zA-Z\-_/]+$",
                "Repository Path can only contain alphanumeric characters and slash, eg., boo/foo.",
            ),
            ConfigField::new(
                "api_token",
                "API Token",
                "^[0-9a-zA-Z]+$",
                "API Token can only contain alphanumeric characters.",
            ),
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
        let repo_path = options.repo_path()?;
        let url = Self::builds_url(options.base_url(DEFAULT_BASE_URL), repo_path)?;
        debug!("Polling travis-ci builds at {url}");

        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_AGENT)
            .header(ACCEPT, ACCEPT_V2);
        if let Some(token) = &options.api_token {
            request = request.header(AUTHORIZATION, format!("token {}", token.as_str()));
        }

        let response = fetch_json::<TravisBuildsDto>(request, ERROR_PREFIX).await?;
        transform(response, options.number_of_instances()?, &ago_in_words)
    }

    fn render(&self, data: &PollResult, options: &WidgetConfig) -> Result<String> {
        let title = format!("Repo: {}", options.repo_path.as_deref().unwrap_or_default());
        render_widget(TYPE_NAME, data, options, &title, &LAYOUT)
    }

    fn style(&self) -> Result<String> {
        render_style(TYPE_NAME, &LAYOUT)
    }
}
