use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::auth::Token;
use crate::error::{JuError, Result};

const DEFAULT_NUMBER_OF_BUILDS: usize = 3;
const DEFAULT_WIDTH: u32 = 280;
const DEFAULT_HEIGHT: u32 = 140;

/// Settings of one dashboard widget as stored in the board file.
///
/// Numeric settings are kept as written: form posts store them as strings,
/// hand-edited files as numbers. They are checked by [`validate`] and
/// converted by their accessors.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub name: String,
    pub base_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<Token>,
    pub api_token: Option<Token>,
    pub job: Option<String>,
    pub repo_path: Option<String>,
    pub pipeline: Option<String>,
    #[serde(default, deserialize_with = "raw_number")]
    number_of_builds: Option<String>,
    #[serde(default, deserialize_with = "raw_number")]
    number_of_instances: Option<String>,
    #[serde(default, deserialize_with = "raw_number")]
    width: Option<String>,
    #[serde(default, deserialize_with = "raw_number")]
    height: Option<String>,
}

fn raw_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

impl WidgetConfig {
    /// Widget id used in URLs: the name with spaces replaced by dashes.
    pub fn id(&self) -> String {
        widget_id(&self.name)
    }

    /// The basic-auth user, if one is configured.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref().filter(|u| !u.is_empty())
    }

    pub fn base_url<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(default)
    }

    pub fn job(&self) -> Result<&str> {
        self.required("job", self.job.as_deref())
    }

    pub fn repo_path(&self) -> Result<&str> {
        self.required("repo_path", self.repo_path.as_deref())
    }

    pub fn pipeline(&self) -> Result<&str> {
        self.required("pipeline", self.pipeline.as_deref())
    }

    pub fn number_of_builds(&self) -> Result<usize> {
        self.number(
            "number_of_builds",
            self.number_of_builds.as_deref(),
            DEFAULT_NUMBER_OF_BUILDS,
        )
    }

    pub fn number_of_instances(&self) -> Result<usize> {
        self.number(
            "number_of_instances",
            self.number_of_instances.as_deref(),
            DEFAULT_NUMBER_OF_BUILDS,
        )
    }

    pub fn width(&self) -> Result<u32> {
        self.number("width", self.width.as_deref(), DEFAULT_WIDTH)
    }

    pub fn height(&self) -> Result<u32> {
        self.number("height", self.height.as_deref(), DEFAULT_HEIGHT)
    }

    /// A source identifier the adapter cannot poll without.
    fn required<'a>(&self, field: &str, value: Option<&'a str>) -> Result<&'a str> {
        value.filter(|v| !v.is_empty()).ok_or_else(|| {
            JuError::Configuration(format!(
                "widget '{}' has no '{field}' configured",
                self.name
            ))
        })
    }

    fn number<T>(&self, field: &str, raw: Option<&str>, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match raw {
            None => Ok(default),
            Some(text) => text.trim().parse().map_err(|e| {
                JuError::Configuration(format!(
                    "widget '{}' has an invalid '{field}' ({text:?}): {e}",
                    self.name
                ))
            }),
        }
    }

    /// The stored value of a schema field, as the form layer sees it.
    pub fn value(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "base_url" => self.base_url.clone(),
            "user" => self.user.clone(),
            "password" => self.password.as_ref().map(|t| t.as_str().to_string()),
            "api_token" => self.api_token.as_ref().map(|t| t.as_str().to_string()),
            "job" => self.job.clone(),
            "repo_path" => self.repo_path.clone(),
            "pipeline" => self.pipeline.clone(),
            "number_of_builds" => self.number_of_builds.clone(),
            "number_of_instances" => self.number_of_instances.clone(),
            "width" => self.width.clone(),
            "height" => self.height.clone(),
            _ => None,
        }
    }
}

pub fn widget_id(name: &str) -> String {
    name.replace(' ', "-")
}

/// A board file: `{"board": "...", "widgets": [...]}`.
///
/// Widgets stay raw until asked for, so one malformed entry does not hide
/// the rest of the board.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: String,
    #[serde(default)]
    widgets: Vec<Value>,
}

impl BoardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading board config from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        let board = serde_json::from_str(&raw)?;
        Ok(board)
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Every widget in board order, with its name and its parsed settings.
    pub fn widgets(&self) -> impl Iterator<Item = (String, Result<WidgetConfig>)> + '_ {
        self.widgets.iter().map(|raw| {
            let name = raw
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let widget = WidgetConfig::deserialize(raw).map_err(|e| {
                JuError::Configuration(format!("widget '{name}' is malformed: {e}"))
            });
            (name, widget)
        })
    }

    pub fn widget(&self, id: &str) -> Result<WidgetConfig> {
        self.widgets()
            .find(|(name, _)| widget_id(name) == id)
            .map(|(_, widget)| widget)
            .unwrap_or_else(|| {
                Err(JuError::Configuration(format!(
                    "board '{}' has no widget '{id}'",
                    self.board
                )))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Text(&'static str),
    Number(u64),
}

impl Display for FieldDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldDefault::Text(text) => f.write_str(text),
            FieldDefault::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One entry of an adapter's config schema, rendered as a form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigField {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,
    pub description: &'static str,
    #[serde(rename = "validate")]
    pub validation_pattern: &'static str,
    pub validation_message: &'static str,
}

impl ConfigField {
    pub fn new(
        name: &'static str,
        description: &'static str,
        validation_pattern: &'static str,
        validation_message: &'static str,
    ) -> Self {
        Self {
            name,
            default: None,
            description,
            validation_pattern,
            validation_message,
        }
    }

    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }
}

/// Checks a widget against a schema, returning one message per failing field.
/// Missing fields fall back to their default, then to the empty string.
pub fn validate(schema: &[ConfigField], widget: &WidgetConfig) -> Result<Vec<String>> {
    let mut messages = Vec::new();

    for field in schema {
        let pattern = Regex::new(field.validation_pattern).map_err(|e| {
            JuError::Configuration(format!("invalid pattern for '{}': {e}", field.name))
        })?;

        let value = widget
            .value(field.name)
            .or_else(|| field.default.as_ref().map(ToString::to_string))
            .unwrap_or_default();

        if !pattern.is_match(&value) {
            messages.push(field.validation_message.to_string());
        }
    }

    Ok(messages)
}
