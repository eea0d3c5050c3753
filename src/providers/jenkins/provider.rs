use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

use super::transform::transform;
use super::types::JenkinsJobDto;
use crate::config::{ConfigField, FieldDefault, WidgetConfig};
use crate::error::{JuError, Result};
use crate::models::PollResult;
use crate::providers::http::{fetch_json, parse_base_url};
use crate::providers::Adapter;
use crate::render::{render_style, render_widget, DEFAULT_LAYOUT};
use crate::time::ago_in_words;

const TYPE_NAME: &str = "jenkins_job";
const ERROR_PREFIX: &str = "Failed to get Jenkins job information.";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Polls one Jenkins job through its JSON API.
pub struct JenkinsJob {
    client: Client,
}

impl JenkinsJob {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Asks Jenkins for only the fields we render, capped server-side.
    fn tree_param(number_of_builds: usize) -> String {
        format!(
            "builds[number,url,result,timestamp,building,actions[causes[shortDescription]],changeSet[items[msg,commitId,author[fullName]]]]{{0,{number_of_builds}}}"
        )
    }

    fn job_url(base_url: &str, job: &str) -> Result<Url> {
        let mut url = parse_base_url(base_url, ERROR_PREFIX)?;
        url.path_segments_mut()
            .map_err(|()| JuError::remote(ERROR_PREFIX, format!("{base_url} cannot be a base URL")))?
            .pop_if_empty()
            .extend(["job", job, "api", "json"]);
        Ok(url)
    }
}

#[async_trait]
impl Adapter for JenkinsJob {
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
                "job",
                "Job Name",
                r"^[0-9a-zA-Z\-_ ]+$",
                "Job Name can only contain alphanumeric characters, space, dash and underscore.",
            ),
            ConfigField::new("user", "User Name", "^.*$", "User Name can be any characters."),
            ConfigField::new("password", "Password", "^.*$", "Password can be any characters."),
            ConfigField::new(
                "number_of_builds",
                "Number of Builds",
                "^[0-9]+$",
                "Number of Builds must be digits.",
            )
            .with_default(FieldDefault::Number(3)),
        ]
    }

    async fn poll(&self, options: &WidgetConfig) -> Result<PollResult> {
        let job = options.job()?;
        let url = Self::job_url(options.base_url(DEFAULT_BASE_URL), job)?;
        debug!("Polling Jenkins job at {url}");

        let mut request = self
            .client
            .get(url)
            .query(&[("tree", Self::tree_param(options.number_of_builds()?))]);
        if let Some(user) = options.user() {
            request = request.basic_auth(user, options.password.as_ref().map(|p| p.as_str()));
        }

        let job = fetch_json::<JenkinsJobDto>(request, ERROR_PREFIX).await?;
        Ok(transform(job, &ago_in_words))
    }

    fn render(&self, data: &PollResult, options: &WidgetConfig) -> Result<String> {
        let title = format!("Job: {}", options.job.as_deref().unwrap_or_default());
        render_widget(TYPE_NAME, data, options, &title, &DEFAULT_LAYOUT)
    }

    fn style(&self) -> Result<String> {
        render_style(TYPE_NAME, &DEFAULT_LAYOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildRecord, BuildState, Change};
    use crate::providers::http::{build_client, DEFAULT_TIMEOUT};
    use mockito::Matcher;

    const BUILDS: &str = r#"{
        "builds": [
            {
                "number": 12,
                "result": null,
                "timestamp": 1699999880000,
                "building": true,
                "actions": [{"causes": [{"shortDescription": "Started by user admin"}]}],
                "changeSet": {"items": []}
            },
            {
                "number": 11,
                "result": "SUCCESS",
                "timestamp": 1699990000000,
                "building": false,
                "actions": [],
                "changeSet": {"items": [{"msg": "fix bug", "commitId": "abcdef0123456789abcdef0123456789abcdef01", "author": {"fullName": "Jane Doe"}}]}
            }
        ]
    }"#;

    fn adapter() -> JenkinsJob {
        JenkinsJob::new(build_client(DEFAULT_TIMEOUT).unwrap())
    }

    fn widget(json: &str) -> WidgetConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_tree_param_limits_builds() {
        let tree = JenkinsJob::tree_param(5);

        assert!(tree.starts_with("builds[number,url,result,timestamp,building,"));
        assert!(tree.contains("changeSet[items[msg,commitId,author[fullName]]]"));
        assert!(tree.ends_with("]{0,5}"));
    }

    #[test]
    fn test_job_url_escapes_job_name() {
        let url = JenkinsJob::job_url("http://ci.example.com:8080/", "my job").unwrap();

        assert_eq!(url.as_str(), "http://ci.example.com:8080/job/my%20job/api/json");
    }

    #[test]
    fn test_job_url_keeps_base_path() {
        let url = JenkinsJob::job_url("http://ci.example.com/jenkins", "ju").unwrap();

        assert_eq!(url.as_str(), "http://ci.example.com/jenkins/job/ju/api/json");
    }

    #[test]
    fn test_schema_fields() {
        let names: Vec<&str> = adapter().config_schema().iter().map(|f| f.name).collect();

        assert_eq!(names, vec!["base_url", "job", "user", "password", "number_of_builds"]);
    }

    #[tokio::test]
    async fn test_poll_requests_tree_with_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/job/ju/api/json")
            .match_query(Matcher::UrlEncoded("tree".into(), JenkinsJob::tree_param(2)))
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BUILDS)
            .create_async()
            .await;

        let options = widget(&format!(
            r#"{{"type": "jenkins_job", "name": "ju", "base_url": "{}", "job": "ju", "user": "admin", "password": "secret", "number_of_builds": "2"}}"#,
            server.url()
        ));

        let result = adapter().poll(&options).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.builds.len(), 2);
        assert_eq!(result.builds[0].state, BuildState::Building);
        assert_eq!(result.builds[0].causes, vec!["Started by user admin"]);
        assert_eq!(result.builds[1].state, BuildState::Passed);
        assert_eq!(result.builds[1].changes[0].commit_id, "abcdef0");
    }

    #[tokio::test]
    async fn test_poll_without_user_sends_no_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/job/ju/api/json")
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"builds": []}"#)
            .create_async()
            .await;

        let options = widget(&format!(
            r#"{{"type": "jenkins_job", "base_url": "{}", "job": "ju"}}"#,
            server.url()
        ));

        let result = adapter().poll(&options).await.unwrap();

        mock.assert_async().await;
        assert!(result.builds.is_empty());
    }

    #[tokio::test]
    async fn test_poll_error_status_is_remote_connection_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/job/ju/api/json")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let options = widget(&format!(
            r#"{{"type": "jenkins_job", "base_url": "{}", "job": "ju"}}"#,
            server.url()
        ));

        let err = adapter().poll(&options).await.unwrap_err();

        assert!(matches!(err, JuError::RemoteConnection(_)));
        assert!(err.to_string().starts_with(ERROR_PREFIX));
    }

    #[tokio::test]
    async fn test_poll_connection_refused_is_remote_connection_error() {
        let options = widget(r#"{"type": "jenkins_job", "base_url": "http://127.0.0.1:1", "job": "ju"}"#);

        let err = adapter().poll(&options).await.unwrap_err();

        assert!(matches!(err, JuError::RemoteConnection(_)));
        let message = err.to_string();
        assert!(message.starts_with("Failed to get Jenkins job information. "));
        assert!(message.to_lowercase().contains("refused"), "{message}");
        assert!(!message.contains("tree="), "{message}");
    }

    #[tokio::test]
    async fn test_poll_without_job_is_configuration_error() {
        let options = widget(r#"{"type": "jenkins_job", "name": "w"}"#);

        let err = adapter().poll(&options).await.unwrap_err();

        assert!(matches!(err, JuError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_poll_with_non_numeric_builds_is_configuration_error() {
        let options = widget(
            r#"{"type": "jenkins_job", "name": "w", "base_url": "http://127.0.0.1:1", "job": "ju", "number_of_builds": "many"}"#,
        );

        let err = adapter().poll(&options).await.unwrap_err();

        assert!(matches!(err, JuError::Configuration(_)));
        assert!(err.to_string().contains("'number_of_builds'"));
    }

    #[test]
    fn test_render_changes_and_causes() {
        let mut passed = BuildRecord::new("11", BuildState::Passed);
        passed.started = Some("5 minutes ago".to_string());
        passed.changes = vec![Change {
            author: Some("Jane Doe".to_string()),
            commit_id: "abcdef0".to_string(),
            message: "fix bug".to_string(),
        }];
        let mut building = BuildRecord::new("12", BuildState::Building);
        building.causes = vec!["Started by user admin".to_string()];
        let data = PollResult {
            builds: vec![building, passed],
        };
        let options = widget(r#"{"type": "jenkins_job", "name": "Ju", "job": "ju"}"#);

        let html = adapter().render(&data, &options).unwrap();

        assert!(html.contains(r#"<div class="jenkins-title" title="Job: ju">Ju</div>"#));
        assert!(html.contains(r#"style="height: 110px""#));
        assert!(html.contains(r#"style="height: 49.00%""#));
        assert!(html.contains(r#"<div class="jenkins-build building">"#));
        assert!(html.contains(r#"<div class="jenkins-build passed">"#));
        assert!(html.contains(">Started by user admin</div>"));
        assert!(html.contains("Commit ID: abcdef0"));
        assert!(html.contains(">fix bug</div>"));
        assert!(html.contains(r#"style="width: 193px""#));
    }

    #[test]
    fn test_render_empty_build_list() {
        let options = widget(r#"{"type": "jenkins_job", "name": "Ju", "job": "ju"}"#);

        let html = adapter().render(&PollResult::default(), &options).unwrap();

        assert!(html.contains(r#"<div class="jenkins-builds""#));
        assert!(!html.contains("jenkins-build-wrapper"));
    }

    #[test]
    fn test_style_uses_layout() {
        let css = adapter().style().unwrap();

        assert!(css.contains("height: 27px;"));
        assert!(css.contains("padding-top: 3px;"));
        assert!(css.contains("width: 84px;"));
    }
}
