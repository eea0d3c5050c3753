use serde::Deserialize;

/// `GET /job/{job}/api/json?tree=builds[...]`
#[derive(Debug, Deserialize)]
pub struct JenkinsJobDto {
    #[serde(default)]
    pub builds: Vec<JenkinsBuildDto>,
}

#[derive(Debug, Deserialize)]
pub struct JenkinsBuildDto {
    pub number: u64,
    pub result: Option<String>,
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub actions: Vec<Option<JenkinsActionDto>>,
    #[serde(rename = "changeSet")]
    pub change_set: Option<JenkinsChangeSetDto>,
}

#[derive(Debug, Deserialize)]
pub struct JenkinsActionDto {
    #[serde(default)]
    pub causes: Vec<JenkinsCauseDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsCauseDto {
    pub short_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JenkinsChangeSetDto {
    #[serde(default)]
    pub items: Vec<JenkinsChangeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsChangeDto {
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub commit_id: String,
    pub author: Option<JenkinsAuthorDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsAuthorDto {
    pub full_name: Option<String>,
}
