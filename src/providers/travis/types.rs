use serde::Deserialize;

/// `GET /repos/{owner}/{name}/builds` (API v2). Builds and their commits
/// come back as two parallel lists joined on `commit_id`.
#[derive(Debug, Deserialize)]
pub struct TravisBuildsDto {
    #[serde(default)]
    pub builds: Vec<TravisBuildDto>,
    #[serde(default)]
    pub commits: Vec<TravisCommitDto>,
}

#[derive(Debug, Deserialize)]
pub struct TravisBuildDto {
    pub number: String,
    pub state: String,
    pub started_at: Option<String>,
    pub commit_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct TravisCommitDto {
    pub id: u64,
    pub sha: String,
    pub branch: Option<String>,
    pub message: Option<String>,
    pub author_name: Option<String>,
}
