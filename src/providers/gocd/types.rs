use serde::Deserialize;

/// `GET /go/api/pipelines/{pipeline}/history/0`, newest instance first.
#[derive(Debug, Deserialize)]
pub struct GocdHistoryDto {
    #[serde(default)]
    pub pipelines: Vec<GocdPipelineDto>,
}

#[derive(Debug, Deserialize)]
pub struct GocdPipelineDto {
    pub label: String,
    pub build_cause: Option<GocdBuildCauseDto>,
    #[serde(default)]
    pub stages: Vec<GocdStageDto>,
}

#[derive(Debug, Deserialize)]
pub struct GocdBuildCauseDto {
    pub trigger_message: Option<String>,
    #[serde(default)]
    pub material_revisions: Vec<GocdMaterialRevisionDto>,
}

#[derive(Debug, Deserialize)]
pub struct GocdMaterialRevisionDto {
    #[serde(default)]
    pub modifications: Vec<GocdModificationDto>,
}

#[derive(Debug, Deserialize)]
pub struct GocdModificationDto {
    pub revision: Option<String>,
    pub comment: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GocdStageDto {
    pub name: String,
    /// Absent until the stage has been scheduled.
    pub result: Option<String>,
    #[serde(default)]
    pub jobs: Vec<GocdJobDto>,
}

#[derive(Debug, Deserialize)]
pub struct GocdJobDto {
    /// Epoch milliseconds.
    pub scheduled_date: Option<i64>,
}
