use super::types::{GocdHistoryDto, GocdModificationDto, GocdPipelineDto, GocdStageDto};
use crate::models::{short_sha, BuildRecord, BuildState, PollResult, StageResult};

/// Normalizes pipeline instances, keeping the newest `number_of_instances`.
pub fn transform(
    history: GocdHistoryDto,
    number_of_instances: usize,
    ago: &dyn Fn(i64) -> String,
) -> PollResult {
    let builds = history
        .pipelines
        .into_iter()
        .take(number_of_instances)
        .map(|pipeline| transform_pipeline(pipeline, ago))
        .collect();

    PollResult { builds }
}

fn transform_pipeline(pipeline: GocdPipelineDto, ago: &dyn Fn(i64) -> String) -> BuildRecord {
    let stages: Vec<StageResult> = pipeline.stages.iter().map(stage).collect();
    let mut record = BuildRecord::new(pipeline.label, pipeline_state(&stages));

    record.started = pipeline
        .stages
        .iter()
        .flat_map(|s| &s.jobs)
        .filter_map(|job| job.scheduled_date)
        .min()
        .map(|scheduled| format!("{} ago", ago(scheduled)));

    if let Some(cause) = pipeline.build_cause {
        let modification: Option<&GocdModificationDto> = cause
            .material_revisions
            .iter()
            .flat_map(|revision| &revision.modifications)
            .next();

        match modification {
            Some(modification) => {
                record.message = modification.comment.clone();
                record.author = modification.user_name.clone();
                record.commit_sha = modification.revision.as_deref().map(short_sha);
            }
            None => record.message = cause.trigger_message,
        }
    }

    record.stages = stages;
    record
}

fn stage(stage: &GocdStageDto) -> StageResult {
    StageResult {
        name: stage.name.clone(),
        state: stage_state(stage.result.as_deref()),
    }
}

pub fn stage_state(result: Option<&str>) -> BuildState {
    match result {
        Some("Passed") => BuildState::Passed,
        Some("Failed") => BuildState::Failed,
        Some("Unknown") => BuildState::Building,
        Some(other) => BuildState::Other(other.to_string()),
        None => BuildState::Scheduled,
    }
}

/// The first stage that did not pass decides; a pipeline with no stages has
/// not been scheduled yet.
fn pipeline_state(stages: &[StageResult]) -> BuildState {
    if stages.is_empty() {
        return BuildState::Scheduled;
    }
    stages
        .iter()
        .find(|s| s.state != BuildState::Passed)
        .map_or(BuildState::Passed, |s| s.state.clone())
}
