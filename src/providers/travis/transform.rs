use std::collections::HashMap;

use chrono::DateTime;

use super::types::{TravisBuildDto, TravisBuildsDto, TravisCommitDto};
use crate::error::{JuError, Result};
use crate::models::{short_sha, BuildRecord, BuildState, PollResult};

/// Keeps the first `number_of_instances` builds and joins each with its
/// commit. The API has no limit parameter, so the cap is applied here.
///
/// A build whose commit is missing from the response is an error rather
/// than a silently dropped row.
pub fn transform(
    response: TravisBuildsDto,
    number_of_instances: usize,
    ago: &dyn Fn(i64) -> String,
) -> Result<PollResult> {
    let commits: HashMap<u64, &TravisCommitDto> =
        response.commits.iter().map(|c| (c.id, c)).collect();

    let builds = response
        .builds
        .iter()
        .take(number_of_instances)
        .map(|build| {
            let commit = commits.get(&build.commit_id).ok_or_else(|| {
                JuError::Transform(format!(
                    "travis-ci build {} references commit {} which is not in the response",
                    build.number, build.commit_id
                ))
            })?;
            transform_build(build, commit, ago)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PollResult { builds })
}

fn transform_build(
    build: &TravisBuildDto,
    commit: &TravisCommitDto,
    ago: &dyn Fn(i64) -> String,
) -> Result<BuildRecord> {
    let mut record = BuildRecord::new(build.number.clone(), state(&build.state));
    record.author = commit.author_name.clone();
    record.started = build
        .started_at
        .as_deref()
        .map(|started_at| started(started_at, ago))
        .transpose()?;
    record.branch = commit.branch.clone();
    record.commit_sha = Some(short_sha(&commit.sha));
    record.message = commit.message.clone();
    Ok(record)
}

pub fn state(state: &str) -> BuildState {
    match state {
        "created" => BuildState::Scheduled,
        "started" => BuildState::Building,
        other => BuildState::Other(other.to_string()),
    }
}

fn started(started_at: &str, ago: &dyn Fn(i64) -> String) -> Result<String> {
    let at = DateTime::parse_from_rfc3339(started_at).map_err(|e| {
        JuError::Transform(format!("travis-ci started_at '{started_at}' is not a timestamp: {e}"))
    })?;
    Ok(format!("{} ago", ago(at.timestamp_millis())))
}
