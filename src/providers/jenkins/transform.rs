use super::types::{JenkinsActionDto, JenkinsBuildDto, JenkinsChangeDto, JenkinsJobDto};
use crate::models::{short_sha, BuildRecord, BuildState, Change, PollResult};

/// Normalizes a job's build list. Jenkins already returns newest first.
///
/// `ago` renders the time elapsed since an epoch-millis timestamp.
pub fn transform(job: JenkinsJobDto, ago: &dyn Fn(i64) -> String) -> PollResult {
    let builds = job
        .builds
        .into_iter()
        .map(|build| transform_build(build, ago))
        .collect();

    PollResult { builds }
}

fn transform_build(build: JenkinsBuildDto, ago: &dyn Fn(i64) -> String) -> BuildRecord {
    let mut record = BuildRecord::new(
        build.number.to_string(),
        state(build.result.as_deref(), build.building),
    );

    record.started = build
        .timestamp
        .map(|ts| format!("{} ago", ago(ts)));

    record.changes = build
        .change_set
        .map(|set| set.items.into_iter().map(change).collect())
        .unwrap_or_default();

    if record.changes.is_empty() {
        record.causes = causes(&build.actions);
    }

    record
}

pub fn state(result: Option<&str>, building: bool) -> BuildState {
    if building {
        return BuildState::Building;
    }
    match result {
        Some("SUCCESS") => BuildState::Passed,
        Some("FAILURE") => BuildState::Failed,
        Some(other) => BuildState::Other(other.to_string()),
        None => BuildState::Other("unknown".to_string()),
    }
}

fn change(item: JenkinsChangeDto) -> Change {
    Change {
        author: item.author.and_then(|a| a.full_name),
        commit_id: short_sha(&item.commit_id),
        message: item.msg,
    }
}

/// Short descriptions from the first action that carries any causes.
fn causes(actions: &[Option<JenkinsActionDto>]) -> Vec<String> {
    actions
        .iter()
        .flatten()
        .find(|action| !action.causes.is_empty())
        .map(|action| {
            action
                .causes
                .iter()
                .filter_map(|cause| cause.short_description.clone())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ago_in_words_at;

    const NOW: i64 = 1_700_000_000_000;

    fn ago(epoch_millis: i64) -> String {
        ago_in_words_at(epoch_millis, NOW)
    }

    fn job(json: &str) -> JenkinsJobDto {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_building_wins_over_result() {
        assert_eq!(state(Some("FAILURE"), true), BuildState::Building);
        assert_eq!(state(Some("SUCCESS"), true), BuildState::Building);
        assert_eq!(state(None, true), BuildState::Building);
    }

    #[test]
    fn test_result_mapping() {
        assert_eq!(state(Some("SUCCESS"), false), BuildState::Passed);
        assert_eq!(state(Some("FAILURE"), false), BuildState::Failed);
        assert_eq!(
            state(Some("ABORTED"), false),
            BuildState::Other("ABORTED".to_string())
        );
        assert_eq!(
            state(Some("UNSTABLE"), false).as_str(),
            "UNSTABLE"
        );
    }

    #[test]
    fn test_transform_build_with_changes() {
        let result = transform(
            job(r#"{
                "builds": [{
                    "number": 42,
                    "url": "http://localhost:8080/job/ju/42/",
                    "result": "SUCCESS",
                    "timestamp": 1699999880000,
                    "building": false,
                    "actions": [{}, {"causes": [{"shortDescription": "Started by an SCM change"}]}],
                    "changeSet": {"items": [{
                        "msg": "fix bug",
                        "commitId": "2f1b3c4d5e6f708192a3b4c5d6e7f80912a3b4c5",
                        "author": {"fullName": "Jane Doe"}
                    }]}
                }]
            }"#),
            &ago,
        );

        assert_eq!(result.builds.len(), 1);
        let build = &result.builds[0];
        assert_eq!(build.number, "42");
        assert_eq!(build.state, BuildState::Passed);
        assert_eq!(build.started.as_deref(), Some("2 minutes ago"));
        assert_eq!(
            build.changes,
            vec![Change {
                author: Some("Jane Doe".to_string()),
                commit_id: "2f1b3c4".to_string(),
                message: "fix bug".to_string(),
            }]
        );
        assert!(build.causes.is_empty());
    }

    #[test]
    fn test_causes_fill_in_when_no_changes() {
        let result = transform(
            job(r#"{
                "builds": [{
                    "number": 7,
                    "result": "FAILURE",
                    "timestamp": 1699999999000,
                    "building": false,
                    "actions": [
                        {"causes": []},
                        {},
                        {"causes": [{"shortDescription": "Started by user admin"}, {"shortDescription": "Replayed #6"}]},
                        {"causes": [{"shortDescription": "ignored"}]}
                    ],
                    "changeSet": {"items": []}
                }]
            }"#),
            &ago,
        );

        let build = &result.builds[0];
        assert_eq!(build.state, BuildState::Failed);
        assert_eq!(build.causes, vec!["Started by user admin", "Replayed #6"]);
    }

    #[test]
    fn test_missing_change_set_and_actions_become_empty() {
        let result = transform(
            job(r#"{"builds": [{"number": 3, "result": null, "building": true}]}"#),
            &ago,
        );

        let build = &result.builds[0];
        assert_eq!(build.state, BuildState::Building);
        assert!(build.changes.is_empty());
        assert!(build.causes.is_empty());
        assert_eq!(build.started, None);
    }

    #[test]
    fn test_null_actions_are_skipped() {
        let result = transform(
            job(r#"{"builds": [{"number": 1, "result": "SUCCESS", "actions": [null, {"causes": [{"shortDescription": "Timer"}]}]}]}"#),
            &ago,
        );

        assert_eq!(result.builds[0].causes, vec!["Timer"]);
    }

    #[test]
    fn test_build_order_is_preserved() {
        let result = transform(
            job(r#"{"builds": [{"number": 9, "result": "SUCCESS"}, {"number": 8, "result": "FAILURE"}, {"number": 7, "result": "ABORTED"}]}"#),
            &ago,
        );

        let numbers: Vec<&str> = result.builds.iter().map(|b| b.number.as_str()).collect();
        assert_eq!(numbers, vec!["9", "8", "7"]);
    }

    #[test]
    fn test_job_without_builds() {
        assert!(transform(job("{}"), &ago).builds.is_empty());
    }
}
