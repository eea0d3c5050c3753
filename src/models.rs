use serde::{Serialize, Serializer};

/// Canonical build states shared by every adapter. Source states with no
/// canonical meaning are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Building,
    Scheduled,
    Passed,
    Failed,
    Other(String),
}

impl BuildState {
    pub fn as_str(&self) -> &str {
        match self {
            BuildState::Building => "building",
            BuildState::Scheduled => "scheduled",
            BuildState::Passed => "passed",
            BuildState::Failed => "failed",
            BuildState::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BuildState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One commit that went into a build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub author: Option<String>,
    pub commit_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult {
    pub name: String,
    pub state: BuildState,
}

/// The normalized record every adapter produces for one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildRecord {
    pub number: String,
    pub state: BuildState,
    /// `"N units ago"`, absent when the source reports no start time.
    pub started: Option<String>,
    pub author: Option<String>,
    pub message: Option<String>,
    pub commit_sha: Option<String>,
    pub branch: Option<String>,
    pub changes: Vec<Change>,
    /// What triggered the build; only filled when `changes` is empty.
    pub causes: Vec<String>,
    pub stages: Vec<StageResult>,
}

impl BuildRecord {
    pub fn new(number: impl Into<String>, state: BuildState) -> Self {
        Self {
            number: number.into(),
            state,
            started: None,
            author: None,
            message: None,
            commit_sha: None,
            branch: None,
            changes: Vec::new(),
            causes: Vec::new(),
            stages: Vec::new(),
        }
    }
}

/// Builds from one poll, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollResult {
    pub builds: Vec<BuildRecord>,
}

const SHORT_SHA_LEN: usize = 7;

/// First seven characters of a commit hash.
pub fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA_LEN).collect()
}
