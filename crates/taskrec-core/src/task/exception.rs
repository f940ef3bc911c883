use serde::{Deserialize, Serialize};

/// Category of a task failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskExceptionKind {
    #[serde(rename = "TaskException")]
    General,
    #[serde(rename = "TaskFileSystemException")]
    FileSystem,
    #[serde(rename = "TaskUrlException")]
    Url,
    #[serde(rename = "TaskConnectionException")]
    Connection,
    #[serde(rename = "TaskResumeException")]
    Resume,
    #[serde(rename = "TaskHttpException")]
    Http,
}

/// Why a task ended in a failure state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskException {
    pub exception_type: TaskExceptionKind,
    #[serde(default)]
    pub description: String,
    /// Only meaningful for `TaskExceptionKind::Http`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_response_code: Option<u16>,
}

impl TaskException {
    pub fn new(exception_type: TaskExceptionKind, description: impl Into<String>) -> Self {
        Self {
            exception_type,
            description: description.into(),
            http_response_code: None,
        }
    }

    pub fn http(code: u16, description: impl Into<String>) -> Self {
        Self {
            exception_type: TaskExceptionKind::Http,
            description: description.into(),
            http_response_code: Some(code),
        }
    }
}

impl std::fmt::Display for TaskException {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.http_response_code {
            Some(code) => write!(f, "{:?} ({}): {}", self.exception_type, code, self.description),
            None => write!(f, "{:?}: {}", self.exception_type, self.description),
        }
    }
}
