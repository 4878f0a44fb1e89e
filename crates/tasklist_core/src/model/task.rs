use serde::{Deserialize, Serialize};

/// Completion state of a task. Persisted as a plain JSON boolean
/// (`false` = pending, `true` = completed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<bool> for TaskStatus {
    fn from(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Pending
        }
    }
}

impl From<TaskStatus> for bool {
    fn from(status: TaskStatus) -> Self {
        status.is_completed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub status: TaskStatus,
}
