use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ModelError;

/// Stages of the delivery pipeline, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    Discovery,
    Strategy,
    Production,
    Review,
    Launch,
    Reporting,
}

impl ProjectPhase {
    pub const ALL: [ProjectPhase; 6] = [
        ProjectPhase::Discovery,
        ProjectPhase::Strategy,
        ProjectPhase::Production,
        ProjectPhase::Review,
        ProjectPhase::Launch,
        ProjectPhase::Reporting,
    ];

    /// The following phase, or `None` once reporting is reached.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Discovery => Some(Self::Strategy),
            Self::Strategy => Some(Self::Production),
            Self::Production => Some(Self::Review),
            Self::Review => Some(Self::Launch),
            Self::Launch => Some(Self::Reporting),
            Self::Reporting => None,
        }
    }

    /// 1-based position in the pipeline.
    pub fn position(self) -> usize {
        self as usize + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Strategy => "strategy",
            Self::Production => "production",
            Self::Review => "review",
            Self::Launch => "launch",
            Self::Reporting => "reporting",
        }
    }
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectPhase {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == value.trim())
            .ok_or_else(|| ModelError::UnknownPhase(value.to_string()))
    }
}

/// Kanban column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "done" => Ok(Self::Done),
            "blocked" => Ok(Self::Blocked),
            other => Err(ModelError::UnknownTaskStatus(other.to_string())),
        }
    }
}

/// Client decision on a deliverable. Stored as a nullable boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalState {
    Approved,
    Rejected,
    Pending,
}

impl ApprovalState {
    pub fn is_approved(self) -> Option<bool> {
        match self {
            Self::Approved => Some(true),
            Self::Rejected => Some(false),
            Self::Pending => None,
        }
    }
}

impl From<Option<bool>> for ApprovalState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Approved,
            Some(false) => Self::Rejected,
            None => Self::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub phase: ProjectPhase,
    pub target_date: Option<NaiveDate>,
    pub phase_due_date: Option<NaiveDate>,
    pub is_blocked: bool,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub created_at: DateTime<Utc>,
    pub is_deliverable: bool,
    pub approval: ApprovalState,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub status: TaskStatus,
}

/// A campaign together with everything the health engine reads.
#[derive(Debug, Clone)]
pub struct CampaignSnapshot {
    pub campaign: Campaign,
    pub updates: Vec<StatusUpdate>,
    pub tasks: Vec<Task>,
}
