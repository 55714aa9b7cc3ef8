use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Developer,
    Designer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Developer => "developer",
            Role::Designer => "designer",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    /// Cycled when a project is toggled on the projects view.
    pub fn next(&self) -> ProjectStatus {
        match self {
            ProjectStatus::Active => ProjectStatus::OnHold,
            ProjectStatus::OnHold => ProjectStatus::Completed,
            ProjectStatus::Completed => ProjectStatus::Active,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on hold",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Completed,
}

impl TaskStatus {
    // Board column order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Completed => "Completed",
        }
    }

    /// The column a task moves to when advanced on the board. Completed
    /// tasks stay where they are.
    pub fn next(&self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Review,
            TaskStatus::Review => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Completed,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// User struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub role: Role,
}

// Project struct; team members are embedded copies, not ids
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    /// Stored progress. Independent of the task-derived progress computed in
    /// `stats`; the two can disagree.
    pub progress: u8,
    pub due_date: DateTime<Utc>,
    pub status: ProjectStatus,
    pub team_members: Vec<User>,
}

// Task struct
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub project_id: String,
    pub assignee_id: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub estimated_hours: u32,
    pub actual_hours: u32,
}

// Pre-aggregated summary supplied by the data source; never recomputed here
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub in_progress_tasks: u32,
    pub overdue_tasks: u32,
    pub total_projects: u32,
    pub active_projects: u32,
    pub team_members: u32,
    pub productivity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_round_trips_camel_case_with_date_strings() {
        let json = r#"{
            "id": "1",
            "title": "Implement user authentication",
            "description": "Set up JWT authentication",
            "projectId": "1",
            "assigneeId": "3",
            "priority": "high",
            "status": "in-progress",
            "dueDate": "2024-01-25T00:00:00Z",
            "createdAt": "2024-01-15T00:00:00Z",
            "updatedAt": "2024-01-20T00:00:00Z",
            "tags": ["backend", "security"],
            "estimatedHours": 8,
            "actualHours": 6
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.project_id, "1");
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.status, TaskStatus::InProgress);

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["status"], "in-progress");
        assert_eq!(back["projectId"], "1");
    }

    #[test]
    fn project_status_uses_kebab_case() {
        let status: ProjectStatus = serde_json::from_str(r#""on-hold""#).unwrap();
        assert_eq!(status, ProjectStatus::OnHold);
    }

    #[test]
    fn advancing_a_completed_task_is_a_no_op() {
        assert_eq!(TaskStatus::Completed.next(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Todo.next(), TaskStatus::InProgress);
    }

    #[test]
    fn project_status_cycles_through_all_states() {
        let mut status = ProjectStatus::Active;
        status = status.next();
        assert_eq!(status, ProjectStatus::OnHold);
        status = status.next();
        assert_eq!(status, ProjectStatus::Completed);
        status = status.next();
        assert_eq!(status, ProjectStatus::Active);
    }
}
