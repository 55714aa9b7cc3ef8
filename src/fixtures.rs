//! Bundled sample data, used when no persisted state and no remote instance
//! is available.

use crate::models::{
    DashboardStats, Project, ProjectStatus, Role, Task, TaskPriority, TaskStatus, User,
};
use chrono::{DateTime, TimeZone, Utc};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    // Fixture dates are always valid
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn user(id: &str, name: &str, email: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: format!("https://avatars.example.com/{}.jpeg", id),
        role,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("1", "Alex Johnson", "alex@company.com", Role::Admin),
        user("2", "Sarah Chen", "sarah@company.com", Role::Manager),
        user("3", "Michael Rodriguez", "michael@company.com", Role::Developer),
        user("4", "Emma Williams", "emma@company.com", Role::Designer),
    ]
}

pub fn projects() -> Vec<Project> {
    let team = users();
    vec![
        Project {
            id: "1".to_string(),
            name: "E-commerce Platform".to_string(),
            description: "Building a modern e-commerce platform".to_string(),
            color: "#3B82F6".to_string(),
            progress: 75,
            due_date: date(2024, 2, 15),
            status: ProjectStatus::Active,
            team_members: vec![team[0].clone(), team[1].clone(), team[2].clone()],
        },
        Project {
            id: "2".to_string(),
            name: "Mobile App Development".to_string(),
            description: "Cross-platform mobile application".to_string(),
            color: "#10B981".to_string(),
            progress: 40,
            due_date: date(2024, 3, 1),
            status: ProjectStatus::Active,
            team_members: vec![team[1].clone(), team[3].clone()],
        },
        Project {
            id: "3".to_string(),
            name: "Data Analytics Dashboard".to_string(),
            description: "Real-time analytics dashboard with advanced visualizations".to_string(),
            color: "#F59E0B".to_string(),
            progress: 90,
            due_date: date(2024, 1, 30),
            status: ProjectStatus::Active,
            team_members: vec![team[0].clone(), team[2].clone()],
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    description: &str,
    project_id: &str,
    assignee_id: &str,
    priority: TaskPriority,
    status: TaskStatus,
    due: DateTime<Utc>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    tags: &[&str],
    estimated_hours: u32,
    actual_hours: u32,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        project_id: project_id.to_string(),
        assignee_id: assignee_id.to_string(),
        priority,
        status,
        due_date: due,
        created_at: created,
        updated_at: updated,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        estimated_hours,
        actual_hours,
    }
}

pub fn tasks() -> Vec<Task> {
    vec![
        task(
            "1",
            "Implement user authentication",
            "Set up JWT authentication with login/logout functionality",
            "1",
            "3",
            TaskPriority::High,
            TaskStatus::InProgress,
            date(2024, 1, 25),
            date(2024, 1, 15),
            date(2024, 1, 20),
            &["backend", "security"],
            8,
            6,
        ),
        task(
            "2",
            "Design checkout flow",
            "Create wireframes and mockups for the checkout process",
            "1",
            "4",
            TaskPriority::Medium,
            TaskStatus::Review,
            date(2024, 1, 22),
            date(2024, 1, 10),
            date(2024, 1, 21),
            &["design", "ui/ux"],
            12,
            10,
        ),
        task(
            "3",
            "API integration testing",
            "Test all API endpoints and handle edge cases",
            "2",
            "1",
            TaskPriority::High,
            TaskStatus::Todo,
            date(2024, 1, 28),
            date(2024, 1, 18),
            date(2024, 1, 18),
            &["testing", "backend"],
            6,
            0,
        ),
        task(
            "4",
            "Dashboard data visualization",
            "Implement charts and graphs for analytics dashboard",
            "3",
            "2",
            TaskPriority::Medium,
            TaskStatus::Completed,
            date(2024, 1, 20),
            date(2024, 1, 12),
            date(2024, 1, 19),
            &["frontend", "charts"],
            16,
            14,
        ),
        task(
            "5",
            "Performance optimization",
            "Optimize application performance and loading times",
            "1",
            "3",
            TaskPriority::Urgent,
            TaskStatus::InProgress,
            date(2024, 1, 24),
            date(2024, 1, 16),
            date(2024, 1, 22),
            &["optimization", "performance"],
            10,
            8,
        ),
    ]
}

pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_tasks: 5,
        completed_tasks: 1,
        in_progress_tasks: 2,
        overdue_tasks: 0,
        total_projects: 3,
        active_projects: 3,
        team_members: 4,
        productivity: 85,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_references_resolve() {
        let users = users();
        let projects = projects();
        for task in tasks() {
            assert!(projects.iter().any(|p| p.id == task.project_id));
            assert!(users.iter().any(|u| u.id == task.assignee_id));
        }
    }

    #[test]
    fn fixture_summary_matches_collections() {
        let stats = dashboard_stats();
        assert_eq!(stats.total_tasks as usize, tasks().len());
        assert_eq!(stats.total_projects as usize, projects().len());
        assert_eq!(stats.team_members as usize, users().len());
    }
}
