//! Derived numbers for the dashboard, board, team and reports views.
//!
//! Everything here is a pure function over borrowed slices. Collections are
//! replaced wholesale by the store, never mutated in place, so these can be
//! recomputed on every render without bookkeeping.

use crate::models::{Project, Task, TaskPriority, TaskStatus, User};

/// Project filter for the task board. `All` is the sentinel the original
/// filter dropdown used.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum ProjectFilter {
    #[default]
    All,
    Project(String),
}

impl ProjectFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::Project(id) => task.project_id == *id,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == *status,
        }
    }
}

/// Case-insensitive search over title and description, AND the two dropdown
/// filters. An empty search term matches everything. Input order is kept.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    search: &str,
    project: &ProjectFilter,
    status: &StatusFilter,
) -> Vec<&'a Task> {
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|task| {
            let matches_search = needle.is_empty()
                || task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle);
            matches_search && project.matches(task) && status.matches(task)
        })
        .collect()
}

/// Bucket for one board column.
pub fn tasks_by_status<'a>(tasks: &[&'a Task], status: TaskStatus) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| task.status == status)
        .copied()
        .collect()
}

/// Progress derived from task counts: round(100 * completed / total), half
/// away from zero. A project with no tasks is 0. This is the authoritative
/// number for reports; `Project::progress` is stored separately and may
/// disagree.
pub fn project_progress(project_id: &str, tasks: &[Task]) -> u8 {
    let project_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.project_id == project_id)
        .collect();
    if project_tasks.is_empty() {
        return 0;
    }
    let completed = project_tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .count();
    percentage(completed, project_tasks.len())
}

/// One distribution row: count and rounded share of the whole.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Share<K> {
    pub key: K,
    pub count: usize,
    pub percentage: u8,
}

/// Count and percentage per status present, in board column order. An empty
/// collection yields no rows rather than dividing by zero.
pub fn status_distribution(tasks: &[Task]) -> Vec<Share<TaskStatus>> {
    let total = tasks.len();
    TaskStatus::ALL
        .iter()
        .filter_map(|&status| {
            let count = tasks.iter().filter(|task| task.status == status).count();
            if count == 0 {
                return None;
            }
            Some(Share {
                key: status,
                count,
                percentage: percentage(count, total),
            })
        })
        .collect()
}

/// Same shape as `status_distribution`, keyed by priority.
pub fn priority_distribution(tasks: &[Task]) -> Vec<Share<TaskPriority>> {
    let total = tasks.len();
    TaskPriority::ALL
        .iter()
        .filter_map(|&priority| {
            let count = tasks.iter().filter(|task| task.priority == priority).count();
            if count == 0 {
                return None;
            }
            Some(Share {
                key: priority,
                count,
                percentage: percentage(count, total),
            })
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct UserStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub total_hours: u32,
    pub completion_rate: u8,
}

/// Workload numbers for one assignee. A user with no tasks gets a zero
/// completion rate, not a division by zero.
pub fn user_stats(user_id: &str, tasks: &[Task]) -> UserStats {
    let user_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.assignee_id == user_id)
        .collect();
    let completed = user_tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .count();
    let in_progress = user_tasks
        .iter()
        .filter(|task| task.status == TaskStatus::InProgress)
        .count();
    let total_hours = user_tasks.iter().map(|task| task.actual_hours).sum();
    let completion_rate = if user_tasks.is_empty() {
        0
    } else {
        percentage(completed, user_tasks.len())
    };

    UserStats {
        total_tasks: user_tasks.len(),
        completed_tasks: completed,
        in_progress_tasks: in_progress,
        total_hours,
        completion_rate,
    }
}

/// Share of all tasks marked completed; 0 for an empty collection.
pub fn completion_rate(tasks: &[Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .count();
    percentage(completed, tasks.len())
}

pub fn total_actual_hours(tasks: &[Task]) -> u32 {
    tasks.iter().map(|task| task.actual_hours).sum()
}

/// Mean of the stored (not derived) progress fields; 0 with no projects.
pub fn average_stored_progress(projects: &[Project]) -> u8 {
    if projects.is_empty() {
        return 0;
    }
    let sum: u32 = projects.iter().map(|project| u32::from(project.progress)).sum();
    (f64::from(sum) / projects.len() as f64).round() as u8
}

/// Foreign keys are by convention only; a dangling reference resolves to
/// `None` and the caller decides how to display it.
pub fn find_project<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
    projects.iter().find(|project| project.id == id)
}

pub fn find_user<'a>(users: &'a [User], id: &str) -> Option<&'a User> {
    users.iter().find(|user| user.id == id)
}

fn percentage(count: usize, total: usize) -> u8 {
    (100.0 * count as f64 / total as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};
    use chrono::{TimeZone, Utc};

    fn task(id: &str, project: &str, assignee: &str, status: TaskStatus) -> Task {
        let date = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            description: String::new(),
            project_id: project.to_string(),
            assignee_id: assignee.to_string(),
            priority: TaskPriority::Medium,
            status,
            due_date: date,
            created_at: date,
            updated_at: date,
            tags: vec![],
            estimated_hours: 4,
            actual_hours: 2,
        }
    }

    #[test]
    fn sentinel_filters_return_input_unchanged_in_order() {
        let tasks = vec![
            task("1", "p1", "u1", TaskStatus::Todo),
            task("2", "p2", "u1", TaskStatus::Review),
            task("3", "p1", "u2", TaskStatus::Completed),
        ];
        let result = filter_tasks(&tasks, "", &ProjectFilter::All, &StatusFilter::All);
        let ids: Vec<&str> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let mut a = task("1", "p1", "u1", TaskStatus::Todo);
        a.title = "Implement Checkout".to_string();
        let mut b = task("2", "p1", "u1", TaskStatus::Todo);
        b.description = "wireframes for checkout flow".to_string();
        let c = task("3", "p1", "u1", TaskStatus::Todo);
        let tasks = vec![a, b, c];

        let result = filter_tasks(&tasks, "CHECKOUT", &ProjectFilter::All, &StatusFilter::All);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let tasks = vec![
            task("1", "p1", "u1", TaskStatus::Todo),
            task("2", "p2", "u1", TaskStatus::Todo),
            task("3", "p1", "u2", TaskStatus::Completed),
        ];
        let project = ProjectFilter::Project("p1".to_string());
        let status = StatusFilter::All;

        let once: Vec<Task> = filter_tasks(&tasks, "task", &project, &status)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_tasks(&once, "task", &project, &status);
        let once_ids: Vec<&str> = once.iter().map(|t| t.id.as_str()).collect();
        let twice_ids: Vec<&str> = twice.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(once_ids, twice_ids);
    }

    #[test]
    fn board_columns_partition_the_filtered_set() {
        let tasks = vec![
            task("1", "p1", "u1", TaskStatus::Todo),
            task("2", "p1", "u1", TaskStatus::InProgress),
            task("3", "p1", "u1", TaskStatus::InProgress),
            task("4", "p1", "u1", TaskStatus::Completed),
        ];
        let filtered = filter_tasks(&tasks, "", &ProjectFilter::All, &StatusFilter::All);
        let total: usize = TaskStatus::ALL
            .iter()
            .map(|&status| tasks_by_status(&filtered, status).len())
            .sum();
        assert_eq!(total, tasks.len());
    }

    #[test]
    fn one_of_four_completed_is_twenty_five_percent() {
        let tasks = vec![
            task("1", "p1", "u1", TaskStatus::Completed),
            task("2", "p1", "u1", TaskStatus::Todo),
            task("3", "p1", "u1", TaskStatus::Todo),
            task("4", "p1", "u1", TaskStatus::Review),
        ];
        assert_eq!(project_progress("p1", &tasks), 25);
    }

    #[test]
    fn progress_is_zero_without_referencing_tasks() {
        let tasks = vec![task("1", "p1", "u1", TaskStatus::Completed)];
        assert_eq!(project_progress("p2", &tasks), 0);
        assert_eq!(project_progress("p2", &[]), 0);
    }

    #[test]
    fn progress_stays_within_bounds() {
        let tasks: Vec<Task> = (0..7)
            .map(|i| task(&i.to_string(), "p1", "u1", TaskStatus::Completed))
            .collect();
        assert_eq!(project_progress("p1", &tasks), 100);
    }

    #[test]
    fn distribution_rounds_half_up_and_sums_to_one_hundred() {
        // 1 todo + 2 completed: 33% and 67%
        let tasks = vec![
            task("1", "p1", "u1", TaskStatus::Todo),
            task("2", "p1", "u1", TaskStatus::Completed),
            task("3", "p1", "u1", TaskStatus::Completed),
        ];
        let shares = status_distribution(&tasks);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].key, TaskStatus::Todo);
        assert_eq!(shares[0].count, 1);
        assert_eq!(shares[0].percentage, 33);
        assert_eq!(shares[1].key, TaskStatus::Completed);
        assert_eq!(shares[1].count, 2);
        assert_eq!(shares[1].percentage, 67);

        let count_sum: usize = shares.iter().map(|s| s.count).sum();
        let pct_sum: u32 = shares.iter().map(|s| u32::from(s.percentage)).sum();
        assert_eq!(count_sum, tasks.len());
        assert_eq!(pct_sum, 100);
    }

    #[test]
    fn distribution_counts_always_sum_to_collection_size() {
        let tasks = vec![
            task("1", "p1", "u1", TaskStatus::Todo),
            task("2", "p1", "u1", TaskStatus::InProgress),
            task("3", "p1", "u1", TaskStatus::Review),
            task("4", "p1", "u1", TaskStatus::Completed),
            task("5", "p1", "u1", TaskStatus::Review),
            task("6", "p1", "u1", TaskStatus::Todo),
            task("7", "p1", "u1", TaskStatus::Todo),
        ];
        let shares = status_distribution(&tasks);
        let count_sum: usize = shares.iter().map(|s| s.count).sum();
        assert_eq!(count_sum, tasks.len());

        // percentages sum to 100 within (distinct - 1) of rounding slack
        let pct_sum: i32 = shares.iter().map(|s| i32::from(s.percentage)).sum();
        let slack = shares.len() as i32 - 1;
        assert!((pct_sum - 100).abs() <= slack, "sum was {}", pct_sum);
    }

    #[test]
    fn empty_collection_yields_empty_distributions() {
        assert!(status_distribution(&[]).is_empty());
        assert!(priority_distribution(&[]).is_empty());
        assert_eq!(completion_rate(&[]), 0);
        assert_eq!(total_actual_hours(&[]), 0);
        assert_eq!(average_stored_progress(&[]), 0);
    }

    #[test]
    fn priority_distribution_keys_by_priority() {
        let mut a = task("1", "p1", "u1", TaskStatus::Todo);
        a.priority = TaskPriority::Urgent;
        let mut b = task("2", "p1", "u1", TaskStatus::Todo);
        b.priority = TaskPriority::Urgent;
        let mut c = task("3", "p1", "u1", TaskStatus::Todo);
        c.priority = TaskPriority::Low;
        let tasks = vec![a, b, c];

        let shares = priority_distribution(&tasks);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].key, TaskPriority::Low);
        assert_eq!(shares[0].count, 1);
        assert_eq!(shares[1].key, TaskPriority::Urgent);
        assert_eq!(shares[1].count, 2);
    }

    #[test]
    fn user_stats_never_divides_by_zero() {
        let tasks = vec![task("1", "p1", "u1", TaskStatus::Completed)];
        let stats = user_stats("nobody", &tasks);
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn user_stats_counts_and_hours() {
        let mut a = task("1", "p1", "u1", TaskStatus::Completed);
        a.actual_hours = 6;
        let mut b = task("2", "p1", "u1", TaskStatus::InProgress);
        b.actual_hours = 8;
        let c = task("3", "p1", "u2", TaskStatus::Todo);
        let tasks = vec![a, b, c];

        let stats = user_stats("u1", &tasks);
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.in_progress_tasks, 1);
        assert_eq!(stats.total_hours, 14);
        assert_eq!(stats.completion_rate, 50);
    }

    #[test]
    fn dangling_references_resolve_to_none() {
        let tasks = vec![task("1", "ghost-project", "ghost-user", TaskStatus::Todo)];
        assert!(find_project(&[], &tasks[0].project_id).is_none());
        assert!(find_user(&[], &tasks[0].assignee_id).is_none());
    }
}
