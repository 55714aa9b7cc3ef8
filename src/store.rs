use crate::models::{DashboardStats, Project, Task, User};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Fixed keys mirroring the original local-storage names
const TASKS_KEY: &str = "tasks";
const PROJECTS_KEY: &str = "projects";
const USERS_KEY: &str = "users";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read {key}: {source}")]
    Read {
        key: &'static str,
        source: std::io::Error,
    },
    #[error("could not write {key}: {source}")]
    Write {
        key: &'static str,
        source: std::io::Error,
    },
    #[error("invalid data for {key}: {source}")]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// The three collections plus the pass-through dashboard summary. Records
/// are only ever replaced wholesale; nothing mutates a record in place and
/// nothing deletes one.
pub struct Store {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub stats: DashboardStats,
    /// When set, every mutation mirrors the affected collection to disk.
    data_dir: Option<PathBuf>,
}

impl Store {
    pub fn new(
        users: Vec<User>,
        projects: Vec<Project>,
        tasks: Vec<Task>,
        stats: DashboardStats,
    ) -> Store {
        Store {
            users,
            projects,
            tasks,
            stats,
            data_dir: None,
        }
    }

    /// Read-through init: each collection loads from its JSON mirror under
    /// `data_dir`, falling back to the given defaults when the key is
    /// missing or unreadable.
    pub fn load_or(
        data_dir: PathBuf,
        users: Vec<User>,
        projects: Vec<Project>,
        tasks: Vec<Task>,
        stats: DashboardStats,
    ) -> Store {
        let users = read_key(&data_dir, USERS_KEY).unwrap_or(users);
        let projects = read_key(&data_dir, PROJECTS_KEY).unwrap_or(projects);
        let tasks = read_key(&data_dir, TASKS_KEY).unwrap_or(tasks);
        Store {
            users,
            projects,
            tasks,
            stats,
            data_dir: Some(data_dir),
        }
    }

    /// Wall-clock id, same scheme as the original app. Uniqueness is only
    /// probabilistic; two creations within the same millisecond collide.
    pub fn next_id() -> String {
        Utc::now().timestamp_millis().to_string()
    }

    /// Replace the task whose id matches, wholesale. Unknown ids are
    /// appended so a caller can use this for create-with-id as well.
    pub fn upsert_task(&mut self, task: Task) -> Result<(), StoreError> {
        let mut replaced = false;
        self.tasks = self
            .tasks
            .iter()
            .map(|existing| {
                if existing.id == task.id {
                    replaced = true;
                    task.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        if !replaced {
            self.tasks.push(task);
        }
        self.persist_tasks()
    }

    /// Stamp a fresh id and timestamps, then append.
    pub fn add_task(&mut self, mut task: Task) -> Result<(), StoreError> {
        let now = Utc::now();
        task.id = Store::next_id();
        task.created_at = now;
        task.updated_at = now;
        self.tasks.push(task);
        self.persist_tasks()
    }

    pub fn upsert_project(&mut self, project: Project) -> Result<(), StoreError> {
        let mut replaced = false;
        self.projects = self
            .projects
            .iter()
            .map(|existing| {
                if existing.id == project.id {
                    replaced = true;
                    project.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        if !replaced {
            self.projects.push(project);
        }
        self.persist_projects()
    }

    pub fn add_project(&mut self, mut project: Project) -> Result<(), StoreError> {
        project.id = Store::next_id();
        self.projects.push(project);
        self.persist_projects()
    }

    fn persist_tasks(&self) -> Result<(), StoreError> {
        if let Some(dir) = &self.data_dir {
            write_key(dir, TASKS_KEY, &self.tasks)?;
        }
        Ok(())
    }

    fn persist_projects(&self) -> Result<(), StoreError> {
        if let Some(dir) = &self.data_dir {
            write_key(dir, PROJECTS_KEY, &self.projects)?;
        }
        Ok(())
    }
}

fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", key))
}

fn read_key<T: DeserializeOwned>(dir: &Path, key: &'static str) -> Option<T> {
    let raw = fs::read_to_string(key_path(dir, key)).ok()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("Ignoring invalid data for {}: {}", key, err);
            None
        }
    }
}

fn write_key<T: Serialize>(dir: &Path, key: &'static str, value: &T) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::Write { key, source })?;
    let raw = serde_json::to_string_pretty(value)
        .map_err(|source| StoreError::Decode { key, source })?;
    fs::write(key_path(dir, key), raw).map_err(|source| StoreError::Write { key, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::models::TaskStatus;

    fn fixture_store() -> Store {
        Store::new(
            fixtures::users(),
            fixtures::projects(),
            fixtures::tasks(),
            fixtures::dashboard_stats(),
        )
    }

    #[test]
    fn upsert_replaces_by_id_and_keeps_order() {
        let mut store = fixture_store();
        let ids_before: Vec<String> = store.tasks.iter().map(|t| t.id.clone()).collect();

        let mut updated = store.tasks[1].clone();
        updated.status = TaskStatus::Completed;
        store.upsert_task(updated).unwrap();

        let ids_after: Vec<String> = store.tasks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids_before, ids_after);
        assert_eq!(store.tasks[1].status, TaskStatus::Completed);
    }

    #[test]
    fn upsert_with_unknown_id_appends() {
        let mut store = fixture_store();
        let count = store.tasks.len();
        let mut task = store.tasks[0].clone();
        task.id = "brand-new".to_string();
        store.upsert_task(task).unwrap();
        assert_eq!(store.tasks.len(), count + 1);
    }

    #[test]
    fn project_upsert_replaces_by_id_and_keeps_order() {
        let mut store = fixture_store();
        let ids_before: Vec<String> = store.projects.iter().map(|p| p.id.clone()).collect();

        let mut updated = store.projects[1].clone();
        updated.status = crate::models::ProjectStatus::OnHold;
        store.upsert_project(updated).unwrap();

        let ids_after: Vec<String> = store.projects.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids_before, ids_after);
        assert_eq!(store.projects[1].status, crate::models::ProjectStatus::OnHold);
    }

    #[test]
    fn project_upsert_with_unknown_id_appends() {
        let mut store = fixture_store();
        let count = store.projects.len();
        let mut project = store.projects[0].clone();
        project.id = "brand-new".to_string();
        store.upsert_project(project).unwrap();
        assert_eq!(store.projects.len(), count + 1);
    }

    #[test]
    fn add_project_assigns_a_fresh_id() {
        let mut store = fixture_store();
        let template = store.projects[0].clone();
        let old_id = template.id.clone();
        store.add_project(template).unwrap();

        let added = store.projects.last().unwrap();
        assert_ne!(added.id, old_id);
    }

    #[test]
    fn project_changes_mirror_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::load_or(
            dir.path().to_path_buf(),
            fixtures::users(),
            fixtures::projects(),
            fixtures::tasks(),
            fixtures::dashboard_stats(),
        );

        let mut updated = store.projects[0].clone();
        updated.progress = 100;
        store.upsert_project(updated).unwrap();
        assert!(dir.path().join("projects.json").exists());

        let reloaded = Store::load_or(
            dir.path().to_path_buf(),
            fixtures::users(),
            vec![],
            fixtures::tasks(),
            fixtures::dashboard_stats(),
        );
        assert_eq!(reloaded.projects.len(), store.projects.len());
        assert_eq!(reloaded.projects[0].progress, 100);
    }

    #[test]
    fn add_task_assigns_id_and_timestamps() {
        let mut store = fixture_store();
        let template = store.tasks[0].clone();
        let old_id = template.id.clone();
        store.add_task(template).unwrap();

        let added = store.tasks.last().unwrap();
        assert_ne!(added.id, old_id);
        assert_eq!(added.created_at, added.updated_at);
    }

    #[test]
    fn collections_mirror_to_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::load_or(
            dir.path().to_path_buf(),
            fixtures::users(),
            fixtures::projects(),
            fixtures::tasks(),
            fixtures::dashboard_stats(),
        );

        let mut updated = store.tasks[0].clone();
        updated.status = TaskStatus::Review;
        store.upsert_task(updated).unwrap();
        assert!(dir.path().join("tasks.json").exists());

        // read-through on a fresh load picks the mirrored state, not the defaults
        let reloaded = Store::load_or(
            dir.path().to_path_buf(),
            fixtures::users(),
            fixtures::projects(),
            vec![],
            fixtures::dashboard_stats(),
        );
        assert_eq!(reloaded.tasks.len(), store.tasks.len());
        assert_eq!(reloaded.tasks[0].status, TaskStatus::Review);
    }

    #[test]
    fn corrupt_mirror_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tasks.json"), "not json").unwrap();
        let store = Store::load_or(
            dir.path().to_path_buf(),
            fixtures::users(),
            fixtures::projects(),
            fixtures::tasks(),
            fixtures::dashboard_stats(),
        );
        assert_eq!(store.tasks.len(), fixtures::tasks().len());
    }
}
