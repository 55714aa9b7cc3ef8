use crate::models::{Project, ProjectStatus, Task, TaskPriority, TaskStatus};
use crate::parser::parse_task_input;
use crate::stats::{filter_tasks, ProjectFilter, StatusFilter};
use crate::store::Store;
use chrono::{Duration, Utc};
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

/// The five dashboard views. Anything unrecognized falls back to the
/// dashboard, matching the original route handling.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    Dashboard,
    Tasks,
    Projects,
    Team,
    Reports,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Tasks,
        View::Projects,
        View::Team,
        View::Reports,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Tasks => "Task Board",
            View::Projects => "Projects",
            View::Team => "Team",
            View::Reports => "Reports",
        }
    }

    pub fn from_name(name: &str) -> View {
        match name {
            "dashboard" => View::Dashboard,
            "tasks" => View::Tasks,
            "projects" => View::Projects,
            "team" => View::Team,
            "reports" => View::Reports,
            _ => View::Dashboard,
        }
    }

    pub fn next(&self) -> View {
        match self {
            View::Dashboard => View::Tasks,
            View::Tasks => View::Projects,
            View::Projects => View::Team,
            View::Team => View::Reports,
            View::Reports => View::Dashboard,
        }
    }
}

pub enum InputMode {
    Normal,
    Search,
    Editing,
    Insert,
}

#[derive(PartialEq)]
pub enum ActiveInput {
    Title,
    Description,
}

pub struct App {
    pub store: Store,
    pub view: View,
    pub state: ListState,
    pub input_mode: InputMode,
    pub active_input: ActiveInput,
    pub search_term: String,
    pub project_filter: ProjectFilter,
    pub status_filter: StatusFilter,
    pub new_task_title: String,
    pub new_task_description: String,
}

impl App {
    pub fn new(store: Store) -> App {
        let mut state = ListState::default();
        state.select(Some(0));
        App {
            store,
            view: View::Dashboard,
            state,
            input_mode: InputMode::Normal,
            active_input: ActiveInput::Title,
            search_term: String::new(),
            project_filter: ProjectFilter::All,
            status_filter: StatusFilter::All,
            new_task_title: String::new(),
            new_task_description: String::new(),
        }
    }

    /// Tasks visible on the board under the current search and filters.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter_tasks(
            &self.store.tasks,
            &self.search_term,
            &self.project_filter,
            &self.status_filter,
        )
    }

    fn list_len(&self) -> usize {
        match self.view {
            View::Dashboard | View::Reports => 0,
            View::Tasks => self.visible_tasks().len(),
            View::Projects => self.store.projects.len(),
            View::Team => self.store.users.len(),
        }
    }

    pub fn next_item(&mut self) {
        let len = self.list_len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous_item(&mut self) {
        let len = self.list_len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn switch_view(&mut self, view: View) {
        self.view = view;
        self.state.select(if self.list_len() > 0 { Some(0) } else { None });
    }

    /// `all` -> each status in column order -> back to `all`.
    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            StatusFilter::All => StatusFilter::Only(TaskStatus::Todo),
            StatusFilter::Only(status) if status == TaskStatus::Completed => StatusFilter::All,
            StatusFilter::Only(status) => StatusFilter::Only(status.next()),
        };
        self.state.select(Some(0));
    }

    /// `all` -> each project in collection order -> back to `all`.
    pub fn cycle_project_filter(&mut self) {
        let ids: Vec<String> = self.store.projects.iter().map(|p| p.id.clone()).collect();
        self.project_filter = match &self.project_filter {
            ProjectFilter::All => match ids.first() {
                Some(first) => ProjectFilter::Project(first.clone()),
                None => ProjectFilter::All,
            },
            ProjectFilter::Project(current) => {
                match ids.iter().position(|id| id == current) {
                    Some(pos) if pos + 1 < ids.len() => {
                        ProjectFilter::Project(ids[pos + 1].clone())
                    }
                    _ => ProjectFilter::All,
                }
            }
        };
        self.state.select(Some(0));
    }

    /// Move the selected task to the next board column by replacing the
    /// whole record, never mutating in place.
    pub fn advance_selected_task(&mut self) {
        let selected = match self.state.selected() {
            Some(i) => i,
            None => return,
        };
        let task = match self.visible_tasks().get(selected) {
            Some(task) => (*task).clone(),
            None => return,
        };
        let mut updated = task;
        updated.status = updated.status.next();
        updated.updated_at = Utc::now();
        if let Err(err) = self.store.upsert_task(updated) {
            eprintln!("Error saving task: {}", err);
        }
    }

    /// Cycle the selected project through active / on-hold / completed,
    /// replacing the whole record.
    pub fn cycle_selected_project_status(&mut self) {
        let selected = match self.state.selected() {
            Some(i) => i,
            None => return,
        };
        let project = match self.store.projects.get(selected) {
            Some(project) => project.clone(),
            None => return,
        };
        let mut updated = project;
        updated.status = updated.status.next();
        if let Err(err) = self.store.upsert_project(updated) {
            eprintln!("Error saving project: {}", err);
        }
    }

    fn submit_new_task(&mut self) {
        let parsed = parse_task_input(&self.new_task_title);
        if parsed.title.is_empty() {
            return;
        }

        // New tasks land in the filtered project when one is selected,
        // otherwise in the first project.
        let project_id = match &self.project_filter {
            ProjectFilter::Project(id) => id.clone(),
            ProjectFilter::All => self
                .store
                .projects
                .first()
                .map(|project| project.id.clone())
                .unwrap_or_default(),
        };
        let assignee_id = self
            .store
            .users
            .first()
            .map(|user| user.id.clone())
            .unwrap_or_default();

        let now = Utc::now();
        let task = Task {
            id: String::new(), // assigned by the store
            title: parsed.title,
            description: self.new_task_description.trim().to_string(),
            project_id,
            assignee_id,
            priority: parsed.priority.unwrap_or(TaskPriority::Medium),
            status: TaskStatus::Todo,
            due_date: now + Duration::days(7),
            created_at: now,
            updated_at: now,
            tags: parsed.tags,
            estimated_hours: 0,
            actual_hours: 0,
        };
        if let Err(err) = self.store.add_task(task) {
            eprintln!("Error creating task: {}", err);
        }
    }

    fn submit_new_project(&mut self) {
        let name = self.new_task_title.trim().to_string();
        if name.is_empty() {
            return;
        }
        let project = Project {
            id: String::new(), // assigned by the store
            name,
            description: self.new_task_description.trim().to_string(),
            color: "#3B82F6".to_string(),
            progress: 0,
            due_date: Utc::now() + Duration::days(30),
            status: ProjectStatus::Active,
            team_members: vec![],
        };
        if let Err(err) = self.store.add_project(project) {
            eprintln!("Error creating project: {}", err);
        }
    }

    /// Returns true when the app should quit.
    pub fn handle_input(&mut self, key: crossterm::event::KeyEvent) -> bool {
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('j') | KeyCode::Down => self.next_item(),
                KeyCode::Char('k') | KeyCode::Up => self.previous_item(),
                KeyCode::Tab => self.switch_view(self.view.next()),
                KeyCode::Char('1') => self.switch_view(View::Dashboard),
                KeyCode::Char('2') => self.switch_view(View::Tasks),
                KeyCode::Char('3') => self.switch_view(View::Projects),
                KeyCode::Char('4') => self.switch_view(View::Team),
                KeyCode::Char('5') => self.switch_view(View::Reports),
                KeyCode::Char('/') => {
                    self.input_mode = InputMode::Search;
                }
                KeyCode::Char('f') => self.cycle_status_filter(),
                KeyCode::Char('p') => self.cycle_project_filter(),
                KeyCode::Char('m') => match self.view {
                    View::Tasks => self.advance_selected_task(),
                    View::Projects => self.cycle_selected_project_status(),
                    _ => {}
                },
                KeyCode::Char('a') => {
                    self.input_mode = InputMode::Editing;
                    self.active_input = ActiveInput::Title;
                    self.new_task_title.clear();
                    self.new_task_description.clear();
                }
                KeyCode::Esc => {
                    self.search_term.clear();
                    self.project_filter = ProjectFilter::All;
                    self.status_filter = StatusFilter::All;
                }
                _ => {}
            },

            InputMode::Search => match key.code {
                KeyCode::Char(c) => {
                    self.search_term.push(c);
                    self.state.select(Some(0));
                }
                KeyCode::Backspace => {
                    self.search_term.pop();
                }
                KeyCode::Enter => {
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Esc => {
                    self.search_term.clear();
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },

            InputMode::Editing => match key.code {
                KeyCode::Char('i') => {
                    self.input_mode = InputMode::Insert;
                }
                KeyCode::Tab => {
                    self.active_input = match self.active_input {
                        ActiveInput::Title => ActiveInput::Description,
                        ActiveInput::Description => ActiveInput::Title,
                    };
                }
                KeyCode::Enter => {
                    if self.new_task_title.trim().is_empty() {
                        eprintln!("Title cannot be empty.");
                    } else {
                        // The popup creates a project on the projects view
                        // and a task everywhere else
                        if self.view == View::Projects {
                            self.submit_new_project();
                        } else {
                            self.submit_new_task();
                        }
                        self.new_task_title.clear();
                        self.new_task_description.clear();
                        self.input_mode = InputMode::Normal;
                    }
                }
                KeyCode::Esc => {
                    self.new_task_title.clear();
                    self.new_task_description.clear();
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },

            InputMode::Insert => match key.code {
                KeyCode::Char(c) => match self.active_input {
                    ActiveInput::Title => self.new_task_title.push(c),
                    ActiveInput::Description => self.new_task_description.push(c),
                },
                KeyCode::Backspace => match self.active_input {
                    ActiveInput::Title => {
                        self.new_task_title.pop();
                    }
                    ActiveInput::Description => {
                        self.new_task_description.pop();
                    }
                },
                KeyCode::Esc => {
                    self.input_mode = InputMode::Editing;
                }
                _ => {}
            },
        }
        false
    }
}
