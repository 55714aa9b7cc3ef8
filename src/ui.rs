use crate::app::{ActiveInput, App, InputMode, View};
use crate::models::{ProjectStatus, Role, Task, TaskPriority, TaskStatus};
use crate::stats;
use crossterm::event::{self, Event as CEvent};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Terminal,
};
use std::io;
use std::time::Duration;

fn centered_rect_absolute(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Length((r.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Length((r.width.saturating_sub(width) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::Urgent => Color::Red,
        TaskPriority::High => Color::LightRed,
        TaskPriority::Medium => Color::Yellow,
        TaskPriority::Low => Color::Green,
    }
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => Color::Green,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Review => Color::Magenta,
        TaskStatus::Todo => Color::Gray,
    }
}

fn project_status_color(status: ProjectStatus) -> Color {
    match status {
        ProjectStatus::Active => Color::Green,
        ProjectStatus::Completed => Color::Blue,
        ProjectStatus::OnHold => Color::Gray,
    }
}

fn role_color(role: Role) -> Color {
    match role {
        Role::Admin => Color::Magenta,
        Role::Manager => Color::Blue,
        Role::Developer => Color::Green,
        Role::Designer => Color::LightMagenta,
    }
}

// Text progress bar, e.g. "███████░░░ 75%"
fn progress_bar(percentage: u8, width: usize) -> String {
    let filled = width * usize::from(percentage.min(100)) / 100;
    let mut bar = String::new();
    for i in 0..width {
        bar.push(if i < filled { '█' } else { '░' });
    }
    format!("{} {:>3}%", bar, percentage)
}

fn get_legend(input_mode: &InputMode) -> Text<'static> {
    match input_mode {
        InputMode::Normal => Text::from(Line::from(vec![
            Span::styled(" q ", Style::default().fg(Color::Red)),
            Span::raw(": Quit "),
            Span::styled(" 1-5/Tab ", Style::default().fg(Color::Red)),
            Span::raw(": View "),
            Span::styled(" j/k ", Style::default().fg(Color::Red)),
            Span::raw(": Move "),
            Span::styled(" / ", Style::default().fg(Color::Red)),
            Span::raw(": Search "),
            Span::styled(" f ", Style::default().fg(Color::Red)),
            Span::raw(": Status Filter "),
            Span::styled(" p ", Style::default().fg(Color::Red)),
            Span::raw(": Project Filter "),
            Span::styled(" m ", Style::default().fg(Color::Red)),
            Span::raw(": Advance "),
            Span::styled(" a ", Style::default().fg(Color::Red)),
            Span::raw(": Add "),
        ])),
        InputMode::Search => Text::from(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Red)),
            Span::raw(": Apply "),
            Span::styled(" Esc ", Style::default().fg(Color::Red)),
            Span::raw(": Clear "),
        ])),
        InputMode::Editing => Text::from(Line::from(vec![
            Span::styled(" i ", Style::default().fg(Color::Red)),
            Span::raw(": Type "),
            Span::styled(" Tab ", Style::default().fg(Color::Red)),
            Span::raw(": Switch Field "),
            Span::styled(" Enter ", Style::default().fg(Color::Red)),
            Span::raw(": Submit "),
            Span::styled(" Esc ", Style::default().fg(Color::Red)),
            Span::raw(": Cancel "),
        ])),
        InputMode::Insert => Text::from(Line::from(vec![
            Span::styled(" Esc ", Style::default().fg(Color::Red)),
            Span::raw(": Stop Typing "),
        ])),
    }
}

fn render_tabs(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL.iter().map(|view| Line::from(view.title())).collect();
    let selected = View::ALL.iter().position(|view| *view == app.view).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("taskdeck"))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn stat_card(f: &mut ratatui::Frame, area: Rect, title: &str, value: String, color: Color) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::raw(title.to_string())),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(card, area);
}

fn render_dashboard(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    // Stat cards come straight from the pass-through summary
    let stats = &app.store.stats;
    let productivity = Paragraph::new(format!("Productivity: {}%", stats.productivity))
        .alignment(Alignment::Right);
    f.render_widget(productivity, chunks[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ]
            .as_ref(),
        )
        .split(chunks[1]);
    stat_card(f, cards[0], "Total Tasks", stats.total_tasks.to_string(), Color::Blue);
    stat_card(f, cards[1], "In Progress", stats.in_progress_tasks.to_string(), Color::Yellow);
    stat_card(f, cards[2], "Completed", stats.completed_tasks.to_string(), Color::Green);
    stat_card(f, cards[3], "Overdue", stats.overdue_tasks.to_string(), Color::Red);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[2]);

    // Recent tasks: first five, as in the original
    let recent: Vec<ListItem> = app
        .store
        .tasks
        .iter()
        .take(5)
        .map(|task| {
            ListItem::new(vec![
                Line::from(Span::raw(task.title.clone())),
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", task.priority),
                        Style::default().fg(priority_color(task.priority)),
                    ),
                    Span::styled(
                        format!(" {} ", task.status),
                        Style::default().fg(status_color(task.status)),
                    ),
                    Span::raw(format!(" due {}", task.due_date.format("%b %d"))),
                ]),
            ])
        })
        .collect();
    let recent_widget = List::new(recent)
        .block(Block::default().borders(Borders::ALL).title("Recent Tasks"));
    f.render_widget(recent_widget, panels[0]);

    // Active projects show the stored progress field, not the derived one
    let mut lines: Vec<Line> = Vec::new();
    for project in app
        .store
        .projects
        .iter()
        .filter(|project| project.status == ProjectStatus::Active)
    {
        lines.push(Line::from(vec![
            Span::styled(
                project.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {} members, due {}",
                project.team_members.len(),
                project.due_date.format("%b %d")
            )),
        ]));
        lines.push(Line::from(Span::raw(progress_bar(project.progress, 20))));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::raw("No active projects")));
    }
    let projects_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Active Projects"))
        .wrap(Wrap { trim: true });
    f.render_widget(projects_widget, panels[1]);
}

fn task_card<'a>(app: &App, task: &'a Task, selected: bool) -> ListItem<'a> {
    let project_name = stats::find_project(&app.store.projects, &task.project_id)
        .map(|project| project.name.clone())
        .unwrap_or_else(|| "(unknown project)".to_string());
    let assignee_name = stats::find_user(&app.store.users, &task.assignee_id)
        .map(|user| user.name.clone())
        .unwrap_or_else(|| "(unassigned)".to_string());

    let marker = if selected { ">> " } else { "   " };
    let title_style = if selected {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    ListItem::new(vec![
        Line::from(vec![
            Span::raw(marker),
            Span::styled(
                format!("[{}] ", task.priority),
                Style::default().fg(priority_color(task.priority)),
            ),
            Span::styled(task.title.clone(), title_style),
        ]),
        Line::from(Span::raw(format!(
            "   {} · {} · due {} · {}h",
            project_name,
            assignee_name,
            task.due_date.format("%b %d"),
            task.estimated_hours
        ))),
    ])
}

fn render_task_board(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)].as_ref())
        .split(area);

    // Current search and filters
    let project_label = match &app.project_filter {
        crate::stats::ProjectFilter::All => "all".to_string(),
        crate::stats::ProjectFilter::Project(id) => {
            stats::find_project(&app.store.projects, id)
                .map(|project| project.name.clone())
                .unwrap_or_else(|| id.clone())
        }
    };
    let status_label = match app.status_filter {
        crate::stats::StatusFilter::All => "all".to_string(),
        crate::stats::StatusFilter::Only(status) => status.label().to_string(),
    };
    let search_label = if app.search_term.is_empty() {
        "-".to_string()
    } else {
        app.search_term.clone()
    };
    let filter_line = Paragraph::new(Line::from(vec![
        Span::raw(" Search: "),
        Span::styled(search_label, Style::default().fg(Color::Yellow)),
        Span::raw("  Project: "),
        Span::styled(project_label, Style::default().fg(Color::Yellow)),
        Span::raw("  Status: "),
        Span::styled(status_label, Style::default().fg(Color::Yellow)),
    ]));
    f.render_widget(filter_line, chunks[0]);

    let filtered = app.visible_tasks();
    let selected_id = app
        .state
        .selected()
        .and_then(|i| filtered.get(i))
        .map(|task| task.id.clone());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ]
            .as_ref(),
        )
        .split(chunks[1]);

    for (i, status) in TaskStatus::ALL.iter().enumerate() {
        let column_tasks = stats::tasks_by_status(&filtered, *status);
        let title = format!("{} ({})", status.label(), column_tasks.len());

        let items: Vec<ListItem> = if column_tasks.is_empty() {
            vec![ListItem::new("   -")]
        } else {
            column_tasks
                .iter()
                .map(|task| {
                    let selected = selected_id.as_deref() == Some(task.id.as_str());
                    task_card(app, task, selected)
                })
                .collect()
        };

        let widget = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(status_color(*status))),
        );
        f.render_widget(widget, columns[i]);
    }
}

fn render_projects(f: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .store
        .projects
        .iter()
        .map(|project| {
            let project_tasks: Vec<&Task> = app
                .store
                .tasks
                .iter()
                .filter(|task| task.project_id == project.id)
                .collect();
            let completed = project_tasks
                .iter()
                .filter(|task| task.status == TaskStatus::Completed)
                .count();
            // Reports and the project list show the derived number
            let derived = stats::project_progress(&project.id, &app.store.tasks);

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        project.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  [{}]", project.status),
                        Style::default().fg(project_status_color(project.status)),
                    ),
                ]),
                Line::from(Span::raw(format!("  {}", project.description))),
                Line::from(vec![
                    Span::raw(format!("  {} ", progress_bar(derived, 20))),
                    Span::raw(format!(
                        " {}/{} tasks · {} members · due {}",
                        completed,
                        project_tasks.len(),
                        project.team_members.len(),
                        project.due_date.format("%b %d, %Y")
                    )),
                ]),
                Line::from(Span::raw("")),
            ])
        })
        .collect();

    let widget = if items.is_empty() {
        List::new(vec![ListItem::new("No projects")])
            .block(Block::default().borders(Borders::ALL).title("Projects"))
    } else {
        List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Projects"))
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ")
    };
    f.render_stateful_widget(widget, area, &mut app.state);
}

fn render_team(f: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .store
        .users
        .iter()
        .map(|user| {
            let user_stats = stats::user_stats(&user.id, &app.store.tasks);
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        user.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  [{}]", user.role),
                        Style::default().fg(role_color(user.role)),
                    ),
                    Span::raw(format!("  {}", user.email)),
                ]),
                Line::from(Span::raw(format!(
                    "  {} tasks · {} completed · {} in progress · {}h worked",
                    user_stats.total_tasks,
                    user_stats.completed_tasks,
                    user_stats.in_progress_tasks,
                    user_stats.total_hours
                ))),
                Line::from(Span::raw(format!(
                    "  {}",
                    progress_bar(user_stats.completion_rate, 20)
                ))),
                Line::from(Span::raw("")),
            ])
        })
        .collect();

    let title = format!("Team ({} members)", app.store.users.len());
    let widget = if items.is_empty() {
        List::new(vec![ListItem::new("No team members")])
            .block(Block::default().borders(Borders::ALL).title(title))
    } else {
        List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ")
    };
    f.render_stateful_widget(widget, area, &mut app.state);
}

fn render_reports(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)].as_ref())
        .split(area);

    let tasks = &app.store.tasks;
    let projects = &app.store.projects;

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ]
            .as_ref(),
        )
        .split(chunks[0]);
    stat_card(f, cards[0], "Total Tasks", tasks.len().to_string(), Color::Blue);
    stat_card(
        f,
        cards[1],
        "Completion Rate",
        format!("{}%", stats::completion_rate(tasks)),
        Color::Green,
    );
    stat_card(
        f,
        cards[2],
        "Total Hours",
        format!("{}h", stats::total_actual_hours(tasks)),
        Color::Magenta,
    );
    stat_card(
        f,
        cards[3],
        "Avg. Project Progress",
        format!("{}%", stats::average_stored_progress(projects)),
        Color::Yellow,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[1]);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[1]);

    // Status distribution
    let mut lines: Vec<Line> = Vec::new();
    for share in stats::status_distribution(tasks) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<12}", share.key.label()),
                Style::default().fg(status_color(share.key)),
            ),
            Span::raw(format!("{:>3}  {}", share.count, progress_bar(share.percentage, 15))),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::raw("No tasks")));
    }
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Task Status Distribution"),
    );
    f.render_widget(widget, top[0]);

    // Priority distribution
    let mut lines: Vec<Line> = Vec::new();
    for share in stats::priority_distribution(tasks) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<12}", share.key.label()),
                Style::default().fg(priority_color(share.key)),
            ),
            Span::raw(format!("{:>3}  {}", share.count, progress_bar(share.percentage, 15))),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::raw("No tasks")));
    }
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Priority Distribution"),
    );
    f.render_widget(widget, top[1]);

    // Project progress: derived from task counts next to the stored field
    let mut lines: Vec<Line> = Vec::new();
    for project in projects {
        let derived = stats::project_progress(&project.id, tasks);
        let total = tasks
            .iter()
            .filter(|task| task.project_id == project.id)
            .count();
        let completed = tasks
            .iter()
            .filter(|task| task.project_id == project.id && task.status == TaskStatus::Completed)
            .count();
        lines.push(Line::from(Span::styled(
            project.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::raw(format!(
            "  {}  {}/{} tasks (stored: {}%)",
            progress_bar(derived, 15),
            completed,
            total,
            project.progress
        ))));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::raw("No projects")));
    }
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Project Progress"),
    );
    f.render_widget(widget, bottom[0]);

    // Team productivity
    let mut lines: Vec<Line> = Vec::new();
    for user in &app.store.users {
        let user_stats = stats::user_stats(&user.id, tasks);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<20}", user.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "{} tasks · {} completed · {}h · {}%",
                user_stats.total_tasks,
                user_stats.completed_tasks,
                user_stats.total_hours,
                user_stats.completion_rate
            )),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::raw("No team members")));
    }
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Team Productivity"),
    );
    f.render_widget(widget, bottom[1]);
}

fn render_add_task_popup(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let popup_width = (area.width * 60 / 100).max(30);
    let popup_area = centered_rect_absolute(popup_width, 8, area);

    f.render_widget(Clear, popup_area);

    let popup_title = if app.view == View::Projects {
        "New Project"
    } else {
        "New Task (!1-!4 priority, #tag)"
    };
    let outer = Block::default()
        .title(popup_title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));
    let inner = outer.inner(popup_area);
    f.render_widget(outer, popup_area);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)].as_ref())
        .split(inner);

    let active_style = Style::default().fg(Color::White);
    let inactive_style = Style::default().fg(Color::DarkGray);

    let title_input = Paragraph::new(app.new_task_title.as_str())
        .style(if app.active_input == ActiveInput::Title {
            active_style
        } else {
            inactive_style
        })
        .block(Block::default().borders(Borders::ALL).title("Title"))
        .wrap(Wrap { trim: false });
    f.render_widget(title_input, fields[0]);

    let description_input = Paragraph::new(app.new_task_description.as_str())
        .style(if app.active_input == ActiveInput::Description {
            active_style
        } else {
            inactive_style
        })
        .block(Block::default().borders(Borders::ALL).title("Description"))
        .wrap(Wrap { trim: false });
    f.render_widget(description_input, fields[1]);
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let size = f.area();

            // Split the main layout into tabs, body and footer
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(0)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Min(0),
                        Constraint::Length(2),
                    ]
                    .as_ref(),
                )
                .split(size);

            let tabs_chunk = chunks[0];
            let body_chunk = chunks[1];
            let footer_chunk = chunks[2];

            render_tabs(f, &app, tabs_chunk);

            match app.view {
                View::Dashboard => render_dashboard(f, &app, body_chunk),
                View::Tasks => render_task_board(f, &app, body_chunk),
                View::Projects => render_projects(f, &mut app, body_chunk),
                View::Team => render_team(f, &mut app, body_chunk),
                View::Reports => render_reports(f, &app, body_chunk),
            }

            if let InputMode::Editing | InputMode::Insert = app.input_mode {
                render_add_task_popup(f, &app, body_chunk);
            }

            // Render the legend in the footer; in search mode the first
            // footer line shows the query instead
            if let InputMode::Search = app.input_mode {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(1), Constraint::Length(1)].as_ref())
                    .split(footer_chunk);
                let search = Paragraph::new(format!("/{}", app.search_term))
                    .style(Style::default().fg(Color::Yellow));
                f.render_widget(search, rows[0]);
                let legend = Paragraph::new(get_legend(&app.input_mode))
                    .style(Style::default().fg(Color::White))
                    .alignment(Alignment::Left)
                    .wrap(Wrap { trim: true });
                f.render_widget(legend, rows[1]);
            } else {
                let legend = Paragraph::new(get_legend(&app.input_mode))
                    .style(Style::default().fg(Color::White))
                    .alignment(Alignment::Left)
                    .wrap(Wrap { trim: true });
                f.render_widget(legend, footer_chunk);
            }
        })?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                let should_quit = app.handle_input(key);
                if should_quit {
                    return Ok(());
                }
            }
        }
    }
}
