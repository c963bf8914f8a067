use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use jbprojects::app::{search_projects, App, SearchSettings};
use jbprojects::domain::matcher::{FuzzyScorer, SequenceMatcherBlocks};
use jbprojects::domain::models::{IdeKey, Project};
use jbprojects::domain::query::parse_aliases;
use jbprojects::integrations::clipboard::ClipboardWriter;
use jbprojects::integrations::launcher::ProjectLauncher;
use jbprojects::integrations::project_source::StaticSource;
use jbprojects::ui::handle_key_event;
use jbprojects::ui::text::render_json;

struct MockLauncher {
    log: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl ProjectLauncher for MockLauncher {
    fn open(&mut self, project: &Project) -> Result<()> {
        if self.fail {
            return Err(anyhow!("launcher script missing"));
        }
        self.log
            .lock()
            .expect("lock log")
            .push(format!("{}:{}", project.ide, project.path));
        Ok(())
    }
}

struct MockClipboard {
    copied: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl ClipboardWriter for MockClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("no display"));
        }
        self.copied.lock().expect("lock clipboard").push(text.to_string());
        Ok(())
    }
}

fn sample_projects() -> Vec<Project> {
    vec![
        Project::new("PyCharmProject", IdeKey::Pycharm, "/h/p").with_timestamp(100),
        Project::new("Django Site", IdeKey::Pycharm, "/h/d").with_timestamp(300),
        Project::new("landing-page", IdeKey::Webstorm, "/h/landing").with_timestamp(200),
        Project::new("api-gateway", IdeKey::Goland, "/h/api"),
    ]
}

fn settings() -> SearchSettings {
    SearchSettings {
        min_score: 60,
        limit: 8,
    }
}

fn app_with(log: Arc<Mutex<Vec<String>>>, fail: bool) -> App {
    app_with_clipboard(log, fail, Arc::new(Mutex::new(Vec::new())), false)
}

fn app_with_clipboard(
    log: Arc<Mutex<Vec<String>>>,
    fail: bool,
    copied: Arc<Mutex<Vec<String>>>,
    clipboard_fails: bool,
) -> App {
    App::new(
        Box::new(StaticSource::new(sample_projects())),
        Box::new(MockLauncher { log, fail }),
        Box::new(MockClipboard {
            copied,
            fail: clipboard_fails,
        }),
        FuzzyScorer::new(Box::new(SequenceMatcherBlocks)),
        settings(),
        parse_aliases("ws:webstorm").expect("aliases"),
    )
}

#[test]
fn pych_scenario_ranks_pycharm_project_first() {
    let scorer = FuzzyScorer::new(Box::new(SequenceMatcherBlocks));
    let source = StaticSource::new(sample_projects());

    let (query, projects) = search_projects(
        &source,
        "pych",
        &Default::default(),
        settings(),
        &scorer,
    );

    assert_eq!(query.query, "pych");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "PyCharmProject");
}

#[test]
fn startup_lists_projects_by_recency() {
    let app = app_with(Arc::new(Mutex::new(Vec::new())), false);

    let names: Vec<&str> = app.results().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Django Site", "landing-page", "PyCharmProject", "api-gateway"]
    );
    assert_eq!(app.status_message, "4 projects");
}

#[test]
fn typing_filters_and_enter_opens_selection() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut app = app_with(log.clone(), false);

    for c in "pych".chars() {
        app.push_char(c);
    }
    assert_eq!(app.results().len(), 1);
    assert!(app.has_query());

    app.open_selected().expect("open project");
    assert!(!app.running);
    assert_eq!(*log.lock().expect("lock log"), vec!["pycharm:/h/p".to_string()]);
}

#[test]
fn alias_prefix_narrows_to_one_ide() {
    let mut app = app_with(Arc::new(Mutex::new(Vec::new())), false);

    for c in "ws ".chars() {
        app.push_char(c);
    }

    assert_eq!(app.active_ide(), Some(IdeKey::Webstorm));
    assert_eq!(app.results().len(), 1);
    assert_eq!(app.results()[0].name, "landing-page");
}

#[test]
fn selection_wraps_around() {
    let mut app = app_with(Arc::new(Mutex::new(Vec::new())), false);

    app.select_previous();
    assert_eq!(app.selected_index, 3);
    app.select_next();
    assert_eq!(app.selected_index, 0);
}

#[test]
fn no_match_reports_empty_list() {
    let mut app = app_with(Arc::new(Mutex::new(Vec::new())), false);

    for c in "zzzz".chars() {
        app.push_char(c);
    }

    assert!(app.results().is_empty());
    assert_eq!(app.status_message, "No projects found");
    let err = app.open_selected().expect_err("nothing to open");
    assert!(err.to_string().contains("no project selected"));
}

#[test]
fn launcher_failure_keeps_app_running() {
    let mut app = app_with(Arc::new(Mutex::new(Vec::new())), true);

    let err = app.open_selected().expect_err("launcher fails");
    assert!(format!("{err:#}").contains("launcher script missing"));
    assert!(app.running);
}

#[test]
fn escape_clears_then_quits() {
    let mut app = app_with(Arc::new(Mutex::new(Vec::new())), false);
    app.push_char('a');

    app.clear_input();
    assert!(app.input.is_empty());
    assert!(app.running);
    assert_eq!(app.results().len(), 4);

    app.clear_input();
    assert!(!app.running);
}

#[test]
fn alt_enter_copies_selected_path_and_keeps_running() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let copied = Arc::new(Mutex::new(Vec::new()));
    let mut app = app_with_clipboard(log.clone(), false, copied.clone(), false);

    for c in "pych".chars() {
        app.push_char(c);
    }
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));

    assert_eq!(*copied.lock().expect("lock clipboard"), vec!["/h/p".to_string()]);
    assert!(log.lock().expect("lock log").is_empty());
    assert!(app.running);
    assert_eq!(app.status_message, "Copied /h/p");
}

#[test]
fn clipboard_failure_is_reported_in_status() {
    let mut app = app_with_clipboard(
        Arc::new(Mutex::new(Vec::new())),
        false,
        Arc::new(Mutex::new(Vec::new())),
        true,
    );

    handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));

    assert!(app.status_message.starts_with("Error: copy path of Django Site"));
    assert!(app.status_message.contains("no display"));
    assert!(app.running);
}

#[test]
fn modified_chars_are_not_typed() {
    let mut app = app_with(Arc::new(Mutex::new(Vec::new())), false);

    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
    assert!(app.input.is_empty());

    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('P'), KeyModifiers::SHIFT));
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE));
    assert_eq!(app.input, "Py");
}

#[test]
fn json_icon_falls_back_to_ide_image() {
    let projects = vec![
        Project::new("shop", IdeKey::Pycharm, "/h/shop").with_icon("/h/shop/.idea/icon.svg"),
        Project::new("api", IdeKey::Goland, "/h/api"),
    ];

    let json = render_json(&projects, false, Some(Path::new("/icons"))).expect("render json");
    let rows: serde_json::Value = serde_json::from_str(&json).expect("parse json");
    assert_eq!(rows[0]["icon"], "/h/shop/.idea/icon.svg");
    assert_eq!(rows[1]["icon"], "/icons/goland.png");
    assert!(rows[1]["score"].is_null());

    let json = render_json(&projects[1..], false, None).expect("render json");
    let rows: serde_json::Value = serde_json::from_str(&json).expect("parse json");
    assert!(rows[0]["icon"].is_null());
}
