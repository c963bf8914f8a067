use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::domain::matcher::FuzzyScorer;
use crate::domain::models::{IdeKey, Project};
use crate::domain::projects_list::ProjectsList;
use crate::domain::query::{IdeAliases, LauncherQuery};
use crate::integrations::clipboard::{ClipboardWriter, SystemClipboard};
use crate::integrations::ide_locator::IdeLocator;
use crate::integrations::launcher::{ProjectLauncher, ScriptLauncher};
use crate::integrations::project_source::{collect_projects, JetBrainsSource, ProjectSource};
use crate::storage::config::RuntimeConfig;
use crate::ui::{text, Tui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub min_score: u32,
    pub limit: usize,
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Interactive,
    Search {
        input: String,
        json: bool,
        limit: Option<usize>,
        min_score: Option<u32>,
    },
    Open {
        input: String,
    },
    Copy {
        input: String,
    },
    Ides,
}

/// Ranks recent projects for raw launcher input such as `py shop` or `api`.
pub fn search_projects(
    source: &dyn ProjectSource,
    input: &str,
    aliases: &IdeAliases,
    settings: SearchSettings,
    scorer: &FuzzyScorer,
) -> (LauncherQuery, Vec<Project>) {
    let query = LauncherQuery::parse(input, aliases);
    let mut projects =
        ProjectsList::with_defaults(&query.query, settings.min_score, settings.limit, scorer);
    collect_projects(source, &query.ides(), &mut projects);
    debug!(query = %query.query, ide = ?query.ide, results = projects.len(), "search finished");
    (query, projects.into_vec())
}

pub struct App {
    pub running: bool,
    pub status_message: String,
    pub selected_index: usize,
    pub input: String,
    query: LauncherQuery,
    results: Vec<Project>,
    settings: SearchSettings,
    aliases: IdeAliases,
    source: Box<dyn ProjectSource>,
    launcher: Box<dyn ProjectLauncher>,
    clipboard: Box<dyn ClipboardWriter>,
    scorer: FuzzyScorer,
}

impl App {
    pub fn new(
        source: Box<dyn ProjectSource>,
        launcher: Box<dyn ProjectLauncher>,
        clipboard: Box<dyn ClipboardWriter>,
        scorer: FuzzyScorer,
        settings: SearchSettings,
        aliases: IdeAliases,
    ) -> Self {
        let mut app = Self {
            running: true,
            status_message: "Ready".to_string(),
            selected_index: 0,
            input: String::new(),
            query: LauncherQuery::default(),
            results: Vec::new(),
            settings,
            aliases,
            source,
            launcher,
            clipboard,
            scorer,
        };
        app.refresh();
        app
    }

    pub fn results(&self) -> &[Project] {
        &self.results
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.results.get(self.selected_index)
    }

    pub fn active_ide(&self) -> Option<IdeKey> {
        self.query.ide
    }

    pub fn has_query(&self) -> bool {
        !self.query.query.is_empty()
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.refresh();
    }

    pub fn backspace_input(&mut self) {
        if self.input.pop().is_some() {
            self.refresh();
        }
    }

    pub fn clear_input(&mut self) {
        if self.input.is_empty() {
            self.running = false;
            return;
        }
        self.input.clear();
        self.refresh();
    }

    pub fn select_next(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    pub fn select_previous(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    pub fn open_selected(&mut self) -> Result<()> {
        let project = self
            .selected_project()
            .cloned()
            .ok_or_else(|| anyhow!("no project selected"))?;
        self.launcher
            .open(&project)
            .with_context(|| format!("open {}", project.name))?;
        self.status_message = format!("Opening {} in {}", project.name, project.ide.data().name);
        self.running = false;
        Ok(())
    }

    /// Copies the selected project's path. The picker stays open.
    pub fn copy_selected_path(&mut self) -> Result<()> {
        let project = self
            .selected_project()
            .cloned()
            .ok_or_else(|| anyhow!("no project selected"))?;
        self.clipboard
            .copy_text(&project.path)
            .with_context(|| format!("copy path of {}", project.name))?;
        self.status_message = format!("Copied {}", project.path);
        Ok(())
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }

    fn refresh(&mut self) {
        let (query, results) = search_projects(
            self.source.as_ref(),
            &self.input,
            &self.aliases,
            self.settings,
            &self.scorer,
        );
        self.query = query;
        self.results = results;
        self.selected_index = 0;
        self.status_message = if self.results.is_empty() {
            text::NO_PROJECTS.to_string()
        } else {
            format!("{} projects", self.results.len())
        };
    }
}

pub fn run(debug: bool, config_path: Option<PathBuf>, action: Action) -> Result<()> {
    init_tracing(debug);

    let config = match config_path {
        Some(path) => RuntimeConfig::load_from_path(&path),
        None => RuntimeConfig::load(),
    }
    .context("load runtime config")?;

    let locator = IdeLocator::new(
        config.paths.jetbrains_config_dir.clone(),
        config.paths.studio_config_dir.clone(),
    );
    let scorer = FuzzyScorer::with_backend(config.search.backend);
    debug!(backend = config.search.backend.label(), "fuzzy matcher selected");
    let settings = SearchSettings {
        min_score: config.search.min_score,
        limit: config.search.limit,
    };

    match action {
        Action::Interactive => {
            let mut app = App::new(
                Box::new(JetBrainsSource::new(locator)),
                Box::new(ScriptLauncher::new(config.paths.scripts_dir)),
                Box::new(SystemClipboard::new()),
                scorer,
                settings,
                config.aliases,
            );
            let mut tui = Tui::new()?;
            if let Err(err) = tui.run(&mut app) {
                warn!(error = ?err, "tui exited with error");
                return Err(err);
            }
            Ok(())
        }
        Action::Search {
            input,
            json,
            limit,
            min_score,
        } => {
            let settings = SearchSettings {
                min_score: min_score.unwrap_or(settings.min_score),
                limit: limit.unwrap_or(settings.limit).max(1),
            };
            let source = JetBrainsSource::new(locator);
            let (query, projects) =
                search_projects(&source, &input, &config.aliases, settings, &scorer);
            let scored = !query.query.is_empty();
            if json {
                println!("{}", text::render_json(&projects, scored, config.paths.icons_dir.as_deref())?);
            } else {
                print!("{}", text::render_list(&projects, scored));
            }
            Ok(())
        }
        Action::Open { input } => {
            let source = JetBrainsSource::new(locator);
            let (_, projects) =
                search_projects(&source, &input, &config.aliases, settings, &scorer);
            let project = projects
                .first()
                .ok_or_else(|| anyhow!("{} for '{input}'", text::NO_PROJECTS))?;
            ScriptLauncher::new(config.paths.scripts_dir).open(project)
        }
        Action::Copy { input } => {
            let source = JetBrainsSource::new(locator);
            let (_, projects) =
                search_projects(&source, &input, &config.aliases, settings, &scorer);
            let project = projects
                .first()
                .ok_or_else(|| anyhow!("{} for '{input}'", text::NO_PROJECTS))?;
            SystemClipboard::new().copy_text(&project.path)?;
            println!("{}", project.path);
            Ok(())
        }
        Action::Ides => {
            let rows: Vec<(IdeKey, Option<String>)> = IdeKey::ALL
                .into_iter()
                .map(|ide| {
                    let file = locator
                        .recent_projects_file(ide)
                        .map(|file| file.display().to_string());
                    (ide, file)
                })
                .collect();
            print!("{}", text::render_ides(&rows));
            Ok(())
        }
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "jbprojects=debug"
    } else {
        "jbprojects=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}
