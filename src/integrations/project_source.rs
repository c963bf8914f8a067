use anyhow::Result;
use tracing::warn;

use crate::domain::models::{IdeKey, Project};
use crate::domain::projects_list::ProjectsList;
use crate::integrations::ide_locator::IdeLocator;
use crate::integrations::recent_projects::parse_recent_projects;

pub trait ProjectSource: Send {
    fn recent_projects(&self, ide: IdeKey) -> Result<Vec<Project>>;
}

/// Reads recent projects from installed JetBrains IDEs.
pub struct JetBrainsSource {
    locator: IdeLocator,
}

impl JetBrainsSource {
    pub fn new(locator: IdeLocator) -> Self {
        Self { locator }
    }
}

impl ProjectSource for JetBrainsSource {
    fn recent_projects(&self, ide: IdeKey) -> Result<Vec<Project>> {
        match self.locator.recent_projects_file(ide) {
            Some(file) => parse_recent_projects(&file, ide),
            None => Ok(Vec::new()),
        }
    }
}

pub struct StaticSource {
    projects: Vec<Project>,
}

impl StaticSource {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }
}

impl ProjectSource for StaticSource {
    fn recent_projects(&self, ide: IdeKey) -> Result<Vec<Project>> {
        Ok(self
            .projects
            .iter()
            .filter(|project| project.ide == ide)
            .cloned()
            .collect())
    }
}

/// Feeds the projects of every IDE in `ides` into `list`. An IDE whose file
/// cannot be read contributes nothing instead of failing the whole search.
pub fn collect_projects(source: &dyn ProjectSource, ides: &[IdeKey], list: &mut ProjectsList<'_>) {
    for &ide in ides {
        match source.recent_projects(ide) {
            Ok(projects) => list.extend(projects),
            Err(err) => warn!(ide = %ide, error = ?err, "skipping unreadable recent projects"),
        }
    }
}
