use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::models::{IdeKey, Project};

pub const NO_PROJECTS: &str = "No projects found";

/// Plain list output, one project per line, best match first.
pub fn render_list(projects: &[Project], scored: bool) -> String {
    if projects.is_empty() {
        return format!("{NO_PROJECTS}\n");
    }

    let mut out = String::new();
    for (idx, project) in projects.iter().enumerate() {
        let _ = write!(
            out,
            "{:>2}. {} [{}] {}",
            idx + 1,
            project.name,
            project.ide.data().name,
            project.path
        );
        if scored {
            let _ = write!(out, " ({:.1})", -project.score);
        }
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonProject<'a> {
    name: &'a str,
    ide: IdeKey,
    path: &'a str,
    timestamp: Option<i64>,
    icon: Option<String>,
    score: Option<f64>,
}

/// The project's own icon, else the IDE's image from `icons_dir`.
pub fn display_icon(project: &Project, icons_dir: Option<&Path>) -> Option<PathBuf> {
    project.icon.clone().or_else(|| {
        icons_dir.map(|dir| dir.join(format!("{}.png", project.ide.as_str())))
    })
}

pub fn render_json(
    projects: &[Project],
    scored: bool,
    icons_dir: Option<&Path>,
) -> Result<String> {
    let rows: Vec<JsonProject<'_>> = projects
        .iter()
        .map(|project| JsonProject {
            name: &project.name,
            ide: project.ide,
            path: &project.path,
            timestamp: project.timestamp,
            icon: display_icon(project, icons_dir)
                .map(|icon| icon.to_string_lossy().into_owned()),
            score: scored.then_some(-project.score),
        })
        .collect();
    serde_json::to_string_pretty(&rows).context("failed to serialize projects")
}

/// One line per known IDE with the recent projects file it reads, if any.
pub fn render_ides(rows: &[(IdeKey, Option<String>)]) -> String {
    let mut out = String::new();
    for (ide, file) in rows {
        let _ = writeln!(
            out,
            "{:<15} {:<15} {}",
            ide.as_str(),
            ide.data().name,
            file.as_deref().unwrap_or("(not found)")
        );
    }
    out
}
