use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use roxmltree::{Document, Node};
use tracing::debug;

use crate::domain::models::{IdeKey, Project};
use crate::storage::paths::expand_home;

const RECENT_PROJECTS_MANAGER: &str = "RecentProjectsManager";
const RECENT_DIRECTORY_PROJECTS_MANAGER: &str = "RecentDirectoryProjectsManager";
const USER_HOME_MACRO: &str = "$USER_HOME$";

/// A path listed in a recent projects file, with its last open time when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry {
    pub path: String,
    pub timestamp: Option<i64>,
}

/// Reads an IDE's recent projects file. A missing file means no projects.
pub fn parse_recent_projects(file_path: &Path, ide: IdeKey) -> Result<Vec<Project>> {
    if !file_path.is_file() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(file_path)
        .with_context(|| format!("failed reading recent projects file: {}", file_path.display()))?;
    let entries = parse_recent_entries(&content)
        .with_context(|| format!("failed parsing recent projects file: {}", file_path.display()))?;
    debug!(ide = %ide, count = entries.len(), file = %file_path.display(), "parsed recent projects");

    Ok(entries
        .into_iter()
        .map(|entry| project_from_entry(entry, ide))
        .collect())
}

/// Extracts project paths from the XML, in file order without duplicates.
pub fn parse_recent_entries(content: &str) -> Result<Vec<RecentEntry>> {
    let doc = Document::parse(content).context("invalid XML")?;
    let managers: Vec<Node<'_, '_>> = [RECENT_PROJECTS_MANAGER, RECENT_DIRECTORY_PROJECTS_MANAGER]
        .into_iter()
        .filter_map(|name| first_component(&doc, name))
        .collect();

    let mut raw_paths = Vec::new();
    for manager in &managers {
        if let Some(list) = option_named(*manager, "recentPaths").and_then(|o| child(o, "list")) {
            raw_paths.extend(
                children(list, "option").filter_map(|option| option.attribute("value")),
            );
        }
    }

    let mut timestamps = HashMap::new();
    for manager in &managers {
        if let Some(map) = option_named(*manager, "additionalInfo").and_then(|o| child(o, "map")) {
            for entry in children(map, "entry") {
                let Some(path) = entry.attribute("value").or_else(|| entry.attribute("key")) else {
                    continue;
                };
                raw_paths.push(path);
                if let Some(timestamp) = open_timestamp(entry) {
                    timestamps
                        .entry(path.replace(USER_HOME_MACRO, "~"))
                        .or_insert(timestamp);
                }
            }
        }
    }

    let mut entries: Vec<RecentEntry> = Vec::new();
    for raw in raw_paths {
        let path = raw.replace(USER_HOME_MACRO, "~");
        if entries.iter().any(|entry| entry.path == path) {
            continue;
        }
        let timestamp = timestamps.get(&path).copied();
        entries.push(RecentEntry { path, timestamp });
    }

    Ok(entries)
}

fn project_from_entry(entry: RecentEntry, ide: IdeKey) -> Project {
    let full_path = expand_home(&entry.path);
    let idea_dir = full_path.join(".idea");

    let name = fs::read_to_string(idea_dir.join(".name"))
        .map(|content| content.replace('\n', ""))
        .unwrap_or_default();
    let name = if name.is_empty() {
        basename(&entry.path)
    } else {
        name
    };

    let icon_pattern = format!(
        "{}/icon.*",
        glob::Pattern::escape(&idea_dir.to_string_lossy())
    );
    let icon = glob::glob(&icon_pattern)
        .ok()
        .and_then(|mut paths| paths.find_map(Result::ok));

    let mut project = Project::new(name, ide, entry.path);
    project.timestamp = entry.timestamp;
    match icon {
        Some(icon) => project.with_icon(icon),
        None => project,
    }
}

fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn first_component<'a, 'input>(doc: &'a Document<'input>, name: &str) -> Option<Node<'a, 'input>> {
    doc.descendants()
        .find(|node| node.has_tag_name("component") && node.attribute("name") == Some(name))
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(tag))
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |c| c.has_tag_name(tag))
}

fn option_named<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.has_tag_name("option") && c.attribute("name") == Some(name))
}

fn open_timestamp(entry: Node<'_, '_>) -> Option<i64> {
    let info = entry
        .descendants()
        .find(|node| node.has_tag_name("RecentProjectMetaInfo"))?;
    ["projectOpenTimestamp", "activationTimestamp"]
        .into_iter()
        .find_map(|name| option_named(info, name)?.attribute("value")?.parse().ok())
}
