pub mod clipboard;
pub mod ide_locator;
pub mod launcher;
pub mod project_source;
pub mod recent_projects;
