use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::models::IdeKey;

/// Finds the configuration directories JetBrains IDEs write their recent
/// projects into, e.g. `~/.config/JetBrains/PyCharm2024.1/options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeLocator {
    jetbrains_config_dir: PathBuf,
    studio_config_dir: PathBuf,
}

impl IdeLocator {
    pub fn new(jetbrains_config_dir: impl Into<PathBuf>, studio_config_dir: impl Into<PathBuf>) -> Self {
        Self {
            jetbrains_config_dir: jetbrains_config_dir.into(),
            studio_config_dir: studio_config_dir.into(),
        }
    }

    pub fn config_root(&self, ide: IdeKey) -> &Path {
        match ide {
            IdeKey::AndroidStudio => &self.studio_config_dir,
            _ => &self.jetbrains_config_dir,
        }
    }

    /// Versioned configuration directories of `ide`, newest first.
    pub fn config_dirs(&self, ide: IdeKey) -> Vec<PathBuf> {
        let prefix = ide.data().config_prefix;
        let Ok(read_dir) = fs::read_dir(self.config_root(ide)) else {
            return Vec::new();
        };

        let mut versioned: Vec<(Vec<u32>, PathBuf)> = read_dir
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let version = parse_version(name.strip_prefix(prefix)?)?;
                Some((version, entry.path()))
            })
            .collect();

        versioned.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        versioned.into_iter().map(|(_, path)| path).collect()
    }

    /// The recent projects file of the newest installed version that has one.
    pub fn recent_projects_file(&self, ide: IdeKey) -> Option<PathBuf> {
        let file = self
            .config_dirs(ide)
            .into_iter()
            .map(|dir| dir.join("options").join(ide.recent_projects_file_name()))
            .find(|file| file.is_file());
        debug!(ide = %ide, file = ?file, "located recent projects file");
        file
    }
}

/// Parses the suffix after the IDE prefix, e.g. `2023.2` or `CE2023.2`.
fn parse_version(suffix: &str) -> Option<Vec<u32>> {
    let digits = suffix.trim_start_matches(|c: char| c.is_ascii_uppercase());
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    digits
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect()
}
