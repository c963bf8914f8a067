use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdeKey {
    Clion,
    Idea,
    Phpstorm,
    Pycharm,
    Rider,
    Webstorm,
    Goland,
    Datagrip,
    Rubymine,
    AndroidStudio,
}

/// Static description of an IDE: display name, the prefix of its versioned
/// configuration directory and the name of its launcher script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdeData {
    pub name: &'static str,
    pub config_prefix: &'static str,
    pub launcher_prefix: &'static str,
}

impl IdeKey {
    pub const ALL: [IdeKey; 10] = [
        IdeKey::Clion,
        IdeKey::Idea,
        IdeKey::Phpstorm,
        IdeKey::Pycharm,
        IdeKey::Rider,
        IdeKey::Webstorm,
        IdeKey::Goland,
        IdeKey::Datagrip,
        IdeKey::Rubymine,
        IdeKey::AndroidStudio,
    ];

    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| anyhow!("unknown IDE key '{value}'"))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clion => "clion",
            Self::Idea => "idea",
            Self::Phpstorm => "phpstorm",
            Self::Pycharm => "pycharm",
            Self::Rider => "rider",
            Self::Webstorm => "webstorm",
            Self::Goland => "goland",
            Self::Datagrip => "datagrip",
            Self::Rubymine => "rubymine",
            Self::AndroidStudio => "android-studio",
        }
    }

    pub fn data(self) -> IdeData {
        let (name, config_prefix, launcher_prefix) = match self {
            Self::Clion => ("CLion", "CLion", "clion"),
            Self::Idea => ("IntelliJ IDEA", "IntelliJIdea", "idea"),
            Self::Phpstorm => ("PhpStorm", "PhpStorm", "phpstorm"),
            Self::Pycharm => ("PyCharm", "PyCharm", "pycharm"),
            Self::Rider => ("Rider", "Rider", "rider"),
            Self::Webstorm => ("WebStorm", "WebStorm", "webstorm"),
            Self::Goland => ("GoLand", "GoLand", "goland"),
            Self::Datagrip => ("DataGrip", "DataGrip", "datagrip"),
            Self::Rubymine => ("RubyMine", "RubyMine", "rubymine"),
            Self::AndroidStudio => ("Android Studio", "AndroidStudio", "studio"),
        };
        IdeData {
            name,
            config_prefix,
            launcher_prefix,
        }
    }

    /// Rider keeps its list of solutions in a differently named file.
    pub fn recent_projects_file_name(self) -> &'static str {
        match self {
            Self::Rider => "recentSolutions.xml",
            _ => "recentProjects.xml",
        }
    }
}

impl fmt::Display for IdeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recent project competing for a slot in the result list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub name: String,
    pub ide: IdeKey,
    pub path: String,
    pub timestamp: Option<i64>,
    pub icon: Option<PathBuf>,
    /// Rank key written when the project enters a result list; lower ranks first.
    #[serde(default)]
    pub score: f64,
}

impl Project {
    pub fn new(name: impl Into<String>, ide: IdeKey, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ide,
            path: path.into(),
            timestamp: None,
            icon: None,
            score: 0.0,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
