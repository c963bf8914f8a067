use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::domain::matcher::MatcherBackend;
use crate::domain::models::IdeKey;
use crate::domain::projects_list::{DEFAULT_LIMIT, DEFAULT_MIN_SCORE};
use crate::domain::query::{parse_aliases, IdeAliases};
use crate::storage::paths::{expand_home, home_dir};

const DEFAULT_JETBRAINS_CONFIG_DIR: &str = "~/.config/JetBrains";
const DEFAULT_STUDIO_CONFIG_DIR: &str = "~/.config/Google";
const DEFAULT_SCRIPTS_DIR: &str = "~/.local/share/JetBrains/Toolbox/scripts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub min_score: u32,
    pub limit: usize,
    pub backend: MatcherBackend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    pub jetbrains_config_dir: PathBuf,
    pub studio_config_dir: PathBuf,
    pub scripts_dir: PathBuf,
    /// Holds `<ide-key>.png` images shown for projects without their own icon.
    pub icons_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub search: SearchConfig,
    pub paths: PathsConfig,
    pub aliases: IdeAliases,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                min_score: DEFAULT_MIN_SCORE,
                limit: DEFAULT_LIMIT,
                backend: MatcherBackend::default(),
            },
            paths: PathsConfig {
                jetbrains_config_dir: expand_home(DEFAULT_JETBRAINS_CONFIG_DIR),
                studio_config_dir: expand_home(DEFAULT_STUDIO_CONFIG_DIR),
                scripts_dir: expand_home(DEFAULT_SCRIPTS_DIR),
                icons_dir: None,
            },
            aliases: IdeAliases::new(),
        }
    }
}

impl RuntimeConfig {
    pub fn default_path() -> PathBuf {
        home_dir().join(".config/jbprojects/config.toml")
    }

    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading config file: {}", path.display()))?;
        self.merge_toml_text(&content)
            .with_context(|| format!("failed parsing config TOML: {}", path.display()))
    }

    fn merge_toml_text(&mut self, content: &str) -> Result<()> {
        let mut section = String::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                if !line.ends_with(']') {
                    return Err(anyhow!("line {}: invalid section syntax", idx + 1));
                }
                section = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            let (key, value_raw) = line
                .split_once('=')
                .ok_or_else(|| anyhow!("line {}: expected key=value", idx + 1))?;
            let key = key.trim();
            let value = parse_value(value_raw.trim())
                .with_context(|| format!("line {}: invalid value", idx + 1))?;

            self.apply_file_value(&section, key, value)
                .with_context(|| format!("line {}: invalid {section}.{key}", idx + 1))?;
        }

        Ok(())
    }

    fn apply_file_value(&mut self, section: &str, key: &str, value: TomlValue) -> Result<()> {
        match (section, key) {
            ("search", "min_score") => {
                self.search.min_score = value.as_u32()?;
            }
            ("search", "limit") => {
                self.search.limit = value.as_usize()?;
            }
            ("search", "backend") => {
                self.search.backend = MatcherBackend::parse(value.as_str()?)?;
            }
            ("paths", "jetbrains_config_dir") => {
                self.paths.jetbrains_config_dir = expand_home(value.as_str()?);
            }
            ("paths", "studio_config_dir") => {
                self.paths.studio_config_dir = expand_home(value.as_str()?);
            }
            ("paths", "scripts_dir") => {
                self.paths.scripts_dir = expand_home(value.as_str()?);
            }
            ("paths", "icons_dir") => {
                self.paths.icons_dir = Some(expand_home(value.as_str()?));
            }
            ("aliases", alias) => {
                let ide = IdeKey::parse(value.as_str()?)?;
                self.aliases.insert(alias.to_lowercase(), ide);
            }
            _ => {}
        }

        Ok(())
    }

    fn merge_env(&mut self) -> Result<()> {
        if let Ok(min_score) = env::var("JBPROJECTS_MIN_SCORE") {
            self.search.min_score = min_score
                .parse::<u32>()
                .with_context(|| "invalid JBPROJECTS_MIN_SCORE".to_string())?;
        }
        if let Ok(limit) = env::var("JBPROJECTS_LIMIT") {
            self.search.limit = limit
                .parse::<usize>()
                .with_context(|| "invalid JBPROJECTS_LIMIT".to_string())?;
        }
        if let Ok(backend) = env::var("JBPROJECTS_MATCHER_BACKEND") {
            self.search.backend = MatcherBackend::parse(&backend)
                .with_context(|| "invalid JBPROJECTS_MATCHER_BACKEND".to_string())?;
        }

        if let Ok(dir) = env::var("JBPROJECTS_JETBRAINS_CONFIG_DIR") {
            self.paths.jetbrains_config_dir = expand_home(&dir);
        }
        if let Ok(dir) = env::var("JBPROJECTS_STUDIO_CONFIG_DIR") {
            self.paths.studio_config_dir = expand_home(&dir);
        }
        if let Ok(dir) = env::var("JBPROJECTS_SCRIPTS_DIR") {
            self.paths.scripts_dir = expand_home(&dir);
        }
        if let Ok(dir) = env::var("JBPROJECTS_ICONS_DIR") {
            self.paths.icons_dir = Some(expand_home(&dir));
        }

        if let Ok(aliases) = env::var("JBPROJECTS_ALIASES") {
            let parsed =
                parse_aliases(&aliases).with_context(|| "invalid JBPROJECTS_ALIASES".to_string())?;
            self.aliases.extend(parsed);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.search.limit == 0 {
            return Err(anyhow!("search limit must be at least 1"));
        }
        if self.search.min_score > 100 {
            return Err(anyhow!(
                "min_score {} is out of range (expected 0-100)",
                self.search.min_score
            ));
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..idx],
            _ => {}
        }
    }
    line
}

#[derive(Debug, Clone)]
enum TomlValue {
    String(String),
    Integer(u64),
}

impl TomlValue {
    fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(value) => Ok(value.as_str()),
            Self::Integer(_) => Err(anyhow!("expected string value")),
        }
    }

    fn as_u64(&self) -> Result<u64> {
        match self {
            Self::Integer(value) => Ok(*value),
            Self::String(_) => Err(anyhow!("expected integer value")),
        }
    }

    fn as_u32(&self) -> Result<u32> {
        let value = self.as_u64()?;
        u32::try_from(value).map_err(|_| anyhow!("integer value is out of range for u32"))
    }

    fn as_usize(&self) -> Result<usize> {
        let value = self.as_u64()?;
        usize::try_from(value).map_err(|_| anyhow!("integer value is out of range for usize"))
    }
}

fn parse_value(value: &str) -> Result<TomlValue> {
    let trimmed = value.trim();
    if trimmed.starts_with('"') {
        if !trimmed.ends_with('"') || trimmed.len() < 2 {
            return Err(anyhow!("unterminated string"));
        }
        return Ok(TomlValue::String(trimmed[1..trimmed.len() - 1].to_string()));
    }

    if let Ok(number) = trimmed.parse::<u64>() {
        return Ok(TomlValue::Integer(number));
    }

    Ok(TomlValue::String(trimmed.to_string()))
}
