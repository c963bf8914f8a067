use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};

use crate::domain::models::IdeKey;

/// User-defined shortcuts for IDE keywords, e.g. `py` → `pycharm`.
pub type IdeAliases = BTreeMap<String, IdeKey>;

/// Launcher input split into an optional IDE restriction and the fuzzy query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherQuery {
    pub ide: Option<IdeKey>,
    pub query: String,
}

impl LauncherQuery {
    /// Splits `input` on spaces and slashes. When the first word names an IDE
    /// or an alias, only that IDE is searched and the remaining words form the
    /// query.
    pub fn parse(input: &str, aliases: &IdeAliases) -> Self {
        let args: Vec<String> = input
            .split([' ', '/'])
            .filter(|arg| !arg.is_empty())
            .map(str::to_lowercase)
            .collect();

        let ide = args.first().and_then(|keyword| {
            IdeKey::parse(keyword)
                .ok()
                .or_else(|| aliases.get(keyword.as_str()).copied())
        });

        let words = if ide.is_some() { &args[1..] } else { &args[..] };
        Self {
            ide,
            query: words.join(" ").trim().to_string(),
        }
    }

    pub fn ides(&self) -> Vec<IdeKey> {
        match self.ide {
            Some(ide) => vec![ide],
            None => IdeKey::ALL.to_vec(),
        }
    }
}

/// Parses `alias:ide` pairs separated by `;`, e.g. `py:pycharm; ws:webstorm`.
pub fn parse_aliases(value: &str) -> Result<IdeAliases> {
    let mut aliases = IdeAliases::new();

    for pair in value.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (alias, ide) = pair
            .split_once(':')
            .ok_or_else(|| anyhow!("invalid alias syntax: {pair} (expected alias:ide)"))?;
        let alias = alias.trim().to_lowercase();
        if alias.is_empty() {
            return Err(anyhow!("alias name cannot be empty for IDE: {}", ide.trim()));
        }

        let ide = IdeKey::parse(ide).with_context(|| format!("invalid alias '{alias}'"))?;
        aliases.insert(alias, ide);
    }

    Ok(aliases)
}
