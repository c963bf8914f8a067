use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{anyhow, Result};
use tracing::info;

use crate::domain::models::{IdeKey, Project};
use crate::storage::paths::expand_home;

pub trait ProjectLauncher: Send {
    fn open(&mut self, project: &Project) -> Result<()>;
}

/// Opens projects through the per-IDE shell scripts JetBrains Toolbox
/// generates, e.g. `~/.local/share/JetBrains/Toolbox/scripts/pycharm`.
pub struct ScriptLauncher {
    scripts_dir: PathBuf,
}

impl ScriptLauncher {
    pub fn new(scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
        }
    }

    pub fn script_for(&self, ide: IdeKey) -> PathBuf {
        self.scripts_dir.join(ide.data().launcher_prefix)
    }
}

impl ProjectLauncher for ScriptLauncher {
    fn open(&mut self, project: &Project) -> Result<()> {
        let script = self.script_for(project.ide);
        let project_path = expand_home(&project.path);

        Command::new(&script)
            .arg(&project_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    anyhow!(
                        "failed to open {}: launcher '{}' not found; enable shell scripts in JetBrains Toolbox or set JBPROJECTS_SCRIPTS_DIR",
                        project.name,
                        script.display()
                    )
                } else {
                    anyhow!(
                        "failed to start '{} {}': {err}",
                        script.display(),
                        project_path.display()
                    )
                }
            })?;

        info!(ide = %project.ide, path = %project_path.display(), "opened project");
        Ok(())
    }
}
