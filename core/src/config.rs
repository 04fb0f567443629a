use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Environment variable consulted by the CLI when `--data-dir` is absent.
pub const DATA_DIR_ENV: &str = "TODOLIST_DATA_DIR";

const DEFAULT_DIR_NAME: &str = ".todolist";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Uses `data_dir` when given, otherwise `~/.todolist`.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(DEFAULT_DIR_NAME)
            }
        };
        Ok(Config { data_dir })
    }
}
