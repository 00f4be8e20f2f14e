//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "EPLAYERS_ROOT_FOLDER";

/// Folder (under the root) holding the record files
pub const DATABASE_DIR: &str = "Database";

/// Team record file name
pub const TEAM_FILE: &str = "equipe.csv";

/// Player record file name
pub const PLAYER_FILE: &str = "Jogador.csv";

/// Folder (under the root) served as `/img`
pub const IMAGE_DIR: &str = "wwwroot/img";

/// Sub-folder of [`IMAGE_DIR`] receiving uploaded team images
pub const TEAM_IMAGE_DIR: &str = "Equipes";

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
    pub session_idle_minutes: Option<u64>,
}

impl FileConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the config file at `explicit`, or the platform default location.
    ///
    /// A missing default file yields an empty config; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        debug!("Loading config file {}", path.display());
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. Current working directory (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, file_config: &FileConfig) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &file_config.root_folder {
        return Ok(path.clone());
    }

    // Priority 4: working directory, where the record files traditionally live
    std::env::current_dir().map_err(|e| Error::Config(format!("No working directory: {}", e)))
}

/// Default configuration file path for the platform (`<config_dir>/eplayers/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("eplayers").join("config.toml"))
}

/// Resolved file locations under a root folder
#[derive(Debug, Clone)]
pub struct Layout {
    pub root_folder: PathBuf,
}

impl Layout {
    pub fn new(root_folder: impl Into<PathBuf>) -> Self {
        Self {
            root_folder: root_folder.into(),
        }
    }

    pub fn team_file(&self) -> PathBuf {
        self.root_folder.join(DATABASE_DIR).join(TEAM_FILE)
    }

    pub fn player_file(&self) -> PathBuf {
        self.root_folder.join(DATABASE_DIR).join(PLAYER_FILE)
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root_folder.join(IMAGE_DIR)
    }

    pub fn team_image_dir(&self) -> PathBuf {
        self.image_dir().join(TEAM_IMAGE_DIR)
    }
}
