//! eplayers-web specific configuration

use eplayers_common::config::{resolve_root_folder, FileConfig, Layout};
use eplayers_common::Result;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Port used when neither the command line nor the config file sets one
pub const DEFAULT_PORT: u16 = 5080;

/// Session idle timeout used when the config file does not set one
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 20;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root_folder: PathBuf,
    pub bind_addr: SocketAddr,
    pub session_idle: Duration,
}

impl Config {
    /// Merge command-line values over the config file, then defaults
    pub fn resolve(
        cli_root: Option<&Path>,
        cli_port: Option<u16>,
        host: IpAddr,
        file_config: &FileConfig,
    ) -> Result<Self> {
        let root_folder = resolve_root_folder(cli_root, file_config)?;
        let port = cli_port.or(file_config.port).unwrap_or(DEFAULT_PORT);
        let idle_minutes = file_config
            .session_idle_minutes
            .unwrap_or(DEFAULT_SESSION_IDLE_MINUTES);

        Ok(Self {
            root_folder,
            bind_addr: SocketAddr::new(host, port),
            session_idle: Duration::from_secs(idle_minutes.saturating_mul(60)),
        })
    }

    pub fn layout(&self) -> Layout {
        Layout::new(&self.root_folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_cli_port_overrides_file() {
        let file_config = FileConfig {
            port: Some(9000),
            ..Default::default()
        };

        let config =
            Config::resolve(Some(Path::new("/srv")), Some(7000), LOCALHOST, &file_config).unwrap();
        assert_eq!(config.bind_addr.port(), 7000);
    }

    #[test]
    fn test_file_values_used_without_cli() {
        let file_config = FileConfig {
            port: Some(9000),
            session_idle_minutes: Some(5),
            ..Default::default()
        };

        let config = Config::resolve(Some(Path::new("/srv")), None, LOCALHOST, &file_config).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.session_idle, Duration::from_secs(300));
    }

    #[test]
    fn test_huge_idle_timeout_saturates() {
        let file_config = FileConfig {
            session_idle_minutes: Some(u64::MAX),
            ..Default::default()
        };

        let config = Config::resolve(Some(Path::new("/srv")), None, LOCALHOST, &file_config).unwrap();
        assert_eq!(config.session_idle, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::resolve(Some(Path::new("/srv")), None, LOCALHOST, &FileConfig::default())
                .unwrap();
        assert_eq!(config.bind_addr, SocketAddr::new(LOCALHOST, DEFAULT_PORT));
        assert_eq!(config.session_idle, Duration::from_secs(20 * 60));
        assert_eq!(config.layout().team_file(), PathBuf::from("/srv/Database/equipe.csv"));
    }
}
