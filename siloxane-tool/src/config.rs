use std::path::PathBuf;

use siloxane_couch::{ConfigSource, ServerConfig};
use tracing::debug;

use crate::error::SxError;

pub const DEFAULT_URL: &str = "http://127.0.0.1:5984";

const URL_ENV: &str = "COUCHDB_URL";

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("siloxane").join("config.toml"))
}

/// Picks where the server location comes from: `--config`, then `--url`,
/// then `COUCHDB_URL`, then the user config file, then the local default.
pub fn resolve_source(
    cli_config: Option<PathBuf>,
    cli_url: Option<String>,
) -> Result<ConfigSource, SxError> {
    let env_url = std::env::var(URL_ENV).ok().filter(|url| !url.is_empty());
    let user_config = config_path().filter(|path| path.is_file());
    let source = select_source(cli_config, cli_url, env_url, user_config)?;
    debug!(?source, "Resolved config source");
    Ok(source)
}

fn select_source(
    cli_config: Option<PathBuf>,
    cli_url: Option<String>,
    env_url: Option<String>,
    user_config: Option<PathBuf>,
) -> Result<ConfigSource, SxError> {
    if let Some(path) = cli_config {
        return Ok(ConfigSource::reference(path));
    }

    if let Some(url) = cli_url.or(env_url) {
        return Ok(ServerConfig::parse(&url)?.into());
    }

    if let Some(path) = user_config {
        return Ok(ConfigSource::reference(path));
    }

    Ok(ServerConfig::parse(DEFAULT_URL)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use siloxane_couch::DatabaseUrls;

    fn resolved_url(source: ConfigSource) -> String {
        source.resolve().unwrap().database("db")
    }

    #[test]
    fn test_cli_config_wins() {
        let source = select_source(
            Some(PathBuf::from("/etc/sx.toml")),
            Some("http://cli:5984".to_string()),
            Some("http://env:5984".to_string()),
            None,
        )
        .unwrap();
        assert!(matches!(source, ConfigSource::Reference(p) if p == PathBuf::from("/etc/sx.toml")));
    }

    #[test]
    fn test_cli_url_before_env() {
        let source = select_source(
            None,
            Some("http://cli:5984".to_string()),
            Some("http://env:5984".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(resolved_url(source), "http://cli:5984/db");
    }

    #[test]
    fn test_env_before_user_config() {
        let source = select_source(
            None,
            None,
            Some("http://env:5984".to_string()),
            Some(PathBuf::from("/home/me/.config/siloxane/config.toml")),
        )
        .unwrap();
        assert_eq!(resolved_url(source), "http://env:5984/db");
    }

    #[test]
    fn test_user_config_file() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::fs::write(file.path(), "url = \"http://from-file:5984\"\n").unwrap();

        let source = select_source(None, None, None, Some(file.path().to_path_buf())).unwrap();
        assert_eq!(resolved_url(source), "http://from-file:5984/db");
    }

    #[test]
    fn test_default_url() {
        let source = select_source(None, None, None, None).unwrap();
        assert_eq!(resolved_url(source), "http://127.0.0.1:5984/db");
    }

    #[test]
    fn test_bad_url_is_config_error() {
        let result = select_source(None, Some("localhost".to_string()), None, None);
        assert!(matches!(result, Err(SxError::Config(_))));
    }
}
