use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Connection settings, optionally loaded from a TOML file.
///
/// ```toml
/// base_url = "http://localhost:8080"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root; relative hrefs and the people collection resolve against it.
    pub base_url: String,
    /// Whole-request timeout for every HTTP call.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Apply command-line overrides on top of file or default values.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        self
    }
}

/// Load config from `path`, or defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config {}", path.display()))
}

fn parse(contents: &str) -> Result<ClientConfig> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        let cfg = load(None).unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let cfg = parse(r#"base_url = "http://api:9000""#).unwrap();
        assert_eq!(cfg.base_url, "http://api:9000");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cfg = parse("timeout_secs = 5").unwrap().with_overrides(Some("http://x".to_string()), None);
        assert_eq!(cfg.base_url, "http://x");
        assert_eq!(cfg.timeout_secs, 5);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://from-file\"").unwrap();
        let cfg = load(Some(file.path())).unwrap();
        assert_eq!(cfg.base_url, "http://from-file");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(parse("timeout_secs = \"soon\"").is_err());
    }
}
