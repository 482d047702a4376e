use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Contents of `Harness.toml`. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sam: SamConfig,
    pub validate: ValidateConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SamConfig {
    pub program: String,
    pub template: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for SamConfig {
    fn default() -> Self {
        SamConfig {
            program: "sam".to_owned(),
            template: PathBuf::from("template.yaml"),
            host: "0.0.0.0".to_owned(),
            port: 3000,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateConfig {
    pub region: Option<String>,
    pub checks: Vec<CheckConfig>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    pub function: String,
    pub expect: String,
}

impl Config {
    /// Reads `path`. A missing file yields the defaults, a malformed one is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("Harness.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sam.port, 3000);
        assert_eq!(config.sam.host, "0.0.0.0");
        assert_eq!(config.sam.template, PathBuf::from("template.yaml"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Harness.toml");
        fs::write(
            &path,
            r#"
[sam]
port = 8080

[validate]
region = "eu-north-1"

[[validate.checks]]
function = "MyEnterpriseLambda"
expect = "Hello from Lambda part 1"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.sam.port, 8080);
        assert_eq!(config.sam.program, "sam");
        assert_eq!(config.validate.region.as_deref(), Some("eu-north-1"));
        assert_eq!(
            config.validate.checks,
            vec![CheckConfig {
                function: "MyEnterpriseLambda".to_owned(),
                expect: "Hello from Lambda part 1".to_owned(),
            }]
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Harness.toml");
        fs::write(&path, "[sam]\nport = \"three thousand\"\n").unwrap();
        match Config::load(&path) {
            Err(Error::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
