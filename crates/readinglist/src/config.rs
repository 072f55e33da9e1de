use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// The config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "readingList.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// The page title, shown in the `<title>` and the heading.
    pub title: String,

    /// The first line of the heading.
    pub description: String,

    /// The source repository credited in the heading.
    pub repository: RepositoryLink,

    /// The CSV file the entries are read from.
    pub input_path: PathBuf,

    /// The directory the page is written to.
    pub output_dir: PathBuf,

    /// The name of the page within `output_dir`.
    pub output_file: String,

    /// Markup inserted verbatim into the page's `<head>`.
    pub extra_head_content: String,

    /// A page template to use instead of the embedded one.
    pub template: Option<PathBuf>,

    pub open_links_in_new_tab: bool,

    /// The IANA time zone the "last modified" date is computed in.
    pub timezone: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Reading list".to_string(),
            description: "A mostly complete list of articles I've read".to_string(),
            repository: RepositoryLink::default(),
            input_path: PathBuf::from("readingList.csv"),
            output_dir: PathBuf::from(".site"),
            output_file: "index.html".to_string(),
            extra_head_content: String::new(),
            template: None,
            open_links_in_new_tab: false,
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryLink {
    pub name: String,
    pub url: Url,
}

impl Default for RepositoryLink {
    fn default() -> Self {
        Self {
            name: "codemicro/readingList".to_string(),
            url: Url::parse("https://github.com/codemicro/readingList")
                .expect("default repository URL should be valid"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown time zone '{0}'")]
    InvalidTimezone(String),
}

/// Settings given on the command line, which take precedence over the
/// config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub input_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl SiteConfig {
    /// Loads the config from `path` if given, otherwise from
    /// [`DEFAULT_CONFIG_FILE`] in `dir` if it exists, otherwise falls back to
    /// the defaults.
    pub fn discover(path: Option<&Path>, dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        let default_path = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::from_path(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(input_path) = overrides.input_path {
            self.input_path = input_path;
        }

        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timezone()?;

        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// The full path of the generated page.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();

        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.output_path(), PathBuf::from(".site/index.html"));
        assert_eq!(config.timezone().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_parse_config() {
        let config = SiteConfig::from_toml_str(indoc! {r#"
            title = "akp's reading list"
            input_path = "data/list.csv"
            output_dir = "public"
            open_links_in_new_tab = true
            timezone = "Europe/London"

            [repository]
            name = "someone/list"
            url = "https://example.com/someone/list"
        "#})
        .unwrap();

        assert_eq!(
            config,
            SiteConfig {
                title: "akp's reading list".to_string(),
                repository: RepositoryLink {
                    name: "someone/list".to_string(),
                    url: Url::parse("https://example.com/someone/list").unwrap(),
                },
                input_path: PathBuf::from("data/list.csv"),
                output_dir: PathBuf::from("public"),
                open_links_in_new_tab: true,
                timezone: "Europe/London".to_string(),
                ..Default::default()
            }
        );
        assert_eq!(config.timezone().unwrap(), Tz::Europe__London);
    }

    #[test]
    fn test_unknown_field() {
        let err = SiteConfig::from_toml_str("colour = \"blue\"").unwrap_err();

        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_invalid_timezone() {
        let err = SiteConfig::from_toml_str(r#"timezone = "Mars/Olympus_Mons""#).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidTimezone(name) if name == "Mars/Olympus_Mons"));
    }

    #[test]
    fn test_invalid_repository_url() {
        let err = SiteConfig::from_toml_str(indoc! {r#"
            [repository]
            name = "someone/list"
            url = "not a url"
        "#})
        .unwrap_err();

        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_discover_without_config_file() {
        let dir = tempfile::tempdir().unwrap();

        let config = SiteConfig::discover(None, dir.path()).unwrap();

        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_discover_picks_up_default_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "title = \"From disk\"").unwrap();

        let config = SiteConfig::discover(None, dir.path()).unwrap();

        assert_eq!(config.title, "From disk");
    }

    #[test]
    fn test_discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "title = \"Default\"").unwrap();
        let explicit = dir.path().join("other.toml");
        fs::write(&explicit, "title = \"Explicit\"").unwrap();

        let config = SiteConfig::discover(Some(explicit.as_path()), dir.path()).unwrap();

        assert_eq!(config.title, "Explicit");
    }

    #[test]
    fn test_discover_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let err = SiteConfig::discover(Some(missing.as_path()), dir.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Io { path, .. } if path == missing));
    }

    #[test]
    fn test_overrides_take_precedence_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            indoc! {r#"
                input_path = "from-config.csv"
                output_dir = "from-config"
            "#},
        )
        .unwrap();

        let mut config = SiteConfig::discover(None, dir.path()).unwrap();
        config.apply_overrides(ConfigOverrides {
            input_path: Some(PathBuf::from("from-flag.csv")),
            output_dir: None,
        });

        assert_eq!(config.input_path, PathBuf::from("from-flag.csv"));
        assert_eq!(config.output_dir, PathBuf::from("from-config"));

        config.apply_overrides(ConfigOverrides {
            input_path: None,
            output_dir: Some(PathBuf::from("public")),
        });

        assert_eq!(config.input_path, PathBuf::from("from-flag.csv"));
        assert_eq!(config.output_dir, PathBuf::from("public"));
    }
}
