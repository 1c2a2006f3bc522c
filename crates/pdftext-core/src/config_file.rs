use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub max_input_mb: Option<u64>,
    pub header_exclusion: Option<f32>,
    pub footer_exclusion: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"pdftext_core=debug"`.
    pub filter: Option<String>,
}

/// Platform config directory path: `<config_dir>/pdftext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdftext").join("config.toml"))
}

/// Load config by cascading CWD `.pdftext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdftext.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_ex = base.extraction.unwrap_or_default();
    let over_ex = overlay.extraction.unwrap_or_default();
    let base_log = base.logging.unwrap_or_default();
    let over_log = overlay.logging.unwrap_or_default();

    ConfigFile {
        extraction: Some(ExtractionConfig {
            max_input_mb: over_ex.max_input_mb.or(base_ex.max_input_mb),
            header_exclusion: over_ex.header_exclusion.or(base_ex.header_exclusion),
            footer_exclusion: over_ex.footer_exclusion.or(base_ex.footer_exclusion),
        }),
        logging: Some(LoggingConfig {
            filter: over_log.filter.or(base_log.filter),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_parses() {
        let config: ConfigFile = toml::from_str("[extraction]\nmax_input_mb = 32\n").unwrap();
        let extraction = config.extraction.unwrap();
        assert_eq!(extraction.max_input_mb, Some(32));
        assert_eq!(extraction.header_exclusion, None);
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_merge_overlay_wins() {
        let base = ConfigFile {
            extraction: Some(ExtractionConfig {
                max_input_mb: Some(10),
                header_exclusion: Some(0.04),
                footer_exclusion: None,
            }),
            logging: Some(LoggingConfig {
                filter: Some("warn".into()),
            }),
        };
        let overlay = ConfigFile {
            extraction: Some(ExtractionConfig {
                max_input_mb: Some(20),
                header_exclusion: None,
                footer_exclusion: Some(0.05),
            }),
            logging: None,
        };

        let merged = merge(base, overlay);
        let extraction = merged.extraction.unwrap();
        assert_eq!(extraction.max_input_mb, Some(20));
        assert_eq!(extraction.header_exclusion, Some(0.04));
        assert_eq!(extraction.footer_exclusion, Some(0.05));
        assert_eq!(merged.logging.unwrap().filter.as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nfilter = \"pdftext_core=debug\"\n").unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(
            config.logging.unwrap().filter.as_deref(),
            Some("pdftext_core=debug")
        );
    }

    #[test]
    fn test_missing_or_broken_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("nope.toml")).is_none());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[extraction\nmax_input_mb = ").unwrap();
        assert!(load_from_path(&broken).is_none());
    }
}
