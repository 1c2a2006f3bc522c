use pdftext_core::ExtractOptions;
use pdftext_core::config_file::{self, ConfigFile};
use pdftext_mupdf::MupdfBackend;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Effective runtime settings.
///
/// Resolution order: env vars > `.pdftext.toml` in the working directory >
/// platform config file > defaults. The defaults (no size limit, no
/// header/footer exclusion, logging off) give the plain extraction contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub max_input_bytes: Option<u64>,
    pub header_exclusion: Option<f32>,
    pub footer_exclusion: Option<f32>,
    pub log_filter: Option<String>,
}

impl Settings {
    pub fn resolve() -> Self {
        Self::from_sources(config_file::load_config(), |key| std::env::var(key).ok())
    }

    pub fn from_sources(config: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let extraction = config.extraction.unwrap_or_default();
        let logging = config.logging.unwrap_or_default();

        let max_input_mb =
            parse_env::<u64>(&env, "PDFTEXT_MAX_INPUT_MB").or(extraction.max_input_mb);
        let header_exclusion =
            parse_env::<f32>(&env, "PDFTEXT_HEADER_EXCLUSION").or(extraction.header_exclusion);
        let footer_exclusion =
            parse_env::<f32>(&env, "PDFTEXT_FOOTER_EXCLUSION").or(extraction.footer_exclusion);
        let log_filter = env("PDFTEXT_LOG")
            .filter(|v| !v.trim().is_empty())
            .or(logging.filter);

        Self {
            max_input_bytes: max_input_mb.map(|mb| mb.saturating_mul(BYTES_PER_MB)),
            header_exclusion: header_exclusion.filter(valid_ratio),
            footer_exclusion: footer_exclusion.filter(valid_ratio),
            log_filter,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            max_input_bytes: self.max_input_bytes,
        }
    }

    pub fn backend(&self) -> MupdfBackend {
        MupdfBackend::new()
            .with_header_exclusion(self.header_exclusion.unwrap_or(0.0))
            .with_footer_exclusion(self.footer_exclusion.unwrap_or(0.0))
    }
}

fn parse_env<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    env(key).and_then(|v| v.trim().parse().ok())
}

fn valid_ratio(ratio: &f32) -> bool {
    (0.0..1.0).contains(ratio)
}
