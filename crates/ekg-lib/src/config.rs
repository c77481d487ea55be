use crate::pipeline::PipelineConfig;
use anyhow::{Context, Result};
use std::path::Path;

impl PipelineConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: PipelineConfig = toml::from_str(text).context("parsing pipeline config")?;
        Ok(cfg)
    }
}

/// Load and validate a pipeline config from disk.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg = PipelineConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::bandpass::FilterSymmetry;
    use std::io::Write;

    #[test]
    fn partial_document_keeps_defaults() {
        let cfg = PipelineConfig::from_toml_str(
            r#"
            duration_s = 5.0
            seed = 7
            symmetry = "mirrored"

            [noise]
            line_hz = 50.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.duration_s, 5.0);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.symmetry, FilterSymmetry::Mirrored);
        assert_eq!(cfg.fs, 250.0);
        assert_eq!(cfg.noise.line_hz, 50.0);
        assert_eq!(cfg.noise.gaussian_std, 0.05);
    }

    #[test]
    fn empty_document_is_the_default() {
        let cfg = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn load_rejects_inverted_cutoffs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lowcut_hz = 40.0\nhighcut_hz = 0.5").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("cutoff"), "{err}");
    }

    #[test]
    fn load_reports_unknown_types() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fs = \"fast\"").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
