use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;

/// Parse one sample per line; blank lines and `#` comments are skipped.
pub fn parse_samples(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let val: f64 = trimmed
            .parse()
            .with_context(|| format!("line {} is not a number: {}", idx + 1, trimmed))?;
        out.push(val);
    }
    if out.is_empty() {
        bail!("no numeric samples found");
    }
    Ok(out)
}

pub fn read_samples(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_samples(&text)
}

/// Write one sample per line.
pub fn write_samples<W: Write>(mut out: W, samples: &[f64]) -> Result<()> {
    for sample in samples {
        writeln!(out, "{sample}")?;
    }
    out.flush()?;
    Ok(())
}
