use super::pipeline::Artifact;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What [`write_artifacts`] did with each artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    /// Existing files left alone because `force` was off.
    pub skipped: Vec<PathBuf>,
    /// Files a dry run would have written.
    pub planned: Vec<PathBuf>,
}

/// Write artifacts under `output_dir`, creating parent directories.
///
/// Existing files are kept unless `force` is set. A dry run only reports.
pub fn write_artifacts(
    artifacts: &[Artifact],
    output_dir: &Path,
    force: bool,
    dry_run: bool,
) -> anyhow::Result<WriteReport> {
    let mut report = WriteReport::default();
    for artifact in artifacts {
        let path = output_dir.join(&artifact.path);
        if path.exists() && !force {
            warn!(path = %path.display(), "skipping existing file (use --force to overwrite)");
            report.skipped.push(path);
            continue;
        }
        if dry_run {
            info!(path = %path.display(), bytes = artifact.contents.len(), "would write");
            report.planned.push(path);
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &artifact.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "generated");
        report.written.push(path);
    }
    Ok(report)
}
