//! Picks up raw exports from a download directory.

use crate::adapters::raw_export::read_raw_export;
use crate::domain::asset::Asset;
use crate::domain::error::CryptochartError;
use crate::domain::normalizer::RawExport;
use crate::ports::acquisition_port::AcquisitionPort;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, info};

pub struct DownloadDirAdapter {
    dir: PathBuf,
    newer_than: Option<SystemTime>,
}

impl DownloadDirAdapter {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            newer_than: None,
        }
    }

    /// Ignore files last modified before `cutoff`.
    pub fn newer_than(mut self, cutoff: SystemTime) -> Self {
        self.newer_than = Some(cutoff);
        self
    }

    /// Most recently modified `.csv` whose name contains the asset's slug.
    pub fn latest_export(&self, asset: &Asset) -> Result<PathBuf, CryptochartError> {
        let failed = |reason: String| CryptochartError::AcquisitionFailed {
            ticker: asset.ticker.to_string(),
            reason,
        };

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            failed(format!(
                "failed to read directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let slug = asset.slug();
        let mut best: Option<(SystemTime, PathBuf)> = None;

        for entry in entries {
            let entry = entry.map_err(|e| failed(format!("directory entry error: {}", e)))?;
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if !name.ends_with(".csv") || !name.contains(&slug) {
                continue;
            }

            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map_err(|e| failed(format!("cannot stat {}: {}", name, e)))?;
            if self.newer_than.is_some_and(|cutoff| modified < cutoff) {
                debug!(file = %name, "skipping export older than cutoff");
                continue;
            }
            if best.as_ref().is_none_or(|(t, _)| modified > *t) {
                best = Some((modified, entry.path()));
            }
        }

        best.map(|(_, path)| path).ok_or_else(|| {
            failed(format!(
                "no CSV export for {} in {}",
                asset.name,
                self.dir.display()
            ))
        })
    }
}

impl AcquisitionPort for DownloadDirAdapter {
    fn acquire(&self, asset: &Asset) -> Result<RawExport, CryptochartError> {
        let path = self.latest_export(asset)?;
        info!(ticker = %asset.ticker, path = %path.display(), "loading raw export");
        read_raw_export(&path)
    }
}
