//! Acquisition through an external browser-automation command.
//!
//! The command is expected to drive the source site's date picker and export
//! button and leave a CSV in the download directory. It runs to completion
//! in the foreground; a hung command hangs the caller.

use crate::adapters::download_dir_adapter::DownloadDirAdapter;
use crate::domain::asset::Asset;
use crate::domain::error::CryptochartError;
use crate::domain::normalizer::RawExport;
use crate::domain::settings::AcquisitionSettings;
use crate::ports::acquisition_port::AcquisitionPort;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::process::Command;
use std::time::SystemTime;
use tracing::{info, warn};

pub struct CommandAdapter {
    program: String,
    args: Vec<String>,
    source_url: String,
    start_date: NaiveDate,
    download_dir: PathBuf,
}

impl CommandAdapter {
    pub fn new(
        program: String,
        args: Vec<String>,
        source_url: String,
        start_date: NaiveDate,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            program,
            args,
            source_url,
            start_date,
            download_dir,
        }
    }

    /// `None` when no command is configured.
    pub fn from_settings(settings: &AcquisitionSettings) -> Option<Self> {
        settings.command.as_ref().map(|program| {
            Self::new(
                program.clone(),
                settings.args.clone(),
                settings.source_url.clone(),
                settings.start_date,
                settings.download_dir.clone(),
            )
        })
    }

    /// Substitutes `{ticker}`, `{name}`, `{slug}`, `{url}`, `{start_date}`
    /// and `{download_dir}`.
    pub fn expand(&self, template: &str, asset: &Asset) -> String {
        let slug = asset.slug();
        let url = self.source_url.replace("{slug}", &slug);
        template
            .replace("{ticker}", asset.ticker.as_str())
            .replace("{name}", asset.name)
            .replace("{slug}", &slug)
            .replace("{url}", &url)
            .replace("{start_date}", &self.start_date.format("%Y-%m-%d").to_string())
            .replace("{download_dir}", &self.download_dir.to_string_lossy())
    }
}

impl AcquisitionPort for CommandAdapter {
    fn acquire(&self, asset: &Asset) -> Result<RawExport, CryptochartError> {
        let failed = |reason: String| CryptochartError::AcquisitionFailed {
            ticker: asset.ticker.to_string(),
            reason,
        };

        let args: Vec<String> = self.args.iter().map(|a| self.expand(a, asset)).collect();
        let started = SystemTime::now();

        info!(
            program = %self.program,
            ?args,
            ticker = %asset.ticker,
            "running acquisition command"
        );
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| failed(format!("failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            warn!(program = %self.program, %status, "acquisition command failed");
            return Err(failed(format!("{} exited with {}", self.program, status)));
        }

        // one second of slack for coarse filesystem timestamps
        let cutoff = started
            .checked_sub(std::time::Duration::from_secs(1))
            .unwrap_or(started);
        DownloadDirAdapter::new(self.download_dir.clone())
            .newer_than(cutoff)
            .acquire(asset)
    }
}
