//! CSV raw export reader.

use crate::domain::error::CryptochartError;
use crate::domain::normalizer::RawExport;
use std::fs;
use std::path::Path;

/// Reads a raw CSV export. Rows may differ in length; the normalizer decides
/// what to do with short ones.
pub fn read_raw_export(path: &Path) -> Result<RawExport, CryptochartError> {
    let content = fs::read(path).map_err(|e| CryptochartError::MalformedExport {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    parse_raw_export(&content)
}

pub fn parse_raw_export(content: &[u8]) -> Result<RawExport, CryptochartError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = rdr
        .headers()
        .map_err(|e| CryptochartError::MalformedExport {
            reason: format!("CSV header error: {}", e),
        })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| CryptochartError::MalformedExport {
            reason: format!("CSV parse error: {}", e),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawExport { headers, rows })
}
