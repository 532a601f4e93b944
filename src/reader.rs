use crate::errors;
use crate::model::MetricsDocument;
use flate2::read::GzDecoder;
use serde_json::from_slice;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub fn parse_document(bytes: &[u8]) -> errors::Result<Option<MetricsDocument>> {
    let doc = from_slice::<Option<MetricsDocument>>(bytes)?;
    Ok(doc)
}

/// Reads a metrics document from disk. Files ending in `.gz` are gunzipped first.
pub fn read_document<P: AsRef<Path>>(path: P) -> errors::Result<Option<MetricsDocument>> {
    let bytes = read_bytes(path.as_ref())?;
    parse_document(&bytes)
}

pub fn read_bytes(path: &Path) -> errors::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let f = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(f).read_to_end(&mut bytes)?;
    } else {
        let mut f = f;
        f.read_to_end(&mut bytes)?;
    }
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}
