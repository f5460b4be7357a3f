use super::normalizer::normalize_raw;
use super::raw::RawStats;
use crate::Result;
use crate::extensions::ExtensionRecord;
use crate::model::StatsDocument;
use camino::{Utf8Path, Utf8PathBuf};
use futures::future::join_all;
use ohno::IntoAppError;
use std::fs::File;
use std::io::{BufReader, Read};

const LOG_TARGET: &str = "normalize";

/// Parse and normalize a stats document from a byte stream.
///
/// The stream is decoded straight into the raw stats views, without an intermediate
/// JSON tree. A read or parse failure aborts the whole document; no partial model is
/// produced.
pub fn normalize_reader(reader: impl Read, file: &str, extra: Vec<ExtensionRecord>) -> Result<StatsDocument> {
    let raw: RawStats = serde_json::from_reader(BufReader::new(reader)).into_app_err_with(|| format!("unable to parse '{file}'"))?;
    normalize_raw(raw, file, extra)
}

/// Normalize the stats file at `path`.
pub fn normalize_file(path: &Utf8Path, extra: Vec<ExtensionRecord>) -> Result<StatsDocument> {
    log::debug!(target: LOG_TARGET, "Normalizing '{path}'");

    let file = File::open(path).into_app_err_with(|| format!("unable to open stats file '{path}'"))?;
    let document = normalize_reader(file, path.as_str(), extra)?;

    log::debug!(target: LOG_TARGET, "Finished normalizing '{path}'");
    Ok(document)
}

/// Normalize several files concurrently, one blocking task per file.
///
/// Results are returned in input order once every file has finished.
pub async fn load_files(paths: &[Utf8PathBuf], extra: &[ExtensionRecord]) -> Vec<Result<StatsDocument>> {
    let tasks = paths.iter().map(|path| {
        let path = path.clone();
        let extra = extra.to_vec();
        async move {
            tokio::task::spawn_blocking(move || normalize_file(&path, extra))
                .await
                .into_app_err("normalization task failed")?
        }
    });

    join_all(tasks).await
}
