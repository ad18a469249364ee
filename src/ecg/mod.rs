//! ECG recovery from AliveCor report PDFs.
//!
//! The report draws the rhythm strip as vector paths, so the samples can be
//! read back from the page's content stream instead of from pixels. See
//! [`EcgScanner`] for the page structure that is recognised.

mod graphics;
mod options;
mod recording;
mod scanner;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::parser::{Document, Page};

pub use graphics::GraphicsMap;
pub use options::EcgOptions;
pub use recording::{
    recording_name, recording_uri, Clock, EcgRecording, Event, PlotLayout, Recording, Signal,
    BEAT_EVENT_TYPE, DEFAULT_REPOSITORY,
};
pub use scanner::EcgScanner;

/// Millimetres per PDF point.
pub const MM_PER_POINT: f64 = 25.4 / 72.0;

/// Recover the ECG from a single page.
pub fn extract_ecg_from_page(page: &Page<'_>, options: &EcgOptions) -> Result<EcgRecording> {
    let contents = page.contents()?.ok_or_else(|| {
        Error::MissingObject(format!("content stream for page {}", page.number()))
    })?;
    let ops = contents.operations()?;
    log::debug!(
        "Scanning {} content operations on page {}",
        ops.len(),
        page.number()
    );
    EcgScanner::new(options).scan(&ops)
}

/// Recover the ECG from the configured page of an opened document.
pub fn extract_ecg_from_document(doc: &Document, options: &EcgOptions) -> Result<EcgRecording> {
    let page = doc.page(options.page)?;
    extract_ecg_from_page(&page, options)
}

/// Open a report PDF and recover its ECG.
pub fn extract_ecg<P: AsRef<Path>>(path: P, options: &EcgOptions) -> Result<EcgRecording> {
    let doc = Document::open(path)?;
    extract_ecg_from_document(&doc, options)
}

/// Recover ECGs from many reports in parallel. Results keep input order.
pub fn extract_ecg_batch(
    paths: &[PathBuf],
    options: &EcgOptions,
) -> Vec<(PathBuf, Result<EcgRecording>)> {
    paths
        .par_iter()
        .map(|path| {
            let result = extract_ecg(path, options);
            if let Err(e) = &result {
                log::warn!("{}: {}", path.display(), e);
            }
            (path.clone(), result)
        })
        .collect()
}
