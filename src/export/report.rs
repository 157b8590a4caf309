use crate::error::Result;
use chrono::{Local, SecondsFormat};
use plate_detect_common::DetectionResponse;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSONレポート
#[derive(Debug, Serialize)]
pub struct DetectionReport<'a> {
    pub source: &'a str,
    pub generated_at: String,
    pub plate_count: usize,
    pub plates: Vec<&'a str>,
    pub response: &'a DetectionResponse,
}

impl<'a> DetectionReport<'a> {
    pub fn new(source: &'a str, response: &'a DetectionResponse) -> Self {
        Self {
            source,
            generated_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            plate_count: response.results.len(),
            plates: response.plate_texts(),
            response,
        }
    }
}

pub fn report_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{}.json", stem))
}

pub fn write_report(
    stem: &str,
    source: &str,
    response: &DetectionResponse,
    output_dir: &Path,
) -> Result<PathBuf> {
    let path = report_path(output_dir, stem);
    let json = serde_json::to_string_pretty(&DetectionReport::new(source, response))?;
    std::fs::write(&path, json)?;
    Ok(path)
}
