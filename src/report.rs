use std::path::Path;

use crate::error::AnalysisError;
use crate::types::{Emotion, ScoreReport};

/// Column names in file order.
pub fn header() -> Vec<&'static str> {
    let mut cols = vec!["NO", "IS_SMILE", "SMILE_CONFIDENTIAL"];
    cols.extend(Emotion::ALL.iter().map(|e| e.as_str()));
    cols.extend(["SCORE", "TOTAL"]);
    cols
}

/// Serializes the report: header, one line per face, then the aggregate line
/// with only SCORE and TOTAL filled in. No faces gives a header-only file.
pub fn render_csv(report: &ScoreReport) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let width = header().len();

    writer.write_record(header())?;

    for row in &report.rows {
        let mut record = Vec::with_capacity(width);
        record.push(row.no.to_string());
        record.push(row.is_smile.to_string());
        record.push(row.smile_confidence.to_string());
        for emotion in Emotion::ALL {
            record.push(row.emotions.get(&emotion).map(|c| c.to_string()).unwrap_or_default());
        }
        record.push(String::new());
        record.push(String::new());
        writer.write_record(&record)?;
    }

    if let Some(agg) = &report.aggregate {
        let mut record = vec![String::new(); width - 2];
        record.push(agg.score.map(|s| s.to_string()).unwrap_or_default());
        record.push(agg.total.to_string());
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

pub fn write_csv(path: &Path, report: &ScoreReport) -> Result<(), AnalysisError> {
    let data = render_csv(report)?;
    std::fs::write(path, data).map_err(|e| AnalysisError::io(path, e))
}
