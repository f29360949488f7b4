use std::collections::BTreeMap;

use crate::types::{AggregateRow, FaceRecord, ReportRow, ScoreReport};

/// Builds one report row per face plus the smile aggregate.
///
/// The aggregate averages over smiling faces only: a face with
/// `is_smiling == false` is listed with its confidence but adds nothing to
/// `total` and is not counted in the divisor. With no faces at all the
/// aggregate is `None`; with faces but no smiles the score is `None`.
pub fn score(faces: &[FaceRecord]) -> ScoreReport {
    let rows: Vec<ReportRow> = faces.iter().enumerate().map(|(i, f)| to_row(i + 1, f)).collect();

    if rows.is_empty() {
        return ScoreReport { rows, aggregate: None };
    }

    let aggregate = aggregate(&rows);
    ScoreReport { rows, aggregate: Some(aggregate) }
}

fn to_row(no: usize, face: &FaceRecord) -> ReportRow {
    let mut emotions = BTreeMap::new();
    for e in &face.emotions {
        // Later duplicates overwrite earlier ones
        emotions.insert(e.emotion, e.confidence);
    }

    ReportRow {
        no,
        is_smile: face.smile.is_smiling,
        smile_confidence: face.smile.confidence,
        emotions,
    }
}

fn aggregate(rows: &[ReportRow]) -> AggregateRow {
    let (total, smiling) = rows
        .iter()
        .filter(|r| r.is_smile)
        .fold((0.0_f32, 0_usize), |(sum, n), r| (sum + r.smile_confidence, n + 1));

    let score = (smiling > 0).then(|| total / smiling as f32);

    AggregateRow { score, total, smiling }
}
