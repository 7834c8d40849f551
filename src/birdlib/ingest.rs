use std::{fs::File, io::Read, path::Path};

use birdpoly_domain::PtF;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    annotation::{Annotation, INCONCLUSIVE},
    cfg::CsvCfg,
    result::{BirdError, BirdResult},
    species::AbbrvTable,
    store::AnnotationStore,
};

#[derive(Deserialize, Debug)]
struct RawPoint {
    x: f64,
    y: f64,
}

#[derive(Deserialize, Debug)]
struct RawShape {
    label: String,
    points: Vec<RawPoint>,
}

/// What the annotation column of a row contains
#[derive(Debug)]
enum RowContent {
    Empty,
    Inconclusive,
    Shape { label: String, points: Vec<PtF> },
}

/// Mirrors the truthiness of decoded JSON, empty containers, `null`, `false`, `0` and `""` are
/// falsy.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn parse_annotation_field(field: &str, row: usize) -> BirdResult<RowContent> {
    let value: Value = serde_json::from_str(field)?;
    if is_falsy(&value) {
        return Ok(RowContent::Empty);
    }
    let first = match value {
        Value::Array(mut elts) => elts.swap_remove(0),
        other => {
            return Err(BirdError::MalformedRow {
                row,
                reason: format!("expected a list of annotations, got {other}"),
            })
        }
    };
    if first.as_str() == Some(INCONCLUSIVE) {
        return Ok(RowContent::Inconclusive);
    }
    let shape: RawShape = serde_json::from_value(first).map_err(|e| BirdError::MalformedRow {
        row,
        reason: format!("first element is neither {INCONCLUSIVE:?} nor a labeled polygon, {e}"),
    })?;
    if shape.points.is_empty() {
        return Err(BirdError::MalformedRow {
            row,
            reason: "polygon without points".to_string(),
        });
    }
    let points = shape
        .points
        .into_iter()
        .map(|p| PtF { x: p.x, y: p.y })
        .collect();
    Ok(RowContent::Shape {
        label: shape.label,
        points,
    })
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize, row: usize) -> BirdResult<&'a str> {
    record.get(idx).ok_or_else(|| BirdError::MalformedRow {
        row,
        reason: format!("has {} columns, column {idx} is missing", record.len()),
    })
}

/// Parses the crowd-sourcing export. The header row is skipped, rows with an empty annotation
/// are ignored, and for repeated images the last row wins.
pub fn read_annotations<R: Read>(
    rdr: R,
    csv_cfg: &CsvCfg,
    abbrv_table: &AbbrvTable,
) -> BirdResult<AnnotationStore> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);
    let mut store = AnnotationStore::new();
    let mut n_rows = 0;
    let mut n_skipped = 0;
    for (idx, record) in csv_reader.records().enumerate() {
        // 1-based with the header as row 1
        let row = idx + 2;
        let record = record?;
        n_rows += 1;
        let image_id = field(&record, csv_cfg.image_column, row)?;
        let anno_field = field(&record, csv_cfg.annotation_column, row)?;
        let annotation = match parse_annotation_field(anno_field, row)? {
            RowContent::Empty => {
                debug!("skipping row {row} of {image_id} without annotation");
                n_skipped += 1;
                continue;
            }
            RowContent::Inconclusive => {
                Annotation::inconclusive(image_id.to_string(), abbrv_table)?
            }
            RowContent::Shape { label, points } => {
                Annotation::new(image_id.to_string(), label, points, abbrv_table)?
            }
        };
        if let Some(replaced) = store.insert(annotation) {
            debug!(
                "row {row} replaces annotation of {} with label {}",
                replaced.image_id(),
                replaced.label()
            );
        }
    }
    info!(
        "read {n_rows} rows, skipped {n_skipped} without annotation, stored {} annotations",
        store.len()
    );
    Ok(store)
}

pub fn read_csv(
    path: &Path,
    csv_cfg: &CsvCfg,
    abbrv_table: &AbbrvTable,
) -> BirdResult<AnnotationStore> {
    info!("reading annotations from {path:?}");
    let file = File::open(path)?;
    read_annotations(file, csv_cfg, abbrv_table)
}
