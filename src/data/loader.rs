use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, LaunchRecord, Outcome};

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_CLASS,
    COL_BOOSTER_CATEGORY,
];

/// Schema violations found while reading the launch table.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },
    #[error("row {row}: payload mass {value} is not a finite non-negative number")]
    InvalidPayload { row: usize, value: f64 },
    #[error("row {row}: class must be 0 or 1, got '{value}'")]
    InvalidOutcome { row: usize, value: String },
    #[error("file contains no launch records")]
    Empty,
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, the four required columns anywhere among others
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// Any failure here is fatal: the dashboard does not start without data.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading launch records from {}", path.display()))?;

    let dataset = Dataset::from_records(records)
        .ok_or(LoadError::Empty)
        .with_context(|| format!("loading launch records from {}", path.display()))?;

    log::info!(
        "loaded {} launches from {} ({} sites, payload {}..{} kg)",
        dataset.len(),
        path.display(),
        dataset.sites.len(),
        dataset.payload_bounds.low,
        dataset.payload_bounds.high,
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row validation shared by all formats
// ---------------------------------------------------------------------------

fn build_record(
    row: usize,
    site: &str,
    payload: Option<f64>,
    class: Option<Outcome>,
    raw_class: impl FnOnce() -> String,
    booster: &str,
) -> Result<LaunchRecord, LoadError> {
    let site = site.trim();
    if site.is_empty() {
        return Err(LoadError::MissingValue { row, column: COL_LAUNCH_SITE });
    }
    let payload_mass_kg = payload.ok_or(LoadError::MissingValue {
        row,
        column: COL_PAYLOAD_MASS,
    })?;
    if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
        return Err(LoadError::InvalidPayload { row, value: payload_mass_kg });
    }
    let outcome = class.ok_or_else(|| LoadError::InvalidOutcome { row, value: raw_class() })?;

    Ok(LaunchRecord {
        launch_site: site.to_string(),
        payload_mass_kg,
        outcome,
        booster_category: booster.trim().to_string(),
    })
}

/// `class` may arrive as `1`, `"1"`, or `1.0` depending on who wrote the file.
fn outcome_from_f64(v: f64) -> Option<Outcome> {
    if v == 0.0 {
        Some(Outcome::Failure)
    } else if v == 1.0 {
        Some(Outcome::Success)
    } else {
        None
    }
}

fn parse_outcome(s: &str) -> Option<Outcome> {
    let s = s.trim();
    match s.parse::<i64>() {
        Ok(0) => Some(Outcome::Failure),
        Ok(1) => Some(Outcome::Success),
        Ok(_) => None,
        Err(_) => s.parse::<f64>().ok().and_then(outcome_from_f64),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: Option<f64>,
    #[serde(rename = "class")]
    class: String,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
}

/// CSV layout: header row with column names, one launch per line.
/// Columns other than the four required ones are ignored.
fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column).into());
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(build_record(
            row_no,
            &row.launch_site,
            row.payload_mass_kg,
            parse_outcome(&row.class),
            || row.class.clone(),
            &row.booster_category,
        )?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "class": 1,
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let field = |column: &'static str| obj.get(column).ok_or(LoadError::MissingColumn(column));
        let site = field(COL_LAUNCH_SITE)?;
        let payload = field(COL_PAYLOAD_MASS)?;
        let class = field(COL_CLASS)?;
        let booster = field(COL_BOOSTER_CATEGORY)?;

        let outcome = match class {
            JsonValue::Number(n) => n.as_f64().and_then(outcome_from_f64),
            JsonValue::String(s) => parse_outcome(s),
            JsonValue::Bool(b) => Some(if *b { Outcome::Success } else { Outcome::Failure }),
            _ => None,
        };

        records.push(build_record(
            i,
            json_text(site),
            payload.as_f64(),
            outcome,
            || class.to_string(),
            json_text(booster),
        )?);
    }
    Ok(records)
}

fn json_text(val: &JsonValue) -> &str {
    val.as_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the four required flat columns.
///
/// Numeric columns may be any of Int32/Int64/Float32/Float64, which covers
/// files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let column = |name: &'static str| batch.column_by_name(name).ok_or(LoadError::MissingColumn(name));

        let site_col = column(COL_LAUNCH_SITE)?;
        let payload_col = column(COL_PAYLOAD_MASS)?;
        let class_col = column(COL_CLASS)?;
        let booster_col = column(COL_BOOSTER_CATEGORY)?;

        for i in 0..batch.num_rows() {
            let row = records.len();
            let site = extract_string(site_col, i)
                .with_context(|| format!("Row {row}: failed to read '{COL_LAUNCH_SITE}'"))?;
            let payload = extract_f64(payload_col, i)
                .with_context(|| format!("Row {row}: failed to read '{COL_PAYLOAD_MASS}'"))?;
            let class = extract_f64(class_col, i)
                .with_context(|| format!("Row {row}: failed to read '{COL_CLASS}'"))?;
            let booster = extract_string(booster_col, i)
                .with_context(|| format!("Row {row}: failed to read '{COL_BOOSTER_CATEGORY}'"))?;

            records.push(build_record(
                row,
                site.as_deref().unwrap_or(""),
                payload,
                class.and_then(outcome_from_f64),
                || class.map_or_else(|| "<null>".to_string(), |c| c.to_string()),
                booster.as_deref().unwrap_or(""),
            )?);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Read a string cell; `None` for null.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(Some(arr.value(row).to_string()))
        }
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        other => bail!("Expected a string column, got {other:?}"),
    }
}

/// Read a numeric cell as `f64`; `None` for null.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}
