use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Catalog, Title};

/// Columns every catalog source must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "title",
    "type",
    "country",
    "date_added",
    "release_year",
    "rating",
    "duration",
    "listed_in",
];

/// Fatal load failures with a stable, user-facing message.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the columns in [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "title": ..., "type": ..., ...fields }, ...]`
/// * `.parquet` – flat scalar columns of the same names
pub fn load_file(path: &Path) -> Result<Catalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Process-lifetime cache
// ---------------------------------------------------------------------------

/// Caches the parsed catalog for the lifetime of the process.
///
/// The file is read once per path; repeated calls with the same path hand out
/// clones of the same `Arc`. Opening a different path replaces the entry.
#[derive(Default)]
pub struct CatalogCache {
    entry: Option<(PathBuf, Arc<Catalog>)>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Catalog>> {
        if let Some((cached_path, catalog)) = &self.entry {
            if cached_path == path {
                return Ok(Arc::clone(catalog));
            }
        }
        let catalog = Arc::new(load_file(path)?);
        self.entry = Some((path.to_path_buf(), Arc::clone(&catalog)));
        Ok(catalog)
    }
}

// ---------------------------------------------------------------------------
// Row assembly: raw cells → Title with derived fields
// ---------------------------------------------------------------------------

/// One row as it appears in the source, before field derivation.
/// Doubles as the serde target for CSV records.
#[derive(Debug, Deserialize)]
struct RawTitle {
    title: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    country: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date_added: Option<String>,
    release_year: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rating: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    duration: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    listed_in: Option<String>,
}

impl RawTitle {
    /// Derive `date_added`, `duration_minutes` and `num_seasons`.
    /// Per-row derivation never fails; unparseable cells become `None`.
    fn finish(self) -> Title {
        let date_added = self.date_added.as_deref().and_then(parse_date);
        let (duration_minutes, num_seasons) = derive_duration(self.duration.as_deref());
        Title {
            title: self.title,
            kind: self.kind,
            country: self.country,
            date_added,
            release_year: self.release_year,
            rating: self.rating,
            duration: self.duration,
            listed_in: self.listed_in,
            duration_minutes,
            num_seasons,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Parse an added-date cell. Catalog exports write "September 9, 2019";
/// ISO dates are accepted as well. Anything else becomes `None`.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in ["%B %d, %Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

/// First contiguous digit run in `s`, if any.
fn first_number(s: &str) -> Option<u32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = &s[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Split a free-text duration into `(duration_minutes, num_seasons)`.
///
/// The unit is decided by substring match, "min" checked before "Season":
/// a malformed value carrying both tokens only sets the minutes field, so
/// the two derived fields are never both populated.
pub(crate) fn derive_duration(duration: Option<&str>) -> (Option<u32>, Option<u32>) {
    let Some(text) = duration else {
        return (None, None);
    };
    let Some(n) = first_number(text) else {
        return (None, None);
    };
    if text.contains("min") {
        (Some(n), None)
    } else if text.contains("Season") {
        (None, Some(n))
    } else {
        (None, None)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col).into());
        }
    }

    let mut titles = Vec::new();
    for (row_no, record) in reader.deserialize::<RawTitle>().enumerate() {
        let raw = record.with_context(|| format!("CSV row {row_no}"))?;
        titles.push(raw.finish());
    }

    Ok(Catalog::from_titles(titles))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "title": "The Example",
///     "type": "Movie",
///     "country": "United States, India",
///     "date_added": "September 9, 2019",
///     "release_year": 2015,
///     "rating": "PG-13",
///     "duration": "90 min",
///     "listed_in": "Dramas, International Movies"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;

    let mut titles = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;

        let raw = RawTitle {
            title: json_required_str(obj, "title", i)?,
            kind: json_required_str(obj, "type", i)?,
            country: json_optional_str(obj, "country"),
            date_added: json_optional_str(obj, "date_added"),
            release_year: json_required_int(obj, "release_year", i)? as i32,
            rating: json_optional_str(obj, "rating"),
            duration: json_optional_str(obj, "duration"),
            listed_in: json_optional_str(obj, "listed_in"),
        };
        titles.push(raw.finish());
    }

    Ok(Catalog::from_titles(titles))
}

fn json_required_str(
    obj: &serde_json::Map<String, JsonValue>,
    key: &str,
    row: usize,
) -> Result<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .with_context(|| format!("row {row}: missing or non-string '{key}'"))
}

fn json_optional_str(obj: &serde_json::Map<String, JsonValue>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn json_required_int(
    obj: &serde_json::Map<String, JsonValue>,
    key: &str,
    row: usize,
) -> Result<i64> {
    obj.get(key)
        .and_then(|v| v.as_i64())
        .with_context(|| format!("row {row}: missing or non-integer '{key}'"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog with flat scalar columns.
///
/// Expected schema: `Utf8` columns for the textual fields (nullable for the
/// optional ones) and an `Int32`/`Int64` `release_year`. Works with files
/// written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut titles = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &'static str| -> Result<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name))?;
            Ok(Arc::clone(batch.column(idx)))
        };

        let title_col = column("title")?;
        let kind_col = column("type")?;
        let country_col = column("country")?;
        let date_added_col = column("date_added")?;
        let release_year_col = column("release_year")?;
        let rating_col = column("rating")?;
        let duration_col = column("duration")?;
        let listed_in_col = column("listed_in")?;

        for row in 0..batch.num_rows() {
            let raw = RawTitle {
                title: string_at(&title_col, row)?
                    .with_context(|| format!("row {row}: null 'title'"))?,
                kind: string_at(&kind_col, row)?
                    .with_context(|| format!("row {row}: null 'type'"))?,
                country: string_at(&country_col, row)?,
                date_added: string_at(&date_added_col, row)?,
                release_year: int_at(&release_year_col, row)
                    .with_context(|| format!("row {row}: bad 'release_year'"))?
                    as i32,
                rating: string_at(&rating_col, row)?,
                duration: string_at(&duration_col, row)?,
                listed_in: string_at(&listed_in_col, row)?,
            };
            titles.push(raw.finish());
        }
    }

    Ok(Catalog::from_titles(titles))
}

// -- Parquet / Arrow helpers --

/// Read an optional string cell; empty strings count as null.
fn string_at(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            arr.value(row).to_string()
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            arr.value(row).to_string()
        }
        other => bail!("expected a string column, got {other:?}"),
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

/// Read a required integer cell (Int32 or Int64).
fn int_at(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("expected an integer column, got {other:?}"),
    }
}
