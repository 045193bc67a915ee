use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, ListingTable};

// ---------------------------------------------------------------------------
// Once-per-process dataset handle
// ---------------------------------------------------------------------------

/// A listings file that is read at most once.
///
/// The first successful [`DatasetSource::load`] memoizes the table; every
/// later call hands out the same `Arc` without touching the file again.
#[derive(Debug)]
pub struct DatasetSource {
    path: PathBuf,
    table: OnceLock<Arc<ListingTable>>,
}

impl DatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<ListingTable>, LoadError> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file(&self.path)?);
        log::info!(
            "Loaded {} listings with columns {:?} from {}",
            table.len(),
            table.column_names,
            self.path.display()
        );
        let missing_rent = table.listings.iter().filter(|l| l.monthly_rent.is_none()).count();
        if missing_rent > 0 {
            log::warn!("{missing_rent} listings have no usable monthly rent and will never pass the rent filter");
        }
        Ok(Arc::clone(self.table.get_or_init(|| table)))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-separated with a header row (the usual export)
/// * `.json`    – `[{ "location": ..., "monthly_rent": ..., ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats and booleans
pub fn load_file(path: &Path) -> Result<ListingTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<ListingTable, LoadError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(CellValue::guess).collect());
    }

    ListingTable::from_records(headers, rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns are the
/// union of all keys; a key absent from a record reads as missing.
fn load_json(path: &Path) -> Result<ListingTable, LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".into()))?;

    let mut objects = Vec::with_capacity(records.len());
    let mut column_names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("record {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            column_names
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    ListingTable::from_records(column_names, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both Pandas (`df.to_parquet()`) and Polars
/// (`df.write_parquet()`). Unsupported column types are read as text labels.
fn load_parquet(path: &Path) -> Result<ListingTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        for row in 0..batch.num_rows() {
            rows.push(batch.columns().iter().map(|col| extract_cell(col, row)).collect());
        }
    }

    ListingTable::from_records(column_names, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|a| CellValue::String(a.value(row).to_string())),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Int32 => col.as_primitive_opt::<Int32Type>().map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col.as_primitive_opt::<Int64Type>().map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col.as_primitive_opt::<Float32Type>().map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col.as_primitive_opt::<Float64Type>().map(|a| {
            let v = a.value(row);
            if v.is_nan() {
                CellValue::Null
            } else {
                CellValue::Float(v)
            }
        }),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        other => Some(CellValue::String(format!("{other:?}"))),
    };
    cell.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{BooleanArray, Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::Furnishing;

    const CSV: &str = "\
ads_id,location,property_type,furnished,monthly_rent,near ktm/lrt,completion_year
100,Kuala Lumpur - Cheras,Condominium,Fully Furnished,1800,True,2019
101,Selangor - Puchong,Apartment,Not Furnished,950,False,
102,Kuala Lumpur - Setapak,Apartment,Partially Furnished,,True,2010
";

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        tmp.write_all(contents.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn loads_csv_with_typed_columns() {
        let tmp = temp_file(".csv", CSV);
        let table = load_file(tmp.path()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.column_names.len(), 7);
        assert_eq!(table.column_names[5], "near ktm/lrt");
        assert_eq!(table.listings[0].furnished, Some(Furnishing::Fully));
        assert_eq!(table.listings[1].near_transit, Some(false));
        assert_eq!(table.listings[2].monthly_rent, None);
        assert_eq!(table.listings[1].cells[6], CellValue::Null);
    }

    #[test]
    fn loads_json_records() {
        let tmp = temp_file(
            ".json",
            r#"[
                {"location": "Cheras", "property_type": "Condominium", "furnished": "Fully Furnished",
                 "monthly_rent": 1800, "near ktm/lrt": true},
                {"location": "Puchong", "property_type": "Apartment", "furnished": "Not Furnished",
                 "monthly_rent": 950.5, "near ktm/lrt": false, "size": "800 sq.ft."}
            ]"#,
        );
        let table = load_file(tmp.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.listings[1].monthly_rent, Some(950.5));
        let size = table.column_index("size").unwrap();
        assert_eq!(table.listings[0].cells[size], CellValue::Null);
    }

    #[test]
    fn json_must_be_an_array() {
        let tmp = temp_file(".json", r#"{"location": "Cheras"}"#);
        assert!(matches!(load_file(tmp.path()), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn loads_parquet_columns() {
        let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let schema = Arc::new(Schema::new(vec![
            Field::new("location", DataType::Utf8, true),
            Field::new("property_type", DataType::Utf8, false),
            Field::new("furnished", DataType::Utf8, false),
            Field::new("monthly_rent", DataType::Float64, true),
            Field::new("near ktm/lrt", DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Cheras"), None])),
                Arc::new(StringArray::from(vec!["Condominium", "Apartment"])),
                Arc::new(StringArray::from(vec!["Fully Furnished", "Not Furnished"])),
                Arc::new(Float64Array::from(vec![Some(1800.0), None])),
                Arc::new(BooleanArray::from(vec![true, false])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(tmp.as_file(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(tmp.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.listings[0].monthly_rent, Some(1800.0));
        assert_eq!(table.listings[1].location, None);
        assert_eq!(table.listings[1].near_transit, Some(false));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/nonexistent/listings.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("listings.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn ragged_csv_is_malformed() {
        let tmp = temp_file(".csv", "location,property_type\nCheras,Condo,extra\n");
        assert!(matches!(load_file(tmp.path()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn source_reads_the_file_once() {
        let tmp = temp_file(".csv", CSV);
        let source = DatasetSource::new(tmp.path());
        let first = source.load().unwrap();

        std::fs::remove_file(tmp.path()).unwrap();
        let second = source.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unusable_cells_do_not_fail_the_load() {
        let tmp = temp_file(
            ".csv",
            "location,property_type,furnished,monthly_rent,near ktm/lrt\n\
             Cheras,Condominium,Unknown,N/A,Unknown\n\
             Puchong,Apartment,Not Furnished,950,yes\n",
        );
        let table = DatasetSource::new(tmp.path()).load().unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.listings[0].monthly_rent, None);
        assert_eq!(table.listings[0].near_transit, None);
        assert_eq!(table.listings[0].furnished, Some(Furnishing::Other("Unknown".into())));
        assert_eq!(table.listings[1].near_transit, Some(true));
    }

    #[test]
    fn failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.csv");
        let source = DatasetSource::new(&path);
        assert!(matches!(source.load(), Err(LoadError::Io { .. })));

        std::fs::write(&path, CSV).unwrap();
        assert_eq!(source.load().unwrap().len(), 3);
    }
}
