use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use foundation::ids::RecordIndex;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::coerce::{to_label, to_number};

/// Field that carries a record's identity in the input rows.
pub const INDEX_FIELD: &str = "index";

/// One immutable dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    index: RecordIndex,
    fields: Map<String, Value>,
}

impl Record {
    /// Builds a record; the `index` field is overwritten with `index`.
    pub fn new(index: RecordIndex, mut fields: Map<String, Value>) -> Self {
        fields.insert(INDEX_FIELD.to_string(), Value::from(index.get()));
        Self { index, fields }
    }

    pub fn index(&self) -> RecordIndex {
        self.index
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.fields.get(attr)
    }

    /// `+record[attr]`; a missing attribute is NaN.
    pub fn number(&self, attr: &str) -> f64 {
        self.get(attr).map(to_number).unwrap_or(f64::NAN)
    }

    pub fn label(&self, attr: &str) -> String {
        to_label(self.get(attr))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

#[derive(Debug)]
pub enum DatasetError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    NotARecordList,
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io { path, source } => {
                write!(f, "failed to read dataset {}: {source}", path.display())
            }
            DatasetError::Parse(err) => write!(f, "dataset parse error: {err}"),
            DatasetError::NotARecordList => write!(
                f,
                "expected a JSON array of records or an object with a \"records\" array"
            ),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io { source, .. } => Some(source),
            DatasetError::Parse(err) => Some(err),
            DatasetError::NotARecordList => None,
        }
    }
}

/// A full delivery of records.
///
/// Records are shared (`Rc`) so that views can hand the exact row to
/// interaction callbacks without copying it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Rc<Record>>,
    content_hash: String,
}

impl Dataset {
    /// Ingests rows, assigning each record its identity.
    ///
    /// A row's explicit non-negative integer `index` is kept; otherwise the
    /// row position is used. Duplicate indices are logged, not rejected.
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut hasher = blake3::Hasher::new();
        let mut seen = BTreeSet::new();
        let mut records = Vec::with_capacity(rows.len());

        for (position, row) in rows.into_iter().enumerate() {
            if let Ok(bytes) = serde_json::to_vec(&row) {
                hasher.update(&bytes);
            }
            let index = explicit_index(&row).unwrap_or(RecordIndex(position as u32));
            if !seen.insert(index) {
                warn!(%index, position, "duplicate record index; later row wins");
            }
            records.push(Rc::new(Record::new(index, row)));
        }

        Self {
            records,
            content_hash: hasher.finalize().to_hex().to_string(),
        }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(payload).map_err(DatasetError::Parse)?;
        Self::from_json_value(value)
    }

    /// Accepts `[ {...}, ... ]`, `{ "records": [...] }` or `{ "data": [...] }`.
    /// Rows that are not objects are skipped.
    pub fn from_json_value(value: Value) -> Result<Self, DatasetError> {
        let rows = match value {
            Value::Array(rows) => rows,
            Value::Object(mut obj) => match obj.remove("records").or_else(|| obj.remove("data")) {
                Some(Value::Array(rows)) => rows,
                _ => return Err(DatasetError::NotARecordList),
            },
            _ => return Err(DatasetError::NotARecordList),
        };

        let mut objects = Vec::with_capacity(rows.len());
        for (position, row) in rows.into_iter().enumerate() {
            match row {
                Value::Object(map) => objects.push(map),
                other => warn!(position, kind = %json_kind(&other), "skipping non-object row"),
            }
        }
        Ok(Self::from_rows(objects))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&payload)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            hash = %dataset.short_hash(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[Rc<Record>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Last record with `index` (later duplicates win).
    pub fn get(&self, index: RecordIndex) -> Option<&Rc<Record>> {
        self.records.iter().rev().find(|r| r.index() == index)
    }

    /// blake3 over the canonical JSON of every row, in order.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn short_hash(&self) -> &str {
        self.content_hash.get(..12).unwrap_or(&self.content_hash)
    }

    /// Whether `other` is a byte-identical re-delivery of this dataset.
    pub fn same_content(&self, other: &Dataset) -> bool {
        self.content_hash == other.content_hash
    }
}

fn explicit_index(row: &Map<String, Value>) -> Option<RecordIndex> {
    let v = to_number(row.get(INDEX_FIELD)?);
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Some(RecordIndex(v as u32))
    } else {
        None
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, DatasetError};
    use foundation::ids::RecordIndex;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"index": 1, "state": "A", "population": 10, "crime": 5},
        {"index": 2, "state": "A", "population": 20, "crime": 50},
        {"index": 3, "state": "B", "population": 5, "crime": 25}
    ]"#;

    #[test]
    fn keeps_explicit_indices() {
        let ds = Dataset::from_json_str(SAMPLE).expect("parse");
        let ids: Vec<u32> = ds.records().iter().map(|r| r.index().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ds.get(RecordIndex(2)).map(|r| r.number("population")), Some(20.0));
        assert_eq!(ds.records()[2].label("state"), "B");
    }

    #[test]
    fn assigns_positional_indices_when_missing() {
        let ds = Dataset::from_json_str(r#"{"records": [{"a": 1}, {"a": "x"}, {"index": -1}]}"#)
            .expect("parse");
        let ids: Vec<u32> = ds.records().iter().map(|r| r.index().get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(
            ds.records()[1].get("index").and_then(|v| v.as_u64()),
            Some(1)
        );
        assert!(ds.records()[1].number("a").is_nan());
        assert!(ds.records()[0].number("missing").is_nan());
    }

    #[test]
    fn skips_non_object_rows() {
        let ds = Dataset::from_json_str(r#"[{"a": 1}, 5, "x", {"a": 2}]"#).expect("parse");
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn duplicate_indices_resolve_to_the_later_row() {
        let ds = Dataset::from_json_str(r#"[{"index": 4, "v": 1}, {"index": 4, "v": 2}]"#)
            .expect("parse");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(RecordIndex(4)).map(|r| r.number("v")), Some(2.0));
    }

    #[test]
    fn rejects_non_list_payloads() {
        assert!(matches!(
            Dataset::from_json_str(r#"{"rows": []}"#),
            Err(DatasetError::NotARecordList)
        ));
        assert!(matches!(
            Dataset::from_json_str("not json"),
            Err(DatasetError::Parse(_))
        ));
    }

    #[test]
    fn content_hash_detects_redelivery() {
        let a = Dataset::from_json_str(SAMPLE).expect("parse");
        let b = Dataset::from_json_str(SAMPLE).expect("parse");
        let c = Dataset::from_json_str(r#"[{"index": 1}]"#).expect("parse");
        assert!(a.same_content(&b));
        assert!(!a.same_content(&c));
        assert_eq!(a.short_hash().len(), 12);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(SAMPLE.as_bytes()).expect("write");
        let ds = Dataset::load(file.path()).expect("load");
        assert_eq!(ds.len(), 3);

        let missing = Dataset::load("/definitely/not/here.json");
        assert!(matches!(missing, Err(DatasetError::Io { .. })));
    }
}
