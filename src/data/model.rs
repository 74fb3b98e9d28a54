use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, mirroring the dtypes a dataframe parser infers.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Empty cell or an NA token.
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used by sum-style aggregations.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Grouping key; `None` for missing cells.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Null => write!(f, ""),
        }
    }
}

// ---------------------------------------------------------------------------
// Column type inference
// ---------------------------------------------------------------------------

/// Cell texts read as missing, matching a dataframe parser's default NA set.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_na(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// Narrowest kind that holds every non-missing cell of column `col`.
fn infer_kind(rows: &[Vec<String>], col: usize) -> ColumnKind {
    let mut kind = ColumnKind::Integer;
    for cell in rows.iter().filter_map(|r| r.get(col)) {
        if is_na(cell) {
            continue;
        }
        if kind == ColumnKind::Integer && cell.parse::<i64>().is_err() {
            kind = ColumnKind::Float;
        }
        if kind == ColumnKind::Float && cell.parse::<f64>().is_err() {
            return ColumnKind::Text;
        }
    }
    kind
}

fn convert(cell: String, kind: ColumnKind) -> Value {
    if is_na(&cell) {
        return Value::Null;
    }
    match kind {
        ColumnKind::Integer => cell.parse().map(Value::Integer).unwrap_or(Value::Text(cell)),
        ColumnKind::Float => cell.parse().map(Value::Float).unwrap_or(Value::Text(cell)),
        ColumnKind::Text => Value::Text(cell),
    }
}

// ---------------------------------------------------------------------------
// Table – a fully decoded delimited file
// ---------------------------------------------------------------------------

/// Row-oriented table with named columns. Only ever built from a complete
/// parse; there is no partially decoded state.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build from raw text cells, inferring a type per column.
    /// Every row must have exactly `columns.len()` cells.
    pub fn from_text_rows(columns: Vec<String>, raw_rows: Vec<Vec<String>>) -> Self {
        let kinds: Vec<ColumnKind> = (0..columns.len())
            .map(|c| infer_kind(&raw_rows, c))
            .collect();

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(kinds.iter())
                    .map(|(cell, kind)| convert(cell, *kind))
                    .collect()
            })
            .collect();

        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }
}
