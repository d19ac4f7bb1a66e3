use super::value::Value;
use std::io::Read;

/// Selects the value column of a provider table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Exact column name (e.g. `NDVI`)
    Exact(String),
    /// First column whose name starts with the prefix (e.g. `Value` for `Value_mm`)
    Prefix(String),
}

impl ColumnSelector {
    pub fn exact(name: impl Into<String>) -> Self {
        ColumnSelector::Exact(name.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        ColumnSelector::Prefix(prefix.into())
    }

    pub fn matches(&self, column: &str) -> bool {
        match self {
            ColumnSelector::Exact(name) => column == name,
            ColumnSelector::Prefix(prefix) => column.starts_with(prefix.as_str()),
        }
    }
}

impl std::fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnSelector::Exact(name) => write!(f, "'{}'", name),
            ColumnSelector::Prefix(prefix) => write!(f, "starting with '{}'", prefix),
        }
    }
}

/// Row-oriented table with named columns, as returned by the data provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Decode CSV with a header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut table = Self::new(columns);

        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(Value::parse_cell).collect())?;
        }

        Ok(table)
    }

    pub fn from_csv_str(data: &str) -> Result<Self, TableError> {
        Self::from_csv_reader(data.as_bytes())
    }

    /// Append a row. Short rows are padded with nulls, long rows are rejected.
    pub fn push_row(&mut self, mut row: Vec<Value>) -> Result<(), TableError> {
        if row.len() > self.columns.len() {
            return Err(TableError::RowTooLong {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
        Ok(())
    }

    /// Encode the table as UTF-8 CSV with a header row and no index column
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|e| TableError::Io(e.into_error()))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of the first column matching the selector
    pub fn find_column(&self, selector: &ColumnSelector) -> Option<usize> {
        self.columns.iter().position(|c| selector.matches(c))
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Keep the rows whose mask entry is true, in their original order
    pub fn retain_rows(&mut self, mask: &[bool]) {
        debug_assert_eq!(mask.len(), self.rows.len());
        let mut keep = mask.iter().copied();
        self.rows.retain(|_| keep.next().unwrap_or(false));
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row {row} has {found} fields, header has {expected}")]
    RowTooLong {
        row: usize,
        expected: usize,
        found: usize,
    },
}
