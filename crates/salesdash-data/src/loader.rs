//! CSV loader for the dashboard tables
//!
//! Loading happens once at startup and has no recovery path: every error
//! names the file it came from so the process can abort with a clear message.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{
    CitySales, ColumnType, DataBundle, FieldType, MonthlySales, NewCustomers, ProductSummary,
    Table,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} line {line}: key column '{column}' is empty", path.display())]
    EmptyKey {
        path: PathBuf,
        line: u64,
        column: String,
    },

    #[error("{} line {line}: '{value}' in column '{column}' is not a {expected}", path.display())]
    InvalidCell {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
        expected: ColumnType,
    },
}

impl LoadError {
    /// The file that caused the failure
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Open { path, .. }
            | LoadError::MissingColumn { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::EmptyKey { path, .. }
            | LoadError::InvalidCell { path, .. } => path,
        }
    }
}

/// Locations of the four input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    /// Directory the file names are resolved against
    pub directory: PathBuf,
    pub monthly_sales: String,
    pub product_summary: String,
    pub city_sales: String,
    pub new_customers_trend: String,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            monthly_sales: "monthly_sales.csv".to_string(),
            product_summary: "product_summary.csv".to_string(),
            city_sales: "city_sales.csv".to_string(),
            new_customers_trend: "new_customers_trend.csv".to_string(),
        }
    }
}

impl DataSources {
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn monthly_sales_path(&self) -> PathBuf {
        self.directory.join(&self.monthly_sales)
    }

    pub fn product_summary_path(&self) -> PathBuf {
        self.directory.join(&self.product_summary)
    }

    pub fn city_sales_path(&self) -> PathBuf {
        self.directory.join(&self.city_sales)
    }

    pub fn new_customers_trend_path(&self) -> PathBuf {
        self.directory.join(&self.new_customers_trend)
    }
}

impl DataBundle {
    /// Read all four tables. The first failing file aborts the load.
    pub fn load(sources: &DataSources) -> Result<Self, LoadError> {
        let monthly_sales = load_table::<MonthlySales>(&sources.monthly_sales_path())?;
        let product_summary = load_table::<ProductSummary>(&sources.product_summary_path())?;
        let city_sales = load_table::<CitySales>(&sources.city_sales_path())?;
        let new_customers = load_table::<NewCustomers>(&sources.new_customers_trend_path())?;

        Ok(DataBundle::from_tables(
            monthly_sales,
            product_summary,
            city_sales,
            new_customers,
        ))
    }
}

/// Read one delimited file into typed rows, checking the header against the
/// table schema first. Extra columns are ignored.
pub fn load_table<T: Table>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let parse_err = |source: csv::Error| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(parse_err)?.clone();
    let schema = T::schema();

    let columns = schema
        .fields
        .iter()
        .map(|field| {
            headers
                .iter()
                .position(|h| h == field.name)
                .map(|idx| (idx, field))
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: field.name.to_string(),
                })
        })
        .collect::<Result<Vec<(usize, &FieldType)>, _>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        for (idx, field) in &columns {
            let value = record.get(*idx).unwrap_or_default();
            if field.key && value.is_empty() {
                return Err(LoadError::EmptyKey {
                    path: path.to_path_buf(),
                    line,
                    column: field.name.to_string(),
                });
            }
            if !field.column_type.accepts(value) {
                return Err(LoadError::InvalidCell {
                    path: path.to_path_buf(),
                    line,
                    column: field.name.to_string(),
                    value: value.to_string(),
                    expected: field.column_type,
                });
            }
        }

        rows.push(record.deserialize::<T>(Some(&headers)).map_err(parse_err)?);
    }

    tracing::debug!(
        table = T::NAME,
        path = %path.display(),
        rows = rows.len(),
        "Loaded table"
    );

    Ok(rows)
}
