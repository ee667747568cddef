//! Known tables and columns, loaded from `information_schema`.
//!
//! The catalog gates identifiers that reach a dynamically built query. It is
//! not consulted implicitly; callers decide where to check.

use crate::error::SeedError;
use std::collections::{BTreeSet, HashMap};
use tokio_postgres::GenericClient;
use tracing::debug;

/// Base tables of one schema with their column names.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    tables: HashMap<String, BTreeSet<String>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(table, columns)` pairs.
    pub fn from_tables<I, T, C>(tables: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let tables = tables
            .into_iter()
            .map(|(table, columns)| (table.into(), columns.into_iter().map(Into::into).collect()))
            .collect();
        Self { tables }
    }

    /// Load the base tables of `schema` and their columns.
    ///
    /// Replaces whatever was loaded before, so calling it again is harmless.
    pub async fn initialize<C>(&mut self, client: &C, schema: &str) -> Result<(), SeedError>
    where
        C: GenericClient + Sync,
    {
        let table_rows = client
            .query(
                "SELECT table_name::text
                 FROM information_schema.tables
                 WHERE table_schema = $1
                   AND table_type = 'BASE TABLE'",
                &[&schema],
            )
            .await?;

        let mut tables: HashMap<String, BTreeSet<String>> = table_rows
            .iter()
            .map(|row| (row.get::<_, String>(0), BTreeSet::new()))
            .collect();

        let column_rows = client
            .query(
                "SELECT table_name::text, column_name::text
                 FROM information_schema.columns
                 WHERE table_schema = $1",
                &[&schema],
            )
            .await?;

        for row in &column_rows {
            let table: String = row.get(0);
            // Views also show up in information_schema.columns
            if let Some(columns) = tables.get_mut(&table) {
                columns.insert(row.get(1));
            }
        }

        debug!(
            "Loaded {} tables from schema '{}'",
            tables.len(),
            schema
        );
        self.tables = tables;
        Ok(())
    }

    /// Load a fresh catalog.
    pub async fn load<C>(client: &C, schema: &str) -> Result<Self, SeedError>
    where
        C: GenericClient + Sync,
    {
        let mut catalog = Self::new();
        catalog.initialize(client, schema).await?;
        Ok(catalog)
    }

    /// `false` for an unknown table; `true` for a known table when `column`
    /// is empty; otherwise whether `column` belongs to `table`.
    pub fn is_valid(&self, table: &str, column: &str) -> bool {
        match self.tables.get(table) {
            None => false,
            Some(_) if column.is_empty() => true,
            Some(columns) => columns.contains(column),
        }
    }

    /// Fail with a Configuration error unless `is_valid(table, column)`.
    pub fn require(&self, table: &str, column: &str) -> Result<(), SeedError> {
        if self.is_valid(table, column) {
            return Ok(());
        }
        let what = if column.is_empty() {
            format!("table '{table}'")
        } else {
            format!("column '{table}.{column}'")
        };
        Err(SeedError::Configuration(format!("unknown {what}")))
    }

    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
