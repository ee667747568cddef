//! Random entity selection.
//!
//! A [`RandomEntityQuery`] picks one uniformly random id from a table,
//! optionally through an ordered list of joins and a predicate tree of
//! equality comparisons:
//!
//! ```text
//! SELECT "employees"."employee_id"
//! FROM "employees"
//! INNER JOIN "employee_service_center"
//!     ON "employees"."employee_id" = "employee_service_center"."employee_id"
//! WHERE "employees"."employee_id" IS NOT NULL
//!   AND ("employee_service_center"."employee_role"::text = $1
//!    AND "employee_service_center"."service_center_id" = $2::int8)
//! ORDER BY RANDOM()
//! LIMIT 1
//! ```
//!
//! Identifiers are validated and quoted, values are always bound as
//! parameters. Text values compare through `::text` so enum-typed columns
//! can be filtered without naming their type; integers are bound as `int8`
//! so any integer column width matches. Rows whose picked id is NULL (the
//! unmatched side of a `RIGHT` join) are never returned.

use crate::catalog::SchemaCatalog;
use crate::error::SeedError;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::ToSql;
use tokio_postgres::GenericClient;
use tracing::debug;

/// Row ids of the seeded schema (`SERIAL` columns).
pub type EntityId = i32;

const MAX_IDENTIFIER_LEN: usize = 63;

/// Check that `ident` is a plain, unquoted-safe SQL identifier.
pub fn validate_identifier(ident: &str) -> Result<(), SeedError> {
    let mut chars = ident.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_start || !valid_rest || ident.len() > MAX_IDENTIFIER_LEN {
        return Err(SeedError::Configuration(format!(
            "invalid identifier '{ident}'"
        )));
    }
    Ok(())
}

fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

/// A column qualified by its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    fn validate(&self) -> Result<(), SeedError> {
        validate_identifier(&self.table)?;
        validate_identifier(&self.column)
    }

    fn to_sql(&self) -> String {
        format!("{}.{}", quote(&self.table), quote(&self.column))
    }
}

/// Parses `table.column`.
impl FromStr for ColumnRef {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((table, column)) if !column.contains('.') => {
                let column_ref = Self::new(table, column);
                column_ref.validate()?;
                Ok(column_ref)
            }
            _ => Err(SeedError::Configuration(format!(
                "expected a qualified column 'table.column', got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Supported join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
        }
    }
}

/// Case-insensitive; anything but inner/left/right is a Configuration error.
impl FromStr for JoinKind {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INNER" => Ok(Self::Inner),
            "LEFT" => Ok(Self::Left),
            "RIGHT" => Ok(Self::Right),
            _ => Err(SeedError::Configuration(format!(
                "unsupported join kind: {s}"
            ))),
        }
    }
}

/// One join step: `<kind> JOIN <table> ON <left> = <right>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

impl Join {
    pub fn new(
        kind: JoinKind,
        table: impl Into<String>,
        left: ColumnRef,
        right: ColumnRef,
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            left,
            right,
        }
    }

    pub fn inner(table: impl Into<String>, left: ColumnRef, right: ColumnRef) -> Self {
        Self::new(JoinKind::Inner, table, left, right)
    }

    pub fn left(table: impl Into<String>, left: ColumnRef, right: ColumnRef) -> Self {
        Self::new(JoinKind::Left, table, left, right)
    }

    pub fn right(table: impl Into<String>, left: ColumnRef, right: ColumnRef) -> Self {
        Self::new(JoinKind::Right, table, left, right)
    }

    /// Build a join from textual parts, e.g. read from a plan file.
    pub fn parse(kind: &str, table: &str, left: &str, right: &str) -> Result<Self, SeedError> {
        Ok(Self::new(
            kind.parse()?,
            table,
            left.parse()?,
            right.parse()?,
        ))
    }
}

/// Value bound on the right-hand side of an equality.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl SqlValue {
    fn as_param(&self) -> &(dyn ToSql + Sync) {
        match self {
            Self::Int(v) => v,
            Self::Text(v) => v,
            Self::Bool(v) => v,
        }
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Boolean filter over qualified columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(ColumnRef, SqlValue),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(column: ColumnRef, value: impl Into<SqlValue>) -> Self {
        Self::Equals(column, value.into())
    }

    /// Conjunction, flattening nested `And`s.
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Self::And(mut terms) => {
                terms.push(other);
                Self::And(terms)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Disjunction, flattening nested `Or`s.
    pub fn or(self, other: Predicate) -> Self {
        match self {
            Self::Or(mut terms) => {
                terms.push(other);
                Self::Or(terms)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    fn columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Self::Equals(column, _) => out.push(column),
            Self::And(terms) | Self::Or(terms) => {
                for term in terms {
                    term.columns(out);
                }
            }
            Self::Not(inner) => inner.columns(out),
        }
    }

    fn render(&self, params: &mut Vec<SqlValue>) -> Result<String, SeedError> {
        match self {
            Self::Equals(column, value) => {
                column.validate()?;
                params.push(value.clone());
                let n = params.len();
                Ok(match value {
                    SqlValue::Text(_) => format!("{}::text = ${n}", column.to_sql()),
                    SqlValue::Int(_) => format!("{} = ${n}::int8", column.to_sql()),
                    SqlValue::Bool(_) => format!("{} = ${n}::bool", column.to_sql()),
                })
            }
            Self::And(terms) => Self::render_terms(terms, " AND ", "AND", params),
            Self::Or(terms) => Self::render_terms(terms, " OR ", "OR", params),
            Self::Not(inner) => Ok(format!("NOT ({})", inner.render(params)?)),
        }
    }

    fn render_terms(
        terms: &[Predicate],
        separator: &str,
        name: &str,
        params: &mut Vec<SqlValue>,
    ) -> Result<String, SeedError> {
        if terms.is_empty() {
            return Err(SeedError::Configuration(format!(
                "malformed predicate: empty {name}"
            )));
        }
        let rendered = terms
            .iter()
            .map(|term| term.render(params))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("({})", rendered.join(separator)))
    }
}

/// SQL text and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl BuiltQuery {
    pub fn param_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(SqlValue::as_param).collect()
    }
}

/// Builder for a "one random id" query.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomEntityQuery {
    table: String,
    id_column: String,
    joins: Vec<Join>,
    filter: Option<Predicate>,
}

impl RandomEntityQuery {
    pub fn new(table: impl Into<String>, id_column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            id_column: id_column.into(),
            joins: Vec::new(),
            filter: None,
        }
    }

    /// Append a join; joins are applied in the order they are added.
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn joins(mut self, joins: impl IntoIterator<Item = Join>) -> Self {
        self.joins.extend(joins);
        self
    }

    /// Add a filter; a second call is AND-ed with the first.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Every table and column the query touches, as `(table, column)`;
    /// joined tables appear with an empty column.
    pub fn identifiers(&self) -> Vec<(String, String)> {
        let mut idents = vec![
            (self.table.clone(), String::new()),
            (self.table.clone(), self.id_column.clone()),
        ];
        for join in &self.joins {
            idents.push((join.table.clone(), String::new()));
            for side in [&join.left, &join.right] {
                idents.push((side.table.clone(), side.column.clone()));
            }
        }
        if let Some(filter) = &self.filter {
            let mut columns = Vec::new();
            filter.columns(&mut columns);
            idents.extend(
                columns
                    .into_iter()
                    .map(|c| (c.table.clone(), c.column.clone())),
            );
        }
        idents
    }

    /// Check every identifier against a loaded catalog.
    pub fn validate_against(&self, catalog: &SchemaCatalog) -> Result<(), SeedError> {
        for (table, column) in self.identifiers() {
            catalog.require(&table, &column)?;
        }
        Ok(())
    }

    /// Validate and render the query. Nothing is executed.
    pub fn build(&self) -> Result<BuiltQuery, SeedError> {
        validate_identifier(&self.table)?;
        validate_identifier(&self.id_column)?;

        let mut in_scope: Vec<&str> = vec![self.table.as_str()];
        let mut sql = format!(
            "SELECT {} FROM {}",
            ColumnRef::new(self.table.as_str(), self.id_column.as_str()).to_sql(),
            quote(&self.table)
        );

        for join in &self.joins {
            validate_identifier(&join.table)?;
            join.left.validate()?;
            join.right.validate()?;
            in_scope.push(&join.table);
            for side in [&join.left, &join.right] {
                if !in_scope.contains(&side.table.as_str()) {
                    return Err(SeedError::Configuration(format!(
                        "join condition references '{}' which is not joined yet",
                        side
                    )));
                }
            }
            sql.push_str(&format!(
                " {} {} ON {} = {}",
                join.kind.keyword(),
                quote(&join.table),
                join.left.to_sql(),
                join.right.to_sql()
            ));
        }

        let id = ColumnRef::new(self.table.as_str(), self.id_column.as_str());
        sql.push_str(&format!(" WHERE {} IS NOT NULL", id.to_sql()));

        let mut params = Vec::new();
        if let Some(filter) = &self.filter {
            let mut columns = Vec::new();
            filter.columns(&mut columns);
            if let Some(column) = columns
                .iter()
                .find(|c| !in_scope.contains(&c.table.as_str()))
            {
                return Err(SeedError::Configuration(format!(
                    "filter references '{column}' outside of the query's tables"
                )));
            }
            sql.push_str(" AND ");
            sql.push_str(&filter.render(&mut params)?);
        }

        sql.push_str(" ORDER BY RANDOM() LIMIT 1");
        Ok(BuiltQuery { sql, params })
    }

    /// Run the query and return the picked id.
    ///
    /// Zero matching rows is [`SeedError::NotFound`].
    pub async fn select<C>(&self, client: &C) -> Result<EntityId, SeedError>
    where
        C: GenericClient + Sync,
    {
        let query = self.build()?;
        debug!("Random id query: {} ({} params)", query.sql, query.params.len());

        let row = client.query_opt(query.sql.as_str(), &query.param_refs()).await?;
        match row {
            Some(row) => row
                .try_get::<_, Option<EntityId>>(0)?
                .ok_or_else(|| SeedError::not_found(self.table.as_str())),
            None => Err(SeedError::not_found(self.table.as_str())),
        }
    }
}
