//! Entity kinds: the typed key for "fetch every stored row of this type".

use serde::de::DeserializeOwned;
use service_core::error::AppError;
use std::fmt;

/// Postgres truncates identifiers longer than this.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Static descriptor of where a persistent type lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKind {
    name: &'static str,
    schema: Option<&'static str>,
    table: &'static str,
}

impl EntityKind {
    pub const fn new(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            schema: None,
            table,
        }
    }

    pub const fn in_schema(self, schema: &'static str) -> Self {
        Self {
            schema: Some(schema),
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn schema(&self) -> Option<&'static str> {
        self.schema
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Validated, double-quoted table reference, e.g. `"app"."greetings"`.
    pub fn qualified_table(&self) -> Result<String, AppError> {
        let table = quote_identifier(self.table)?;
        match self.schema {
            Some(schema) => Ok(format!("{}.{}", quote_identifier(schema)?, table)),
            None => Ok(table),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A Rust type stored as rows of exactly one [`EntityKind`].
pub trait Entity: DeserializeOwned + Send + 'static {
    const KIND: EntityKind;
}

fn quote_identifier(ident: &str) -> Result<String, AppError> {
    let mut chars = ident.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || ident.len() > MAX_IDENTIFIER_LEN {
        return Err(AppError::InternalError(anyhow::anyhow!(
            "Invalid SQL identifier: {:?}",
            ident
        )));
    }

    Ok(format!("\"{}\"", ident))
}
