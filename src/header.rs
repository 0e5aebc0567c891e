//! Header resolution and column-to-field binding.
//!
//! Resolves the raw header line into canonical column names (trimmed,
//! lowercased, alias-substituted) and binds each name to a field capability
//! on the target record shape. The binding is built once per parse call and
//! reused for every data row.

use std::collections::HashMap;

use tracing::info;

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::record::{FieldSpec, Record};
use crate::tokenize::split_line;

/// One resolved header column: the canonical name and, when a record field
/// matches it, the field capability to assign through.
#[derive(Debug)]
pub struct BoundColumn<T: 'static> {
    /// Canonical name after normalization and alias substitution.
    pub name: String,

    /// Matching field on the record shape, or `None` for an unbound slot.
    /// Unbound slots are not an error here; that policy belongs to the
    /// record mapper.
    pub field: Option<&'static FieldSpec<T>>,
}

/// Ordered column-to-field binding derived from the header line.
#[derive(Debug)]
pub struct HeaderBinding<T: 'static> {
    columns: Vec<BoundColumn<T>>,
}

impl<T: Record> HeaderBinding<T> {
    /// Resolve the header line against the configuration and record shape.
    ///
    /// Header names match case-insensitively: each token is trimmed and
    /// lowercased before the alias lookup, and alias keys are normalized
    /// the same way. Canonical names then bind to `T::fields()` entries by
    /// exact, case-sensitive match.
    pub fn resolve(header_line: &str, config: &ParserConfig<T>) -> Result<Self> {
        if header_line.is_empty() {
            return Err(ParseError::EmptyHeader);
        }

        let aliases: HashMap<String, &str> = config
            .header_aliases()
            .iter()
            .map(|(key, value)| (key.trim().to_lowercase(), value.as_str()))
            .collect();

        let columns: Vec<BoundColumn<T>> = split_line(header_line, config.delimiter())?
            .into_iter()
            .map(|token| {
                let normalized = token.trim().to_lowercase();
                let canonical = match aliases.get(&normalized) {
                    Some(field_name) => field_name.to_string(),
                    None => normalized,
                };
                let field = T::fields().iter().find(|spec| spec.name == canonical);
                BoundColumn {
                    name: canonical,
                    field,
                }
            })
            .collect();

        info!(
            "resolved header columns: {:?}",
            columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
        info!("configured header mapping: {:?}", config.header_aliases());

        Ok(Self { columns })
    }
}

impl<T> HeaderBinding<T> {
    /// Number of columns the header declared; every data row must match it.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[BoundColumn<T>] {
        &self.columns
    }
}
