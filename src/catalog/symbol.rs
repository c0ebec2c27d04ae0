//! Completion-candidate symbols.

use std::fmt;

/// What kind of thing a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Built-in function (e.g. `SUM`, `CALCULATE`).
    Function,
    /// Built-in language keyword (e.g. `EVALUATE`, `VAR`).
    Keyword,
    /// Model table.
    Table,
    /// Physical column of a table.
    Column,
    /// Calculated column of a table.
    CalcColumn,
    /// Measure defined on a table.
    Measure,
    /// Relationship between tables.
    Relationship,
}

impl SymbolKind {
    /// Human-readable label used by the schema renderer and tooltips.
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Function => "Function",
            SymbolKind::Keyword => "Keyword",
            SymbolKind::Table => "Table",
            SymbolKind::Column => "Column",
            SymbolKind::CalcColumn => "Calculated column",
            SymbolKind::Measure => "Measure",
            SymbolKind::Relationship => "Relationship",
        }
    }

    /// Whether this kind is produced by engine introspection rather than
    /// the static built-in catalogs.
    pub fn is_schema_kind(&self) -> bool {
        !matches!(self, SymbolKind::Function | SymbolKind::Keyword)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named, describable completion candidate.
///
/// Immutable once constructed. Built-ins are created at startup from the
/// static catalogs; schema-derived symbols are replaced wholesale on every
/// successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The name the prefix index stores and matches against.
    pub name: String,
    /// Text shown in the completion list (usually the name).
    pub display_text: String,
    /// Descriptive text shown in the completion tooltip.
    pub description: String,
    /// The symbol's kind.
    pub kind: SymbolKind,
    /// Owning table, for schema members.
    pub parent_table: Option<String>,
}

impl Symbol {
    /// Create a built-in symbol (function or keyword).
    pub fn builtin(name: impl Into<String>, description: impl Into<String>, kind: SymbolKind) -> Self {
        let name = name.into();
        Self {
            display_text: name.clone(),
            name,
            description: description.into(),
            kind,
            parent_table: None,
        }
    }

    /// Create a schema member belonging to `table`.
    pub fn member(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: SymbolKind,
        table: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            display_text: name.clone(),
            name,
            description: description.into(),
            kind,
            parent_table: Some(table.into()),
        }
    }

    /// Create a table symbol.
    pub fn table(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::builtin(name, description, SymbolKind::Table)
    }
}
