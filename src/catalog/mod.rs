//! The unified completion-candidate catalog.
//!
//! A [`SymbolCatalog`] holds every candidate the editor can complete:
//! static built-in functions and keywords, plus the schema members
//! (tables, columns, calculated columns, measures) discovered by the last
//! successful introspection.
//!
//! Catalogs are immutable. The provider builds a fresh catalog on each
//! refresh and swaps it in as part of a new [`crate::index::Generation`];
//! readers keep whatever catalog they were handed until they finish. The
//! table view preserves the order the engine returned members in; the
//! schema renderer must not re-sort it.

pub mod builtins;
mod symbol;

pub use symbol::{Symbol, SymbolKind};

use std::collections::HashMap;

/// One table's schema members, in engine order.
///
/// Columns and calculated columns come first, then measures, each group in
/// the order the engine enumerated them.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Ordered member symbols.
    pub members: Vec<Symbol>,
}

/// Uniqueness scope for a symbol: kind + owning table + name.
///
/// A column and a measure may share a display name, and two tables may each
/// have a member of the same name; neither collides here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SymbolKey {
    kind: SymbolKind,
    parent_table: Option<String>,
    name: String,
}

impl SymbolKey {
    fn of(symbol: &Symbol) -> Self {
        Self {
            kind: symbol.kind,
            parent_table: symbol.parent_table.clone(),
            name: symbol.name.clone(),
        }
    }
}

/// The full candidate set for one catalog generation.
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    by_key: HashMap<SymbolKey, Symbol>,
    tables: Vec<TableSchema>,
}

impl SymbolCatalog {
    /// Catalog holding only the static built-ins (the pre-connection and
    /// post-disconnect state).
    pub fn with_builtins() -> Self {
        let mut catalog = Self::default();
        for symbol in builtins::builtin_symbols() {
            catalog.insert(symbol);
        }
        catalog
    }

    /// Catalog holding the built-ins plus the given schema, preserving the
    /// engine's member order.
    ///
    /// Each table also contributes a [`SymbolKind::Table`] symbol so table
    /// names complete alongside their members.
    pub fn with_schema(tables: Vec<TableSchema>) -> Self {
        let mut catalog = Self::with_builtins();
        for table in &tables {
            catalog.insert(Symbol::table(
                table.name.clone(),
                format!("Table with {} members", table.members.len()),
            ));
            for member in &table.members {
                catalog.insert(member.clone());
            }
        }
        catalog.tables = tables;
        catalog
    }

    fn insert(&mut self, symbol: Symbol) {
        self.by_key.insert(SymbolKey::of(&symbol), symbol);
    }

    /// Look up a symbol by its uniqueness scope.
    pub fn lookup(&self, kind: SymbolKind, parent_table: Option<&str>, name: &str) -> Option<&Symbol> {
        let key = SymbolKey {
            kind,
            parent_table: parent_table.map(str::to_string),
            name: name.to_string(),
        };
        self.by_key.get(&key)
    }

    /// All symbols, in unspecified order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.by_key.values()
    }

    /// The schema tables, in engine order, each with its ordered members.
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// A specific table's schema, if present.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Total number of symbols.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the catalog holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Whether any schema-derived symbols are present.
    pub fn has_schema(&self) -> bool {
        !self.tables.is_empty()
    }
}
