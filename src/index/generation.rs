//! Catalog generations: one immutable symbol set paired with at most one
//! prefix index, built lazily and exactly once.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::tst::PrefixIndex;
use crate::catalog::SymbolCatalog;

/// One immutable version of the full symbol set.
///
/// The index build is proportional to catalog size, so it runs at most once
/// per generation: the first caller of [`index`](Self::index) performs the
/// build while concurrent callers block on the same cell and share the
/// result. Generations are handed out as `Arc<Generation>`; a reader that
/// pinned one keeps a consistent catalog/index pair for the duration of its
/// operation regardless of provider refreshes.
#[derive(Debug)]
pub struct Generation {
    catalog: SymbolCatalog,
    index: OnceCell<Arc<PrefixIndex>>,
}

impl Generation {
    /// Wrap a freshly built catalog.
    pub fn new(catalog: SymbolCatalog) -> Self {
        Self {
            catalog,
            index: OnceCell::new(),
        }
    }

    /// The generation holding only the static built-ins.
    pub fn builtins_only() -> Self {
        Self::new(SymbolCatalog::with_builtins())
    }

    /// The catalog backing this generation.
    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    /// The prefix index for this generation, building it on first use.
    pub fn index(&self) -> Arc<PrefixIndex> {
        Arc::clone(self.index.get_or_init(|| Arc::new(build_index(&self.catalog))))
    }
}

fn build_index(catalog: &SymbolCatalog) -> PrefixIndex {
    let mut index = PrefixIndex::new();
    for symbol in catalog.symbols() {
        index
            .insert(&symbol.name, symbol.clone())
            .expect("unsealed index accepts inserts");
    }
    index.prepare_for_search();
    index
}
