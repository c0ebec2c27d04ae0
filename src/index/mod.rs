//! Prefix search over the symbol catalog.
//!
//! The editor queries [`PrefixIndex::search_by_prefix`] on every keystroke
//! inside an identifier-like token, so reads must be sublinear and
//! lock-free. The index is a ternary search tree built once per catalog
//! [`Generation`] and sealed before the first query; after sealing it never
//! mutates, which is what makes unlocked concurrent reads safe.

mod generation;
mod tst;

pub use generation::Generation;
pub use tst::{IndexError, PrefixIndex, PrefixMatches};
