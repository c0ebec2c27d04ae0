//! # Tabula
//!
//! Language-intelligence backend for editors that author tabular-model
//! query expressions against an external analytical engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Editor surface                      │
//! │   (completion list, schema pane, error list, run-query)  │
//! └─────────────────────────────────────────────────────────┘
//!        │ keystroke                │ connect / evaluate
//!        ▼                          ▼
//! ┌──────────────────┐     ┌────────────────────────────────┐
//! │   PrefixIndex    │     │         SchemaProvider         │
//! │ (per generation) │◄────│ introspection → new Generation │
//! └──────────────────┘     │  → snapshot swap → sink notify │
//!        ▲                 └────────────────────────────────┘
//!        │                          │
//! ┌──────────────────┐              ▼
//! │  SymbolCatalog   │     ┌────────────────────────────────┐
//! │ (built-ins +     │     │          Engine bridge         │
//! │  schema members) │     │   (NDJSON over stdin/stdout)   │
//! └──────────────────┘     └────────────────────────────────┘
//! ```
//!
//! The parser/validator feeds [`diagnostics::DiagnosticSet`]; the editor
//! reads it wholesale after each pass. Completion queries go through the
//! current [`index::Generation`]'s prefix index, which is sealed after
//! construction and therefore safe for unlocked concurrent reads.

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod index;
pub mod provider;

pub use catalog::{Symbol, SymbolCatalog, SymbolKind, TableSchema};
pub use diagnostics::{Diagnostic, DiagnosticSet};
pub use index::{Generation, IndexError, PrefixIndex};
pub use provider::{
    ConnectionState, ProviderError, RefreshHandle, RefreshOutcome, SchemaProvider, UpdateSink,
};
