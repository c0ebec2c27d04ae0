//! The external-engine boundary.
//!
//! The provider talks to the analytical engine exclusively through the
//! [`Engine`] and [`EngineSession`] traits, so the concrete transport is
//! swappable: production uses the NDJSON [`bridge`] child process, tests
//! use an in-memory fake.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    SchemaProvider                        │
//! └─────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼ Engine::open / EngineSession::*
//! ┌─────────────────────────────────────────────────────────┐
//! │                     BridgeClient                         │
//! │              (NDJSON over stdin/stdout)                  │
//! └─────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │              Analytical (tabular) engine                 │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod bridge;
pub mod error;
pub mod protocol;

pub use bridge::{BridgeClient, BridgeEngine, BridgeSession};
pub use error::{EngineError, EngineResult};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;

/// Metadata for one model table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    /// Table name.
    pub name: String,
}

/// What kind of member the engine reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Physical column.
    Column,
    /// Calculated column.
    CalcColumn,
    /// Measure.
    Measure,
}

/// Metadata for one table member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberMeta {
    /// Member name as the engine reports it (e.g. `[Amount]`).
    pub name: String,
    /// Member kind.
    pub kind: MemberKind,
}

/// A tabular query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularResult {
    /// Result column names.
    pub columns: Vec<String>,
    /// Result data rows.
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Number of rows returned.
    pub row_count: i32,
}

/// A successful evaluation: the tabular result plus the raw protocol text
/// for diagnostic/trace display.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Parsed tabular result.
    pub table: TabularResult,
    /// Raw protocol result text.
    pub raw: String,
}

/// An open session against the analytical engine.
///
/// All member listings return members in the engine's native order; callers
/// that care about presentation order (the schema renderer does) must
/// preserve it.
#[async_trait]
pub trait EngineSession: Send + Sync {
    /// Enumerate the model's tables, in engine order.
    async fn list_tables(&self) -> EngineResult<Vec<TableMeta>>;

    /// Enumerate a table's physical columns, in engine order.
    async fn list_columns(&self, table: &str) -> EngineResult<Vec<MemberMeta>>;

    /// Enumerate a table's calculated columns, in engine order.
    async fn list_calc_columns(&self, table: &str) -> EngineResult<Vec<MemberMeta>>;

    /// Enumerate a table's measures, in engine order.
    async fn list_measures(&self, table: &str) -> EngineResult<Vec<MemberMeta>>;

    /// Evaluate an expression and return its tabular result.
    async fn evaluate(&self, expression: &str) -> EngineResult<Evaluation>;

    /// Release the session.
    async fn close(&self) -> EngineResult<()>;
}

/// Factory for engine sessions.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Open a session against the configured engine.
    async fn open(&self, config: &ConnectionConfig) -> EngineResult<Arc<dyn EngineSession>>;
}
