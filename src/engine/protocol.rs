//! Protocol types for bridge communication.
//!
//! The bridge is a child process that speaks NDJSON (newline-delimited
//! JSON) over stdin/stdout and translates these requests into the
//! analytical engine's native protocol. Each request carries a unique ID
//! for correlation with its response, which is what allows concurrent
//! requests over one bridge.

use serde::{Deserialize, Serialize};

use super::{MemberMeta, TableMeta, TabularResult};

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the bridge.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation.
    pub id: String,
    /// Method name (e.g., "schema.list_tables").
    pub method: String,
    /// Method-specific parameters.
    pub params: serde_json::Value,
}

/// Response envelope received from the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to.
    pub id: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result data (present if success = true).
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Error information (present if success = false).
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// Error information in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// ============================================================================
// Request Parameters
// ============================================================================

/// Parameters for `session.open`.
#[derive(Debug, Clone, Serialize)]
pub struct OpenParams {
    /// Engine server address.
    pub server: String,
    /// Model database to introspect.
    pub database: String,
}

/// Parameters for methods that only need a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionParams {
    /// Session handle returned by `session.open`.
    pub session_id: String,
}

/// Parameters for the per-table member listings.
#[derive(Debug, Clone, Serialize)]
pub struct ListMembersParams {
    /// Session handle returned by `session.open`.
    pub session_id: String,
    /// Table whose members are listed.
    pub table: String,
}

/// Parameters for `query.evaluate`.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateParams {
    /// Session handle returned by `session.open`.
    pub session_id: String,
    /// Expression text to evaluate.
    pub expression: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Response for `session.open`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenResponse {
    /// Session handle for subsequent requests.
    pub session_id: String,
}

/// Response for `schema.list_tables`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListTablesResponse {
    /// Tables in the model, in the engine's native order.
    pub tables: Vec<TableMeta>,
}

/// Response for the per-table member listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ListMembersResponse {
    /// Members in the engine's native order.
    pub members: Vec<MemberMeta>,
}

/// Response for `query.evaluate`.
pub type EvaluateResponse = TabularResult;

/// Response for `session.close`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseResponse {}

// ============================================================================
// Method Names
// ============================================================================

/// Bridge method names.
pub mod methods {
    pub const SESSION_OPEN: &str = "session.open";
    pub const SESSION_CLOSE: &str = "session.close";
    pub const LIST_TABLES: &str = "schema.list_tables";
    pub const LIST_COLUMNS: &str = "schema.list_columns";
    pub const LIST_CALC_COLUMNS: &str = "schema.list_calc_columns";
    pub const LIST_MEASURES: &str = "schema.list_measures";
    pub const EVALUATE: &str = "query.evaluate";
}
