//! The editor-facing notification target.

use crate::engine::TabularResult;

/// Receiver for the provider's asynchronous notifications.
///
/// The four channels are independent so the provider never blocks on slow
/// consumption of one channel while another is pending; each delivery is
/// fire-and-forget from the provider's perspective. All four methods are
/// required: a sink that wants to ignore a channel implements it as an
/// explicit no-op rather than being absent.
///
/// Implementations must not assume they are called on any particular
/// thread. A panicking sink is isolated at the call site and cannot corrupt
/// provider state.
pub trait UpdateSink: Send + Sync {
    /// A query evaluation produced a tabular result.
    fn on_query_result(&self, result: TabularResult);

    /// A schema refresh completed; `document` is the rendered summary.
    fn on_schema_summary(&self, document: String);

    /// Raw protocol result text, for diagnostic/trace display.
    fn on_raw_result(&self, protocol_text: String);

    /// A log message. `should_focus` asks the log surface to bring itself
    /// to the user's attention.
    fn on_log_message(&self, message: &str, should_focus: bool);
}
