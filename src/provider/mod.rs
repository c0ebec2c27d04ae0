//! The schema provider: connection lifecycle, background introspection,
//! and notification fan-out.
//!
//! One [`SchemaProvider`] owns the connection to the analytical engine and
//! the current catalog [`Generation`]. Introspection runs on a background
//! task; the caller thread never blocks on engine I/O. Completion is an
//! explicit signal: [`connect`](SchemaProvider::connect) returns a
//! [`RefreshHandle`] the caller can await with a bounded timeout.
//!
//! # State machine
//!
//! ```text
//! Disconnected → Connecting → Connected → (Refreshing → Connected)*
//!                    │             │            │
//!                    └──→ Faulted ←┼────────────┘
//!                                  ▼
//!                           Disconnecting → Disconnected
//! ```
//!
//! `Faulted` is reached from `Connecting`/`Refreshing` on engine failure
//! and accepts only `disconnect` or a fresh `connect`.
//!
//! # Snapshot policy
//!
//! The catalog/index pair is a single atomically swapped `Arc<Generation>`.
//! Readers call [`snapshot`](SchemaProvider::snapshot) once and keep the
//! returned generation for the duration of their operation; a refresh or
//! disconnect swaps the pointer but never invalidates a generation a reader
//! still holds. The swap is the only code under the snapshot lock, and the
//! state field has its own lock taken only for transitions; neither lock
//! is ever held across I/O.

mod render;
mod sink;

pub use render::render_schema_summary;
pub use sink::UpdateSink;

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use crate::catalog::{Symbol, SymbolCatalog, SymbolKind, TableSchema};
use crate::config::ConnectionConfig;
use crate::engine::{Engine, EngineError, EngineSession, MemberKind, MemberMeta};
use crate::index::Generation;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Refreshing,
    Disconnecting,
    Faulted,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Refreshing => "refreshing",
            ConnectionState::Disconnecting => "disconnecting",
            ConnectionState::Faulted => "faulted",
        };
        f.write_str(name)
    }
}

/// Caller-misuse errors. Never retried, never silently ignored.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The operation is not valid in the provider's current state
    /// (double-connect, evaluate while disconnected, and similar).
    #[error("invalid provider state: {operation} requires {expected}, but the provider is {actual}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// States the operation accepts.
        expected: &'static str,
        /// The state the provider was actually in.
        actual: ConnectionState,
    },
}

/// How a refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Introspection succeeded and the new generation was published.
    Completed,
    /// Introspection failed; the provider is `Faulted` and the previous
    /// generation is untouched.
    Failed,
    /// A disconnect cancelled the refresh before it published.
    Cancelled,
}

/// The refresh did not settle within the allowed time.
#[derive(Debug, Error)]
#[error("refresh did not settle within {0:?}")]
pub struct RefreshTimeout(pub Duration);

/// Completion signal for one background introspection.
#[derive(Debug)]
pub struct RefreshHandle {
    rx: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshHandle {
    /// Await the refresh outcome, bounded by `timeout`.
    pub async fn settled(self, timeout: Duration) -> Result<RefreshOutcome, RefreshTimeout> {
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            // Sender dropped without reporting: the task died. Count it as
            // a failure rather than hanging the caller.
            Ok(Err(_)) => Ok(RefreshOutcome::Failed),
            Err(_) => Err(RefreshTimeout(timeout)),
        }
    }
}

/// Internal refresh failure modes.
enum RefreshError {
    Cancelled,
    Engine(EngineError),
}

impl From<EngineError> for RefreshError {
    fn from(err: EngineError) -> Self {
        RefreshError::Engine(err)
    }
}

/// Poison-tolerant lock helper: the data a panicking holder left behind is
/// still structurally valid (every critical section is a plain store).
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the engine connection, the current catalog generation, and the
/// notification sink.
pub struct SchemaProvider {
    engine: Arc<dyn Engine>,
    state: Mutex<ConnectionState>,
    snapshot: Mutex<Arc<Generation>>,
    session: Mutex<Option<Arc<dyn EngineSession>>>,
    sink: Mutex<Option<Arc<dyn UpdateSink>>>,
    /// Bumped by disconnect; a refresh that captured an older epoch is
    /// stale and must not publish.
    epoch: AtomicU64,
    /// Serializes the publish step (snapshot swap + summary notification),
    /// not the compute step.
    publish_lock: tokio::sync::Mutex<()>,
}

impl SchemaProvider {
    /// Create a disconnected provider over the given engine.
    ///
    /// The initial generation holds only the static built-ins, so
    /// completion works before the first connect.
    pub fn new(engine: Arc<dyn Engine>) -> Arc<Self> {
        Arc::new(Self {
            engine,
            state: Mutex::new(ConnectionState::Disconnected),
            snapshot: Mutex::new(Arc::new(Generation::builtins_only())),
            session: Mutex::new(None),
            sink: Mutex::new(None),
            epoch: AtomicU64::new(0),
            publish_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// The provider's current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *lock(&self.state)
    }

    /// Pin the current catalog generation.
    ///
    /// The returned generation stays valid (and internally consistent) for
    /// as long as the caller holds it, regardless of later refreshes.
    pub fn snapshot(&self) -> Arc<Generation> {
        Arc::clone(&lock(&self.snapshot))
    }

    /// Register the notification sink. At most one sink is active;
    /// re-registering replaces the previous one.
    pub fn set_update_sink(&self, sink: Arc<dyn UpdateSink>) {
        *lock(&self.sink) = Some(sink);
    }

    fn sink(&self) -> Option<Arc<dyn UpdateSink>> {
        lock(&self.sink).clone()
    }

    /// Fire-and-forget sink dispatch with panic isolation.
    fn notify<F>(&self, deliver: F)
    where
        F: FnOnce(&dyn UpdateSink),
    {
        if let Some(sink) = self.sink() {
            if catch_unwind(AssertUnwindSafe(|| deliver(sink.as_ref()))).is_err() {
                eprintln!("provider: sink panicked during notification");
            }
        }
    }

    /// Connect to the engine and start a background introspection.
    ///
    /// Valid in `Disconnected` or `Faulted`; anything else is a caller bug
    /// and fails fast with [`ProviderError::InvalidState`]. Calls are
    /// never queued, so at most one introspection task is in flight.
    pub fn connect(
        self: &Arc<Self>,
        config: ConnectionConfig,
    ) -> Result<RefreshHandle, ProviderError> {
        // The epoch is captured inside the transition critical section so a
        // disconnect issued any time after this connect is observed by the
        // refresh's cancellation checks.
        let epoch = {
            let mut state = lock(&self.state);
            match *state {
                ConnectionState::Disconnected | ConnectionState::Faulted => {
                    *state = ConnectionState::Connecting;
                }
                actual => {
                    return Err(ProviderError::InvalidState {
                        operation: "connect",
                        expected: "disconnected or faulted",
                        actual,
                    });
                }
            }
            self.epoch.load(Ordering::SeqCst)
        };
        Ok(self.spawn_refresh(Some(config), epoch))
    }

    /// Re-introspect the connected model over the existing session.
    pub fn refresh(self: &Arc<Self>) -> Result<RefreshHandle, ProviderError> {
        let epoch = {
            let mut state = lock(&self.state);
            match *state {
                ConnectionState::Connected => *state = ConnectionState::Refreshing,
                actual => {
                    return Err(ProviderError::InvalidState {
                        operation: "refresh",
                        expected: "connected",
                        actual,
                    });
                }
            }
            self.epoch.load(Ordering::SeqCst)
        };
        Ok(self.spawn_refresh(None, epoch))
    }

    fn spawn_refresh(
        self: &Arc<Self>,
        config: Option<ConnectionConfig>,
        epoch: u64,
    ) -> RefreshHandle {
        let (tx, rx) = oneshot::channel();
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = provider.run_refresh(config, epoch).await;
            let _ = tx.send(outcome);
        });
        RefreshHandle { rx }
    }

    async fn run_refresh(&self, config: Option<ConnectionConfig>, epoch: u64) -> RefreshOutcome {
        match self.introspect(config, epoch).await {
            Ok(()) => RefreshOutcome::Completed,
            Err(RefreshError::Cancelled) => {
                self.notify(|s| s.on_log_message("Schema refresh cancelled", false));
                RefreshOutcome::Cancelled
            }
            Err(RefreshError::Engine(err)) => {
                if self.is_stale(epoch) {
                    // Disconnected while the engine call was failing; the
                    // disconnect already owns the state machine.
                    RefreshOutcome::Cancelled
                } else {
                    *lock(&self.state) = ConnectionState::Faulted;
                    self.notify(|s| {
                        s.on_log_message(&format!("Schema refresh failed: {err}"), true)
                    });
                    RefreshOutcome::Failed
                }
            }
        }
    }

    fn is_stale(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) != epoch
    }

    fn check_cancelled(&self, epoch: u64) -> Result<(), RefreshError> {
        if self.is_stale(epoch) {
            Err(RefreshError::Cancelled)
        } else {
            Ok(())
        }
    }

    async fn introspect(
        &self,
        config: Option<ConnectionConfig>,
        epoch: u64,
    ) -> Result<(), RefreshError> {
        let session = match config {
            Some(config) => {
                let session = self.engine.open(&config).await?;
                self.check_cancelled(epoch)?;
                *lock(&self.session) = Some(Arc::clone(&session));
                session
            }
            None => lock(&self.session).clone().ok_or_else(|| {
                RefreshError::Engine(EngineError::ConnectionFailed(
                    "no open session to refresh".to_string(),
                ))
            })?,
        };

        let tables = session.list_tables().await?;
        self.check_cancelled(epoch)?;

        // Fetch every table's members in parallel; join_all preserves the
        // engine's table order.
        let fetches: Vec<_> = tables
            .iter()
            .map(|table| fetch_table_schema(session.as_ref(), &table.name))
            .collect();
        let mut schemas = Vec::with_capacity(tables.len());
        for result in futures::future::join_all(fetches).await {
            schemas.push(result?);
        }
        self.check_cancelled(epoch)?;

        let generation = Arc::new(Generation::new(SymbolCatalog::with_schema(schemas)));

        // Publish: serialized so summaries arrive in completion order, and
        // guarded by a final cancellation check so a stale refresh never
        // overwrites state after a disconnect.
        let _publish = self.publish_lock.lock().await;
        self.check_cancelled(epoch)?;
        *lock(&self.snapshot) = Arc::clone(&generation);
        *lock(&self.state) = ConnectionState::Connected;

        // Warm the prefix index off the publish path; the first keystroke
        // that beats this task just performs the build itself.
        let warm = Arc::clone(&generation);
        tokio::task::spawn_blocking(move || {
            let _ = warm.index();
        });

        let summary = render_schema_summary(generation.catalog());
        self.notify(move |s| s.on_schema_summary(summary));
        Ok(())
    }

    /// Evaluate an expression against the connected model.
    ///
    /// Valid while `Connected` or `Refreshing`: queries and schema
    /// refreshes are independent operations on the same session, and the
    /// bridge correlates responses by request id. The result arrives on the
    /// sink's query-result channel (plus the raw protocol text on the
    /// raw-result channel); failures arrive as log messages.
    pub fn evaluate(
        self: &Arc<Self>,
        expression: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let actual = self.state();
        if !matches!(
            actual,
            ConnectionState::Connected | ConnectionState::Refreshing
        ) {
            return Err(ProviderError::InvalidState {
                operation: "evaluate",
                expected: "connected",
                actual,
            });
        }
        let Some(session) = lock(&self.session).clone() else {
            return Err(ProviderError::InvalidState {
                operation: "evaluate",
                expected: "connected",
                actual,
            });
        };

        let provider = Arc::clone(self);
        let expression = expression.into();
        tokio::spawn(async move {
            match session.evaluate(&expression).await {
                Ok(evaluation) => {
                    let raw = evaluation.raw;
                    provider.notify(move |s| s.on_query_result(evaluation.table));
                    provider.notify(move |s| s.on_raw_result(raw));
                }
                Err(err) => {
                    provider.notify(|s| s.on_log_message(&format!("Query failed: {err}"), true));
                }
            }
        });
        Ok(())
    }

    /// Disconnect from the engine.
    ///
    /// Cancels any in-flight introspection (cooperatively: the refresh
    /// observes the epoch bump at its next checkpoint and never publishes),
    /// closes the session best-effort, and resets the snapshot to the
    /// builtins-only generation. Idempotent: disconnecting a disconnected
    /// provider is a no-op.
    pub async fn disconnect(&self) {
        {
            let mut state = lock(&self.state);
            if *state == ConnectionState::Disconnected {
                return;
            }
            *state = ConnectionState::Disconnecting;
        }

        self.epoch.fetch_add(1, Ordering::SeqCst);
        // Wait out a publish already in progress; any refresh that reaches
        // the publish section after this point observes the new epoch.
        let _publish = self.publish_lock.lock().await;

        let session = lock(&self.session).take();
        if let Some(session) = session {
            if let Err(err) = session.close().await {
                self.notify(|s| {
                    s.on_log_message(&format!("Error closing engine session: {err}"), false)
                });
            }
        }

        *lock(&self.snapshot) = Arc::new(Generation::builtins_only());
        *lock(&self.state) = ConnectionState::Disconnected;
    }
}

/// Fetch one table's members and assemble them in presentation order:
/// columns, then calculated columns, then measures, each group in the
/// engine's order.
async fn fetch_table_schema(
    session: &dyn EngineSession,
    table: &str,
) -> Result<TableSchema, EngineError> {
    let (columns, calc_columns, measures) = futures::future::try_join3(
        session.list_columns(table),
        session.list_calc_columns(table),
        session.list_measures(table),
    )
    .await?;

    if columns.is_empty() && calc_columns.is_empty() && measures.is_empty() {
        return Err(EngineError::MalformedMetadata {
            table: table.to_string(),
            detail: "table reported no members".to_string(),
        });
    }

    let members = columns
        .into_iter()
        .chain(calc_columns)
        .chain(measures)
        .map(|member| member_symbol(table, member))
        .collect();

    Ok(TableSchema {
        name: table.to_string(),
        members,
    })
}

fn member_symbol(table: &str, member: MemberMeta) -> Symbol {
    let kind = match member.kind {
        MemberKind::Column => SymbolKind::Column,
        MemberKind::CalcColumn => SymbolKind::CalcColumn,
        MemberKind::Measure => SymbolKind::Measure,
    };
    let description = format!("{} on table '{}'", kind.label(), table);
    Symbol::member(member.name, description, kind, table)
}
