//! Async client for the engine bridge process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};

use super::error::{EngineError, EngineResult};
use super::protocol::{
    methods, CloseResponse, ErrorInfo, EvaluateParams, EvaluateResponse, ListMembersParams,
    ListMembersResponse, ListTablesResponse, OpenParams, OpenResponse, RequestEnvelope,
    ResponseEnvelope, SessionParams,
};
use super::{Engine, EngineSession, Evaluation, MemberMeta, TableMeta};
use crate::config::{ConnectionConfig, Settings};

/// Default timeout for requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Async client for the engine bridge.
///
/// The client spawns the bridge as a child process and communicates via
/// NDJSON (newline-delimited JSON) over stdin/stdout. Each request has a
/// unique ID for correlation with responses, enabling concurrent requests:
/// a schema refresh and a query evaluation can be in flight on the same
/// bridge at the same time.
pub struct BridgeClient {
    /// Writer for sending requests to bridge stdin.
    stdin: Arc<Mutex<BufWriter<ChildStdin>>>,

    /// Map of pending request IDs to response channels.
    pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>,

    /// Handle to the bridge child process.
    _child: Child,

    /// Handle to the background reader task.
    _reader_task: tokio::task::JoinHandle<()>,

    /// Request timeout duration.
    timeout: Duration,
}

impl BridgeClient {
    /// Spawn a new bridge process.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge process cannot be spawned.
    pub async fn spawn<P: AsRef<Path>>(bridge_path: P) -> EngineResult<Self> {
        Self::spawn_with_timeout(bridge_path, Duration::from_secs(DEFAULT_TIMEOUT_SECS)).await
    }

    /// Spawn a bridge using settings configuration.
    ///
    /// Resolves the bridge binary from the configured path, common
    /// locations, and finally `PATH`, and applies the configured request
    /// timeout.
    pub async fn spawn_with_settings(settings: &Settings) -> EngineResult<Self> {
        let bridge_path = Self::resolve_bridge_path(settings)?;
        let timeout = Duration::from_secs(settings.bridge.timeout_secs);
        Self::spawn_with_timeout(&bridge_path, timeout).await
    }

    /// Resolve the bridge binary path from settings.
    fn resolve_bridge_path(settings: &Settings) -> EngineResult<PathBuf> {
        if let Some(path) = settings.bridge_path() {
            return Ok(path);
        }

        // Search common locations
        let candidates = ["tabula-bridge", "./tabula-bridge", "./bridge/tabula-bridge"];
        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
        }

        // Try PATH
        if let Ok(output) = std::process::Command::new("which")
            .arg("tabula-bridge")
            .output()
        {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Ok(PathBuf::from(path));
                }
            }
        }

        Err(EngineError::SpawnFailed(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Bridge binary not found. Set bridge.path in tabula.toml or add tabula-bridge to PATH",
        )))
    }

    /// Spawn a new bridge process with a custom request timeout.
    pub async fn spawn_with_timeout<P: AsRef<Path>>(
        bridge_path: P,
        timeout: Duration,
    ) -> EngineResult<Self> {
        let mut child = Command::new(bridge_path.as_ref())
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(EngineError::SpawnFailed)?;

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        let stdin = Arc::new(Mutex::new(BufWriter::new(stdin)));
        let pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        // Spawn background reader task
        let reader_task = Self::spawn_reader_task(stdout, pending.clone());

        Ok(Self {
            stdin,
            pending,
            _child: child,
            _reader_task: reader_task,
            timeout,
        })
    }

    /// Spawn the background task that reads responses from the bridge.
    fn spawn_reader_task(
        stdout: ChildStdout,
        pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF - bridge exited
                        break;
                    }
                    Ok(_) => match serde_json::from_str::<ResponseEnvelope>(&line) {
                        Ok(resp) => {
                            let mut pending = pending.lock().await;
                            if let Some(tx) = pending.remove(&resp.id) {
                                let _ = tx.send(resp);
                            }
                        }
                        Err(e) => {
                            // Log parse error but continue
                            eprintln!("bridge: failed to parse response: {}", e);
                        }
                    },
                    Err(e) => {
                        eprintln!("bridge: read error: {}", e);
                        break;
                    }
                }
            }

            // Bridge exited - notify all pending requests with error responses
            let mut pending = pending.lock().await;
            for (id, tx) in pending.drain() {
                let error_response = ResponseEnvelope {
                    id,
                    success: false,
                    result: None,
                    error: Some(ErrorInfo {
                        code: "BRIDGE_EXITED".to_string(),
                        message: "Bridge process exited unexpectedly".to_string(),
                    }),
                };
                let _ = tx.send(error_response);
            }
        })
    }

    /// Send a request and wait for the matching response envelope.
    async fn send_request<P>(&self, method: &str, params: P) -> EngineResult<ResponseEnvelope>
    where
        P: Serialize,
    {
        let id = uuid::Uuid::new_v4().to_string();

        let request = RequestEnvelope {
            id: id.clone(),
            method: method.to_string(),
            params: serde_json::to_value(params).map_err(EngineError::SerializeFailed)?,
        };

        // Register response channel
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id.clone(), tx);
        }

        // Send request
        {
            let mut stdin = self.stdin.lock().await;
            let line =
                serde_json::to_string(&request).map_err(EngineError::SerializeFailed)? + "\n";
            stdin
                .write_all(line.as_bytes())
                .await
                .map_err(EngineError::WriteFailed)?;
            stdin.flush().await.map_err(EngineError::WriteFailed)?;
        }

        // Wait for response with timeout
        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(_)) => {
                // Channel closed - bridge exited
                Err(EngineError::ChannelClosed)
            }
            Err(_) => {
                // Timeout - clean up pending request to prevent memory leak
                let mut pending = self.pending.lock().await;
                pending.remove(&id);
                Err(EngineError::Timeout(self.timeout.as_secs()))
            }
        }
    }

    /// Send a request to the bridge and deserialize the response.
    pub async fn request<P, R>(&self, method: &str, params: P) -> EngineResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response = self.send_request(method, params).await?;
        Self::decode_result(response).map(|(result, _)| result)
    }

    /// Send a request and return both the deserialized response and the raw
    /// protocol result text (for trace display).
    pub async fn request_with_raw<P, R>(&self, method: &str, params: P) -> EngineResult<(R, String)>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response = self.send_request(method, params).await?;
        Self::decode_result(response)
    }

    fn decode_result<R: DeserializeOwned>(
        response: ResponseEnvelope,
    ) -> EngineResult<(R, String)> {
        if response.success {
            let result = response.result.unwrap_or(serde_json::Value::Null);
            let raw = serde_json::to_string_pretty(&result).map_err(EngineError::SerializeFailed)?;
            let parsed = serde_json::from_value(result).map_err(EngineError::DeserializeFailed)?;
            Ok((parsed, raw))
        } else {
            let error = response.error.unwrap_or_else(|| ErrorInfo {
                code: "UNKNOWN".to_string(),
                message: "Unknown error".to_string(),
            });
            Err(Self::classify_error(&error.code, &error.message))
        }
    }

    /// Classify a bridge error into a more specific error type.
    fn classify_error(code: &str, message: &str) -> EngineError {
        match code {
            "CONNECTION_FAILED" => EngineError::ConnectionFailed(message.to_string()),
            "AUTH_FAILED" => EngineError::AuthenticationFailed(message.to_string()),
            "INVALID_REQUEST" => EngineError::InvalidRequest(message.to_string()),
            "METHOD_NOT_FOUND" => EngineError::MethodNotFound(message.to_string()),
            _ => EngineError::remote(code, message),
        }
    }

    /// Check if the bridge is still running.
    pub fn is_alive(&self) -> bool {
        // If the reader task has finished, the bridge has exited
        !self._reader_task.is_finished()
    }

    /// Get the current request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// [`Engine`] implementation backed by a [`BridgeClient`].
///
/// Sessions opened through one engine share its bridge process.
pub struct BridgeEngine {
    client: Arc<BridgeClient>,
}

impl BridgeEngine {
    /// Wrap an already spawned bridge client.
    pub fn new(client: BridgeClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Spawn a bridge from settings and wrap it.
    pub async fn spawn_with_settings(settings: &Settings) -> EngineResult<Self> {
        Ok(Self::new(BridgeClient::spawn_with_settings(settings).await?))
    }
}

#[async_trait]
impl Engine for BridgeEngine {
    async fn open(&self, config: &ConnectionConfig) -> EngineResult<Arc<dyn EngineSession>> {
        let response: OpenResponse = self
            .client
            .request(
                methods::SESSION_OPEN,
                OpenParams {
                    server: config.server.clone(),
                    database: config.database.clone(),
                },
            )
            .await?;

        Ok(Arc::new(BridgeSession {
            client: Arc::clone(&self.client),
            session_id: response.session_id,
        }))
    }
}

/// An open engine session speaking through the bridge.
pub struct BridgeSession {
    client: Arc<BridgeClient>,
    session_id: String,
}

impl BridgeSession {
    fn member_params(&self, table: &str) -> ListMembersParams {
        ListMembersParams {
            session_id: self.session_id.clone(),
            table: table.to_string(),
        }
    }

    async fn list_members(&self, method: &str, table: &str) -> EngineResult<Vec<MemberMeta>> {
        let response: ListMembersResponse =
            self.client.request(method, self.member_params(table)).await?;
        Ok(response.members)
    }
}

#[async_trait]
impl EngineSession for BridgeSession {
    async fn list_tables(&self) -> EngineResult<Vec<TableMeta>> {
        let response: ListTablesResponse = self
            .client
            .request(
                methods::LIST_TABLES,
                SessionParams {
                    session_id: self.session_id.clone(),
                },
            )
            .await?;
        Ok(response.tables)
    }

    async fn list_columns(&self, table: &str) -> EngineResult<Vec<MemberMeta>> {
        self.list_members(methods::LIST_COLUMNS, table).await
    }

    async fn list_calc_columns(&self, table: &str) -> EngineResult<Vec<MemberMeta>> {
        self.list_members(methods::LIST_CALC_COLUMNS, table).await
    }

    async fn list_measures(&self, table: &str) -> EngineResult<Vec<MemberMeta>> {
        self.list_members(methods::LIST_MEASURES, table).await
    }

    async fn evaluate(&self, expression: &str) -> EngineResult<Evaluation> {
        let (table, raw): (EvaluateResponse, String) = self
            .client
            .request_with_raw(
                methods::EVALUATE,
                EvaluateParams {
                    session_id: self.session_id.clone(),
                    expression: expression.to_string(),
                },
            )
            .await?;
        Ok(Evaluation { table, raw })
    }

    async fn close(&self) -> EngineResult<()> {
        let _: CloseResponse = self
            .client
            .request(
                methods::SESSION_CLOSE,
                SessionParams {
                    session_id: self.session_id.clone(),
                },
            )
            .await?;
        Ok(())
    }
}
