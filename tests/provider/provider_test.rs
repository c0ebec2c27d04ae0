#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
    use tokio::sync::Notify;

    use tabula::config::ConnectionConfig;
    use tabula::engine::{
        Engine, EngineError, EngineResult, EngineSession, Evaluation, MemberKind, MemberMeta,
        TableMeta, TabularResult,
    };
    use tabula::{ConnectionState, RefreshOutcome, SchemaProvider, SymbolKind, UpdateSink};

    const SETTLE: Duration = Duration::from_secs(2);

    // ========================================================================
    // Fake engine
    // ========================================================================

    #[derive(Clone)]
    struct FakeTable {
        name: String,
        columns: Vec<String>,
        calc_columns: Vec<String>,
        measures: Vec<String>,
    }

    #[derive(Default)]
    struct FakeInner {
        tables: Vec<FakeTable>,
        fail_open: AtomicBool,
        fail_list_tables: AtomicBool,
        /// When set, list_tables blocks until the gate is notified.
        gate: Mutex<Option<Arc<Notify>>>,
        /// When set, list_tables signals entry before blocking on the gate.
        entered_tx: Mutex<Option<UnboundedSender<()>>>,
    }

    struct FakeEngine {
        inner: Arc<FakeInner>,
    }

    impl FakeEngine {
        fn new(tables: Vec<FakeTable>) -> Self {
            Self {
                inner: Arc::new(FakeInner {
                    tables,
                    ..FakeInner::default()
                }),
            }
        }

        /// One table T1 with column [c] and measures [M1] and [M Decimal],
        /// in that engine order.
        fn with_t1() -> Self {
            Self::new(vec![FakeTable {
                name: "T1".to_string(),
                columns: vec!["[c]".to_string()],
                calc_columns: vec![],
                measures: vec!["[M1]".to_string(), "[M Decimal]".to_string()],
            }])
        }

        fn set_fail_open(&self, fail: bool) {
            self.inner.fail_open.store(fail, Ordering::SeqCst);
        }

        fn set_fail_list_tables(&self, fail: bool) {
            self.inner.fail_list_tables.store(fail, Ordering::SeqCst);
        }

        fn gate_list_tables(&self) -> (Arc<Notify>, UnboundedReceiver<()>) {
            let gate = Arc::new(Notify::new());
            let (tx, rx) = mpsc::unbounded_channel();
            *self.inner.gate.lock().unwrap() = Some(Arc::clone(&gate));
            *self.inner.entered_tx.lock().unwrap() = Some(tx);
            (gate, rx)
        }
    }

    struct FakeSession {
        inner: Arc<FakeInner>,
    }

    impl FakeSession {
        fn members(names: &[String], kind: MemberKind) -> Vec<MemberMeta> {
            names
                .iter()
                .map(|name| MemberMeta {
                    name: name.clone(),
                    kind,
                })
                .collect()
        }

        fn table(&self, name: &str) -> EngineResult<FakeTable> {
            self.inner
                .tables
                .iter()
                .find(|t| t.name == name)
                .cloned()
                .ok_or_else(|| EngineError::InvalidRequest(format!("unknown table {name}")))
        }
    }

    #[async_trait]
    impl Engine for FakeEngine {
        async fn open(&self, _config: &ConnectionConfig) -> EngineResult<Arc<dyn EngineSession>> {
            if self.inner.fail_open.load(Ordering::SeqCst) {
                return Err(EngineError::AuthenticationFailed(
                    "credentials rejected".to_string(),
                ));
            }
            Ok(Arc::new(FakeSession {
                inner: Arc::clone(&self.inner),
            }))
        }
    }

    #[async_trait]
    impl EngineSession for FakeSession {
        async fn list_tables(&self) -> EngineResult<Vec<TableMeta>> {
            let entered = self.inner.entered_tx.lock().unwrap().clone();
            if let Some(tx) = entered {
                let _ = tx.send(());
            }
            let gate = self.inner.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if self.inner.fail_list_tables.load(Ordering::SeqCst) {
                return Err(EngineError::ConnectionFailed(
                    "engine unreachable".to_string(),
                ));
            }
            Ok(self
                .inner
                .tables
                .iter()
                .map(|t| TableMeta {
                    name: t.name.clone(),
                })
                .collect())
        }

        async fn list_columns(&self, table: &str) -> EngineResult<Vec<MemberMeta>> {
            Ok(Self::members(&self.table(table)?.columns, MemberKind::Column))
        }

        async fn list_calc_columns(&self, table: &str) -> EngineResult<Vec<MemberMeta>> {
            Ok(Self::members(
                &self.table(table)?.calc_columns,
                MemberKind::CalcColumn,
            ))
        }

        async fn list_measures(&self, table: &str) -> EngineResult<Vec<MemberMeta>> {
            Ok(Self::members(&self.table(table)?.measures, MemberKind::Measure))
        }

        async fn evaluate(&self, expression: &str) -> EngineResult<Evaluation> {
            Ok(Evaluation {
                table: TabularResult {
                    columns: vec!["Value".to_string()],
                    rows: vec![vec![serde_json::json!(42)]],
                    row_count: 1,
                },
                raw: format!("{{\"expression\":{expression:?},\"row_count\":1}}"),
            })
        }

        async fn close(&self) -> EngineResult<()> {
            Ok(())
        }
    }

    // ========================================================================
    // Recording sink
    // ========================================================================

    #[derive(Debug, Clone)]
    enum Event {
        Query(TabularResult),
        Schema(String),
        Raw(String),
        Log(String, bool),
    }

    struct RecordingSink {
        tx: UnboundedSender<Event>,
    }

    impl RecordingSink {
        fn channel() -> (Arc<Self>, UnboundedReceiver<Event>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Arc::new(Self { tx }), rx)
        }
    }

    impl UpdateSink for RecordingSink {
        fn on_query_result(&self, result: TabularResult) {
            let _ = self.tx.send(Event::Query(result));
        }

        fn on_schema_summary(&self, document: String) {
            let _ = self.tx.send(Event::Schema(document));
        }

        fn on_raw_result(&self, protocol_text: String) {
            let _ = self.tx.send(Event::Raw(protocol_text));
        }

        fn on_log_message(&self, message: &str, should_focus: bool) {
            let _ = self.tx.send(Event::Log(message.to_string(), should_focus));
        }
    }

    async fn next_event(rx: &mut UnboundedReceiver<Event>) -> Event {
        tokio::time::timeout(SETTLE, rx.recv())
            .await
            .expect("timed out waiting for sink event")
            .expect("sink channel closed")
    }

    fn drain(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("localhost:2383", "TestModel")
    }

    // ========================================================================
    // Tests
    // ========================================================================

    #[tokio::test]
    async fn test_connect_publishes_schema_in_engine_order() {
        let provider = SchemaProvider::new(Arc::new(FakeEngine::with_t1()));
        let (sink, mut rx) = RecordingSink::channel();
        provider.set_update_sink(sink);

        let outcome = provider
            .connect(config())
            .unwrap()
            .settled(SETTLE)
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Completed);
        assert_eq!(provider.state(), ConnectionState::Connected);

        // The summary lists T1's members in exactly the engine's order.
        let Event::Schema(document) = next_event(&mut rx).await else {
            panic!("expected a schema summary first");
        };
        let c = document.find("[c]").expect("column in summary");
        let m1 = document.find("[M1]").expect("first measure in summary");
        let m2 = document.find("[M Decimal]").expect("second measure in summary");
        assert!(c < m1 && m1 < m2);

        // Prefix search returns the measures in lexicographic name order.
        let generation = provider.snapshot();
        let index = generation.index();
        let matches: Vec<String> = index
            .search_by_prefix("[M")
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(matches, vec!["[M Decimal]", "[M1]"]);
    }

    #[tokio::test]
    async fn test_second_connect_while_in_flight_fails_fast() {
        let engine = FakeEngine::with_t1();
        let (gate, mut entered) = engine.gate_list_tables();
        let provider = SchemaProvider::new(Arc::new(engine));

        let handle = provider.connect(config()).unwrap();
        entered.recv().await.expect("refresh should reach the engine");

        // A double-connect is a caller bug: it is rejected, not queued.
        let err = provider.connect(config()).unwrap_err();
        assert!(err.to_string().contains("connect"));
        assert_eq!(provider.state(), ConnectionState::Connecting);

        gate.notify_one();
        let outcome = handle.settled(SETTLE).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Completed);
    }

    #[tokio::test]
    async fn test_refresh_requires_connected_state() {
        let provider = SchemaProvider::new(Arc::new(FakeEngine::with_t1()));
        assert!(provider.refresh().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_cancels_inflight_refresh() {
        let engine = FakeEngine::with_t1();
        let (gate, mut entered) = engine.gate_list_tables();
        let provider = SchemaProvider::new(Arc::new(engine));
        let (sink, mut rx) = RecordingSink::channel();
        provider.set_update_sink(sink);

        let handle = provider.connect(config()).unwrap();
        entered.recv().await.expect("refresh should reach the engine");

        provider.disconnect().await;
        gate.notify_one();

        let outcome = handle.settled(SETTLE).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Cancelled);
        assert_eq!(provider.state(), ConnectionState::Disconnected);

        // The stale refresh must not have published schema data.
        let generation = provider.snapshot();
        assert!(generation.catalog().tables().is_empty());
        for event in drain(&mut rx) {
            assert!(
                !matches!(event, Event::Schema(_)),
                "cancelled refresh must not deliver a schema summary"
            );
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_preserves_previous_catalog() {
        let engine = FakeEngine::with_t1();
        let inner = Arc::new(engine);
        let provider = SchemaProvider::new(Arc::clone(&inner) as Arc<dyn Engine>);
        let (sink, mut rx) = RecordingSink::channel();
        provider.set_update_sink(sink);

        let outcome = provider
            .connect(config())
            .unwrap()
            .settled(SETTLE)
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Completed);
        let _ = drain(&mut rx);

        inner.set_fail_list_tables(true);
        let outcome = provider.refresh().unwrap().settled(SETTLE).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(provider.state(), ConnectionState::Faulted);

        // Previously known symbols are still queryable.
        let generation = provider.snapshot();
        let index = generation.index();
        assert!(index.search_exact("[M1]").is_some());
        assert!(generation.catalog().table("T1").is_some());

        // The failure surfaced on the log channel with focus.
        let logged = drain(&mut rx).into_iter().any(|event| {
            matches!(&event, Event::Log(message, true) if message.contains("refresh failed"))
        });
        assert!(logged, "expected a focused log message about the failure");
    }

    #[tokio::test]
    async fn test_connect_failure_faults_then_recovers() {
        let engine = Arc::new(FakeEngine::with_t1());
        engine.set_fail_open(true);
        let provider = SchemaProvider::new(Arc::clone(&engine) as Arc<dyn Engine>);
        let (sink, mut rx) = RecordingSink::channel();
        provider.set_update_sink(sink);

        let outcome = provider
            .connect(config())
            .unwrap()
            .settled(SETTLE)
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(provider.state(), ConnectionState::Faulted);
        let _ = drain(&mut rx);

        // A fresh connect is accepted from Faulted.
        engine.set_fail_open(false);
        let outcome = provider
            .connect(config())
            .unwrap()
            .settled(SETTLE)
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Completed);
        assert_eq!(provider.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_evaluate_delivers_result_and_raw_text() {
        let provider = SchemaProvider::new(Arc::new(FakeEngine::with_t1()));
        let (sink, mut rx) = RecordingSink::channel();
        provider.set_update_sink(Arc::clone(&sink) as Arc<dyn UpdateSink>);

        provider
            .connect(config())
            .unwrap()
            .settled(SETTLE)
            .await
            .unwrap();
        let _ = drain(&mut rx);

        provider.evaluate("EVALUATE T1").unwrap();

        let Event::Query(result) = next_event(&mut rx).await else {
            panic!("expected the query result first");
        };
        assert_eq!(result.columns, vec!["Value"]);
        assert_eq!(result.row_count, 1);

        let Event::Raw(raw) = next_event(&mut rx).await else {
            panic!("expected the raw protocol text second");
        };
        assert!(raw.contains("EVALUATE T1"));
    }

    #[tokio::test]
    async fn test_evaluate_while_disconnected_fails_fast() {
        let provider = SchemaProvider::new(Arc::new(FakeEngine::with_t1()));
        let err = provider.evaluate("EVALUATE T1").unwrap_err();
        assert!(err.to_string().contains("evaluate"));
    }

    #[tokio::test]
    async fn test_disconnect_clears_schema_but_keeps_builtins() {
        let provider = SchemaProvider::new(Arc::new(FakeEngine::with_t1()));
        provider
            .connect(config())
            .unwrap()
            .settled(SETTLE)
            .await
            .unwrap();

        // A reader that pinned the old generation keeps a working index.
        let pinned = provider.snapshot();

        provider.disconnect().await;
        assert_eq!(provider.state(), ConnectionState::Disconnected);

        let generation = provider.snapshot();
        assert!(generation.catalog().tables().is_empty());
        assert!(generation.index().search_exact("SUM").is_some());
        assert!(generation.index().search_exact("[M1]").is_none());

        assert!(pinned.index().search_exact("[M1]").is_some());
    }

    #[tokio::test]
    async fn test_second_sink_replaces_first() {
        let provider = SchemaProvider::new(Arc::new(FakeEngine::with_t1()));
        let (first_sink, mut first_rx) = RecordingSink::channel();
        let (second_sink, mut second_rx) = RecordingSink::channel();

        provider.set_update_sink(first_sink);
        provider.set_update_sink(second_sink);

        provider
            .connect(config())
            .unwrap()
            .settled(SETTLE)
            .await
            .unwrap();

        assert!(matches!(next_event(&mut second_rx).await, Event::Schema(_)));
        assert!(drain(&mut first_rx).is_empty());
    }

    #[tokio::test]
    async fn test_panicking_sink_does_not_corrupt_provider() {
        struct PanickingSink;
        impl UpdateSink for PanickingSink {
            fn on_query_result(&self, _result: TabularResult) {}
            fn on_schema_summary(&self, _document: String) {
                panic!("sink exploded");
            }
            fn on_raw_result(&self, _protocol_text: String) {}
            fn on_log_message(&self, _message: &str, _should_focus: bool) {}
        }

        let provider = SchemaProvider::new(Arc::new(FakeEngine::with_t1()));
        provider.set_update_sink(Arc::new(PanickingSink));

        let outcome = provider
            .connect(config())
            .unwrap()
            .settled(SETTLE)
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Completed);
        assert_eq!(provider.state(), ConnectionState::Connected);

        let generation = provider.snapshot();
        assert_eq!(
            generation
                .catalog()
                .lookup(SymbolKind::Measure, Some("T1"), "[M1]")
                .map(|s| s.kind),
            Some(SymbolKind::Measure)
        );
    }
}
