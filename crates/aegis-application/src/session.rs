//! Console session lifecycle.
//!
//! `ConsoleSession` is the single owner of all session state. Construction
//! wires the subsystems, `start()` settles the connection state and spawns
//! the polling loop, `shutdown()` releases the timer. Nothing survives
//! teardown.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use aegis_core::backend::{ChatBackend, HealthProbe, TelemetrySource};
use aegis_core::config::ConsoleConfig;
use aegis_core::logbook::{LogBook, LogChannel, LogEntry, LogLevel};
use aegis_core::session::{ConnectionState, ConversationHistory, Message};
use aegis_core::telemetry::{ChartPoint, MetricSample};
use aegis_interaction::{DemoResponder, HttpBackend};

use crate::dispatcher::{ConversationDispatcher, DispatchOutcome};
use crate::pipeline::{MetricsPipeline, MetricsState};

/// An interactive console session against one backend.
///
/// All state is session-local: messages, history, logs, metrics and
/// connection mode are created on construction and discarded on teardown.
pub struct ConsoleSession {
    id: Uuid,
    config: ConsoleConfig,
    probe: Arc<dyn HealthProbe>,
    connection: Arc<RwLock<ConnectionState>>,
    messages: Arc<RwLock<Vec<Message>>>,
    history: Arc<RwLock<ConversationHistory>>,
    logs: Arc<RwLock<LogBook>>,
    metrics: Arc<RwLock<MetricsState>>,
    dispatcher: ConversationDispatcher,
    pipeline: Arc<MetricsPipeline>,
    cancel: CancellationToken,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl ConsoleSession {
    /// Creates a session over explicit backend collaborators.
    ///
    /// Tests pass in-memory mocks; production code uses
    /// [`ConsoleSession::connect`].
    pub fn new(
        config: ConsoleConfig,
        probe: Arc<dyn HealthProbe>,
        telemetry: Arc<dyn TelemetrySource>,
        chat: Arc<dyn ChatBackend>,
    ) -> Self {
        let connection = Arc::new(RwLock::new(ConnectionState::Probing));
        let messages = Arc::new(RwLock::new(Vec::new()));
        let history = Arc::new(RwLock::new(ConversationHistory::new()));
        let logs = Arc::new(RwLock::new(LogBook::new(config.log_capacity)));
        let metrics = Arc::new(RwLock::new(MetricsState::new(config.chart_window)));

        let dispatcher = ConversationDispatcher::new(
            chat,
            DemoResponder::new(config.demo_delay()),
            connection.clone(),
            messages.clone(),
            history.clone(),
            logs.clone(),
            metrics.clone(),
            config.context_tag.clone(),
            config.history_forward_limit,
        );

        let pipeline = Arc::new(MetricsPipeline::new(
            telemetry,
            metrics.clone(),
            logs.clone(),
            config.poll_interval(),
        ));

        Self {
            id: Uuid::new_v4(),
            config,
            probe,
            connection,
            messages,
            history,
            logs,
            metrics,
            dispatcher,
            pipeline,
            cancel: CancellationToken::new(),
            poll_task: Mutex::new(None),
        }
    }

    /// Creates a session wired to the REST backend from the configuration.
    pub fn connect(config: ConsoleConfig) -> Self {
        let backend = Arc::new(HttpBackend::new(&config));
        Self::new(config, backend.clone(), backend.clone(), backend)
    }

    /// Starts the session: one bounded health probe decides the connection
    /// state for the whole session, the opening message is posted, and the
    /// polling loop is spawned.
    pub async fn start(&self) {
        let probed = tokio::time::timeout(self.config.probe_timeout(), self.probe.probe()).await;

        let state = match probed {
            Ok(Ok(())) => ConnectionState::Online,
            Ok(Err(err)) => {
                tracing::warn!(session = %self.id, error = %err, "health probe failed");
                ConnectionState::Demo
            }
            Err(_) => {
                tracing::warn!(session = %self.id, "health probe timed out");
                ConnectionState::Demo
            }
        };

        *self.connection.write().await = state;

        {
            let mut logs = self.logs.write().await;
            match state {
                ConnectionState::Online => {
                    logs.append(LogChannel::Dispatcher, LogLevel::Info, "Connected to backend");
                }
                _ => {
                    logs.append(LogChannel::Dispatcher, LogLevel::Warn, "Running in demo mode");
                }
            }
        }

        self.messages
            .write()
            .await
            .push(Message::assistant(self.greeting(state)));

        let pipeline = self.pipeline.clone();
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(pipeline.run(cancel));
        *self.poll_task.lock().await = Some(handle);

        tracing::info!(session = %self.id, state = %state, "console session started");
    }

    /// Dispatches one turn of conversation. See
    /// [`ConversationDispatcher::submit`] for the single-flight contract.
    pub async fn submit(&self, text: &str) -> DispatchOutcome {
        self.dispatcher.submit(text).await
    }

    /// Clears the transcript and history and posts the greeting again.
    /// Logs, metrics and connection state survive a reset.
    pub async fn reset(&self) {
        let state = *self.connection.read().await;

        self.history.write().await.clear();

        let mut messages = self.messages.write().await;
        messages.clear();
        messages.push(Message::assistant(self.greeting(state)));

        tracing::debug!(session = %self.id, "session reset");
    }

    /// Stops the polling loop. Idempotent; also triggered by drop.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.poll_task.lock().await.take() {
            let _ = handle.await;
        }
        tracing::debug!(session = %self.id, "console session shut down");
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub async fn connection_state(&self) -> ConnectionState {
        *self.connection.read().await
    }

    /// Snapshot of the transcript, oldest first.
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Snapshot of a log channel, newest first.
    pub async fn log_entries(&self, channel: LogChannel) -> Vec<LogEntry> {
        self.logs.read().await.entries(channel).cloned().collect()
    }

    /// The current (possibly synthetic) sample.
    pub async fn current_sample(&self) -> MetricSample {
        self.metrics.read().await.sample
    }

    /// Snapshot of the chart window, oldest first.
    pub async fn chart_points(&self) -> Vec<ChartPoint> {
        self.metrics.read().await.series.points().cloned().collect()
    }

    /// Stored conversational history, oldest first.
    pub async fn history_turns(&self) -> Vec<String> {
        self.history.read().await.turns().to_vec()
    }

    fn greeting(&self, state: ConnectionState) -> String {
        match state {
            ConnectionState::Online => format!(
                "**Aegis Console** is ready.\n\n\
                 Connected to the backend at {}. Ask about your \
                 infrastructure, or try:\n\n\
                 - \"Show system status\"\n\
                 - \"List pods\"\n\
                 - \"Run diagnostics\"",
                self.config.backend_url
            ),
            _ => format!(
                "**Aegis Console** (demo mode)\n\n\
                 Backend not available. Serving simulated data.\n\n\
                 To connect, start the backend and point the console at \
                 it:\n\n\
                 ```bash\naegis --backend-url {}\n```",
                self.config.backend_url
            ),
        }
    }
}

impl Drop for ConsoleSession {
    fn drop(&mut self) {
        // The polling task checks this token; dropping the session stops
        // the timer even without an explicit shutdown().
        self.cancel.cancel();
    }
}
