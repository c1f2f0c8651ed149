//! Conversation dispatcher.
//!
//! Accepts operator text, threads conversational history, and routes the
//! exchange to the live backend or the local demo responder depending on
//! the session's connection state. At most one dispatch is outstanding per
//! session; a concurrent submit is a silent no-op.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use aegis_core::backend::{ChatBackend, ChatRequest};
use aegis_core::logbook::{LogBook, LogChannel, LogLevel};
use aegis_core::session::{ConnectionState, ConversationHistory, Message};
use aegis_interaction::DemoResponder;

use crate::pipeline::MetricsState;

/// Result of a [`ConversationDispatcher::submit`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The dispatch ran and produced this assistant message.
    Replied(Message),
    /// Empty input or a dispatch already outstanding; nothing changed.
    Ignored,
}

/// Routes operator input to the backend or the demo responder.
pub struct ConversationDispatcher {
    chat: Arc<dyn ChatBackend>,
    demo: DemoResponder,
    connection: Arc<RwLock<ConnectionState>>,
    messages: Arc<RwLock<Vec<Message>>>,
    history: Arc<RwLock<ConversationHistory>>,
    logs: Arc<RwLock<LogBook>>,
    metrics: Arc<RwLock<MetricsState>>,
    in_flight: AtomicBool,
    context_tag: String,
    history_forward_limit: usize,
}

impl ConversationDispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chat: Arc<dyn ChatBackend>,
        demo: DemoResponder,
        connection: Arc<RwLock<ConnectionState>>,
        messages: Arc<RwLock<Vec<Message>>>,
        history: Arc<RwLock<ConversationHistory>>,
        logs: Arc<RwLock<LogBook>>,
        metrics: Arc<RwLock<MetricsState>>,
        context_tag: String,
        history_forward_limit: usize,
    ) -> Self {
        Self {
            chat,
            demo,
            connection,
            messages,
            history,
            logs,
            metrics,
            in_flight: AtomicBool::new(false),
            context_tag,
            history_forward_limit,
        }
    }

    /// Dispatches one turn of conversation.
    ///
    /// Input that is empty after trimming, or a call made while another
    /// dispatch is outstanding, is silently ignored: message count,
    /// history and logs are left untouched. The single-flight guard is
    /// released on every exit path.
    pub async fn submit(&self, text: &str) -> DispatchOutcome {
        let prompt = text.trim();
        if prompt.is_empty() {
            return DispatchOutcome::Ignored;
        }

        if self.in_flight.swap(true, Ordering::Acquire) {
            tracing::debug!("dispatch already outstanding, ignoring input");
            return DispatchOutcome::Ignored;
        }

        let reply = self.dispatch(prompt).await;
        self.in_flight.store(false, Ordering::Release);

        DispatchOutcome::Replied(reply)
    }

    async fn dispatch(&self, prompt: &str) -> Message {
        self.messages.write().await.push(Message::user(prompt));

        let state = *self.connection.read().await;
        let reply = if state.is_online() {
            self.dispatch_online(prompt).await
        } else {
            self.dispatch_demo(prompt).await
        };

        self.messages.write().await.push(reply.clone());
        reply
    }

    /// Online path: forward to the inference service and classify the
    /// reply by its declared action type.
    async fn dispatch_online(&self, prompt: &str) -> Message {
        let history = self
            .history
            .read()
            .await
            .forward_window(self.history_forward_limit);

        let request = ChatRequest {
            prompt: prompt.to_string(),
            context_tag: self.context_tag.clone(),
            history,
        };

        match self.chat.send_chat(request).await {
            Ok(reply) => {
                let message = if reply.is_query() {
                    Message::query_block(format!(
                        "**Executing Query**\n\n```promql\n{}\n```",
                        reply.payload
                    ))
                } else {
                    Message::assistant(reply.payload.clone())
                };

                self.history.write().await.push_exchange(prompt, &reply.payload);
                self.logs.write().await.append(
                    LogChannel::Dispatcher,
                    LogLevel::Info,
                    format!("{} ({}%)", reply.action, reply.confidence_percent()),
                );

                message
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat dispatch failed");
                self.logs.write().await.append(
                    LogChannel::Dispatcher,
                    LogLevel::Err,
                    "Request failed",
                );
                Message::error(format!("**Error**\n\n{err}"))
            }
        }
    }

    /// Demo path: never touches the network. History is not extended;
    /// only real exchanges provide context.
    async fn dispatch_demo(&self, prompt: &str) -> Message {
        let sample = self.metrics.read().await.sample;
        let content = self.demo.respond(prompt, &sample).await;

        self.logs.write().await.append(
            LogChannel::Dispatcher,
            LogLevel::Info,
            "Demo response generated",
        );

        Message::assistant(content)
    }
}
