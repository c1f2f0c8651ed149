//! Session orchestration for the Aegis console: the metrics acquisition
//! pipeline, the conversation dispatcher, and the session lifecycle that
//! owns them.

pub mod dispatcher;
pub mod fallback;
pub mod pipeline;
pub mod session;

pub use dispatcher::{ConversationDispatcher, DispatchOutcome};
pub use fallback::FallbackSampler;
pub use pipeline::{MetricsPipeline, MetricsState};
pub use session::ConsoleSession;
