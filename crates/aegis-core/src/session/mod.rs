//! Session-local state: transcript, history, connection mode.

pub mod connection;
pub mod history;
pub mod message;

pub use connection::ConnectionState;
pub use history::ConversationHistory;
pub use message::{Message, MessageRole, RenderKind};
