//! Connection state of a console session.

use serde::{Deserialize, Serialize};
use strum::Display;

/// The session's operating mode against the backend.
///
/// The state is decided by a single health probe at session start and is
/// terminal for the session's lifetime: `Probing` transitions once to
/// either `Online` or `Demo` and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ConnectionState {
    /// The health probe has not settled yet.
    #[strum(serialize = "probing")]
    Probing,
    /// The backend answered the probe; dispatches go over the network.
    #[strum(serialize = "online")]
    Online,
    /// The backend is unreachable; the session serves simulated data.
    #[strum(serialize = "demo")]
    Demo,
}

impl ConnectionState {
    pub fn is_online(self) -> bool {
        matches!(self, ConnectionState::Online)
    }

    pub fn is_demo(self) -> bool {
        matches!(self, ConnectionState::Demo)
    }
}
