//! Multi-session AI chat
//!
//! - `types`: messages, sessions and the session collection
//! - `store`: durable persistence of the collection
//! - `manager`: session lifecycle and the send round trip

pub mod manager;
pub mod store;
pub mod types;

pub use manager::{ChatSessionManager, PendingSend, SendOutcome};
pub use store::SessionStore;
pub use types::{derive_title, ChatMessage, ChatSession, Role, SessionCollection};
