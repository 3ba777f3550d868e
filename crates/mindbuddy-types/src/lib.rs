pub mod chat;
pub mod events;
pub mod language;

pub use chat::{ChatMessage, ChatSession, Sender};
pub use events::{BotMessage, ClientEvent, ServerEvent, UserMessage, DEFAULT_THREAD_ID};
pub use language::Language;
