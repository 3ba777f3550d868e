pub mod error;
pub mod memory;
pub mod sessions;

pub use error::{PersistError, Result};
pub use memory::{
    spawn_sweeper, schedule_idle_removal, ConversationStage, MemoryConfig, MemoryStats,
    SweeperHandle, ThreadMemory, ThreadMemoryStore, Topic,
};
pub use sessions::{fallback_message, generate_title, SessionStore, WELCOME_MESSAGES};
