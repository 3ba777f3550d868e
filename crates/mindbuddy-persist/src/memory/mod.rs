mod store;
mod sweeper;
mod thread;

pub use store::{MemoryConfig, MemoryStats, ThreadMemoryStore};
pub use sweeper::{schedule_idle_removal, spawn_sweeper, SweeperHandle};
pub use thread::{ConversationStage, ThreadMemory, Topic, MAX_TRACKED_TOPICS};
