pub mod branch;
pub mod classify;
mod engine;
mod selector;
pub mod templates;

pub use branch::{GreetingKind, PromptBranch, Selection};
pub use engine::PromptEngine;
pub use selector::{PromptInput, PromptSelector, Rule};
