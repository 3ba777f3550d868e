mod apology;
mod builder;
mod diagnostics;
mod fallback;
mod relay;
pub mod types;
mod welcome;

pub use apology::apology_for;
pub use builder::RelayBuilder;
pub use diagnostics::DiagnosticReport;
pub use fallback::fallback_reply;
pub use relay::Relay;
pub use types::{BotReply, FailurePolicy, RelayConfig, ReplySource, WelcomeMode};
pub use welcome::{WELCOME_LINES, WELCOME_PROMPT};
