mod store;
mod titles;

pub use store::SessionStore;
pub use titles::{fallback_message, generate_title, WELCOME_MESSAGES};
