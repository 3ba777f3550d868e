pub mod diagnostics;
pub mod health;
