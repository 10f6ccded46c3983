pub mod config;
pub mod error;
pub mod openai;
pub mod page;
pub mod prompt;
pub mod server;

pub use config::Config;
pub use error::{CompletionError, ConfigError};
pub use openai::{CompletionClient, OpenAiClient};
pub use server::{router, run, AppState};
