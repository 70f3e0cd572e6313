pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{EnvCredentials, MemoryStore, OpenAiProvider};
pub use app::{create_app, AppState};
pub use config::ServerConfig;
pub use crate::core::{auth::TokenIssuer, gateway::GenerationGateway};
pub use utils::error::{AppError, Result};
