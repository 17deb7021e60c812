//! smellscore-providers — Model backends and configuration.
//!
//! Implements the `LlmProvider` trait for OpenAI-compatible chat completion
//! APIs and an offline mock, and loads the `smellscore.toml` configuration.

pub mod config;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config_from, ProviderConfig, SmellscoreConfig};
pub use smellscore_core::error::ProviderError;
