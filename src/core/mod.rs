// src/core/mod.rs
//! Configuration, file system and HTTP plumbing shared by the rest of the crate

pub mod chat_client;
pub mod config_manager;
pub mod fs_ops;
pub mod logging;

pub use chat_client::{ChatClient, ChatError, OpenAiClient};
pub use config_manager::ConfigManager;
pub use fs_ops::FsOps;
