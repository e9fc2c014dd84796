// src/lib.rs
//! Tailors a stored resume profile to a job description and drafts a cover
//! letter, using an OpenAI-compatible chat completion endpoint.

pub mod cli;
pub mod core;
pub mod dialog;
pub mod enhancer;
pub mod form;
pub mod orchestrator;
pub mod prompts;
pub mod render;
pub mod store;
pub mod types;
pub mod validation;

pub use enhancer::{EnhanceError, Enhancer, GenerationCall};
pub use orchestrator::{Notification, RequestState, RetryPolicy, Session, SubmitError};
pub use store::{FileStore, KeyValueStore, MemoryStore, ProfileStore};
pub use types::{GenerationResult, UserProfile};
