pub mod chat;
pub mod profile;

pub use chat::{ChatMessage, ChatRequest, Role};
pub use profile::{
    Certification, Education, Experience, GenerationResult, Interest, Language, Skill,
    UserProfile,
};
