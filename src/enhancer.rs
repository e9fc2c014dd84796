// src/enhancer.rs
//! Profile rewrite and cover letter, fetched together

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::core::chat_client::{ChatClient, ChatError};
use crate::prompts;
use crate::types::{GenerationResult, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationCall {
    ProfileRewrite,
    CoverLetter,
}

impl fmt::Display for GenerationCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileRewrite => f.write_str("profile rewrite"),
            Self::CoverLetter => f.write_str("cover letter"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EnhanceFailure {
    #[error(transparent)]
    Remote(#[from] ChatError),

    #[error("response is not a valid profile: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to build prompt: {0}")]
    Prompt(String),
}

/// Failure of one of the two calls. The other call's result is discarded.
#[derive(Debug, Error)]
#[error("{call} request failed: {failure}")]
pub struct EnhanceError {
    pub call: GenerationCall,
    #[source]
    pub failure: EnhanceFailure,
}

impl EnhanceError {
    fn new(call: GenerationCall, failure: impl Into<EnhanceFailure>) -> Self {
        Self {
            call,
            failure: failure.into(),
        }
    }
}

pub struct Enhancer<C> {
    client: C,
}

impl<C: ChatClient> Enhancer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Issues both requests concurrently; either failing fails the whole operation.
    pub async fn enhance(
        &self,
        credential: &str,
        profile: &UserProfile,
        job_description: &str,
    ) -> Result<GenerationResult, EnhanceError> {
        info!("Generating enhanced profile and cover letter");

        let (enhanced_profile, cover_letter) = tokio::try_join!(
            self.rewrite_profile(credential, profile, job_description),
            self.write_cover_letter(credential, profile, job_description),
        )?;

        info!(
            "Generation finished: {} experience entries, {} chars of letter",
            enhanced_profile.experience.len(),
            cover_letter.len()
        );

        Ok(GenerationResult {
            enhanced_profile,
            cover_letter,
        })
    }

    async fn rewrite_profile(
        &self,
        credential: &str,
        profile: &UserProfile,
        job_description: &str,
    ) -> Result<UserProfile, EnhanceError> {
        let call = GenerationCall::ProfileRewrite;
        let request = prompts::profile_rewrite_request(profile, job_description)
            .map_err(|e| EnhanceError::new(call, EnhanceFailure::Prompt(e.to_string())))?;

        let content = self
            .client
            .complete(credential, &request)
            .await
            .map_err(|e| EnhanceError::new(call, e))?;

        serde_json::from_str(&content).map_err(|e| {
            warn!("Profile rewrite returned unparseable content: {}", e);
            EnhanceError::new(call, EnhanceFailure::Malformed(e))
        })
    }

    async fn write_cover_letter(
        &self,
        credential: &str,
        profile: &UserProfile,
        job_description: &str,
    ) -> Result<String, EnhanceError> {
        let request = prompts::cover_letter_request(profile, job_description);
        self.client
            .complete(credential, &request)
            .await
            .map_err(|e| EnhanceError::new(GenerationCall::CoverLetter, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatRequest;
    use crate::validation::tests::minimal_profile;
    use async_trait::async_trait;

    /// Answers by inspecting the temperature: only the letter request sets one.
    struct Scripted {
        profile: Result<String, u16>,
        letter: Result<String, u16>,
    }

    #[async_trait]
    impl ChatClient for Scripted {
        async fn complete(&self, _credential: &str, request: &ChatRequest) -> Result<String, ChatError> {
            let answer = if request.temperature.is_some() {
                &self.letter
            } else {
                &self.profile
            };
            answer.clone().map_err(|status| ChatError::Api {
                status,
                message: "boom".to_string(),
            })
        }
    }

    fn profile_json() -> String {
        let mut enhanced = minimal_profile();
        enhanced.experience[0].description = "Led compiler work used by 10k programmers".to_string();
        serde_json::to_string(&enhanced).unwrap()
    }

    #[tokio::test]
    async fn test_both_succeed() {
        let enhancer = Enhancer::new(Scripted {
            profile: Ok(profile_json()),
            letter: Ok("Dear Acme,".to_string()),
        });
        let result = enhancer
            .enhance("sk-test", &minimal_profile(), "Senior Backend Engineer at Acme")
            .await
            .unwrap();

        assert_eq!(result.cover_letter, "Dear Acme,");
        assert_eq!(
            result.enhanced_profile.experience[0].description,
            "Led compiler work used by 10k programmers"
        );
    }

    #[tokio::test]
    async fn test_letter_failure_fails_everything() {
        let enhancer = Enhancer::new(Scripted {
            profile: Ok(profile_json()),
            letter: Err(500),
        });
        let err = enhancer
            .enhance("sk-test", &minimal_profile(), "job")
            .await
            .unwrap_err();
        assert_eq!(err.call, GenerationCall::CoverLetter);
        assert!(matches!(err.failure, EnhanceFailure::Remote(ChatError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_invalid_profile_json_is_malformed() {
        let enhancer = Enhancer::new(Scripted {
            profile: Ok("Sure! Here is your profile: {".to_string()),
            letter: Ok("Dear Acme,".to_string()),
        });
        let err = enhancer
            .enhance("sk-test", &minimal_profile(), "job")
            .await
            .unwrap_err();
        assert_eq!(err.call, GenerationCall::ProfileRewrite);
        assert!(matches!(err.failure, EnhanceFailure::Malformed(_)));
        assert!(err.to_string().starts_with("profile rewrite request failed"));
    }

    #[tokio::test]
    async fn test_missing_required_fields_is_malformed() {
        let enhancer = Enhancer::new(Scripted {
            profile: Ok(r#"{"fullName": "Grace Hopper"}"#.to_string()),
            letter: Ok("Dear Acme,".to_string()),
        });
        let err = enhancer
            .enhance("sk-test", &minimal_profile(), "job")
            .await
            .unwrap_err();
        assert!(matches!(err.failure, EnhanceFailure::Malformed(_)));
    }
}
