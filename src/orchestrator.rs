// src/orchestrator.rs
//! Screen session: persisted profile, transient generation result, request state

use std::fmt;
use std::future::Future;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::ChatClient;
use crate::enhancer::{EnhanceError, Enhancer};
use crate::form::{CredentialForm, ProfileForm};
use crate::store::ProfileStore;
use crate::types::{GenerationResult, UserProfile};
use crate::validation::{self, ValidationErrors};

pub const FAILURE_TITLE: &str = "Something went wrong!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error("Missing OpenAI API key")]
    MissingCredential,
    #[error("a generation request is already running")]
    AlreadyPending,
    #[error("Something went wrong! {0}")]
    Failed(String),
}

/// Fixed number of extra attempts after the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { retries: 1 }
    }
}

impl RetryPolicy {
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!("Attempt {} failed, retrying: {}", attempt, e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Inputs captured when a request starts; the session stays pending until
/// the matching `complete_generation`.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub id: Uuid,
    pub credential: String,
    pub profile: UserProfile,
    pub job_description: String,
}

pub struct Session {
    store: ProfileStore,
    profile: UserProfile,
    credential: String,
    job_description: String,
    state: RequestState,
    result: Option<GenerationResult>,
    notifications: Vec<Notification>,
    retry: RetryPolicy,
}

impl Session {
    /// Loads the profile and credential once for this session.
    pub fn open(mut store: ProfileStore) -> Self {
        let loaded = store.load();
        let mut notifications = Vec::new();
        if let Some(failure) = store.take_unreported_failure() {
            notifications.push(Notification {
                level: Level::Warning,
                title: "Profile storage unavailable".to_string(),
                description: format!("Changes are kept in memory only. {failure}"),
            });
        }

        Self {
            store,
            profile: loaded.profile,
            credential: loaded.credential,
            job_description: String::new(),
            state: RequestState::Idle,
            result: None,
            notifications,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn persisted_profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    /// Latest generated profile if there is one, else the stored profile.
    pub fn active_profile(&self) -> &UserProfile {
        self.result
            .as_ref()
            .map(|r| &r.enhanced_profile)
            .unwrap_or(&self.profile)
    }

    pub fn cover_letter(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.cover_letter.as_str())
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    pub fn can_generate(&self) -> bool {
        self.state == RequestState::Idle
            && !self.credential.is_empty()
            && validation::validate_job_description(&self.job_description).is_ok()
    }

    /// Caption of the generate control.
    pub fn generate_label(&self) -> &'static str {
        if self.credential.is_empty() {
            "Missing OpenAI API key"
        } else if self.state == RequestState::Pending {
            "Generating..."
        } else {
            "Generate"
        }
    }

    pub fn begin_generation(&mut self) -> Result<GenerationTicket, SubmitError> {
        validation::validate_job_description(&self.job_description)?;
        if self.credential.is_empty() {
            return Err(SubmitError::MissingCredential);
        }
        if self.state == RequestState::Pending {
            return Err(SubmitError::AlreadyPending);
        }

        self.state = RequestState::Pending;
        let ticket = GenerationTicket {
            id: Uuid::new_v4(),
            credential: self.credential.clone(),
            profile: self.profile.clone(),
            job_description: self.job_description.clone(),
        };
        info!("Generation {} started", ticket.id);
        Ok(ticket)
    }

    /// Back to idle. A failure leaves the previous result in place.
    pub fn complete_generation(
        &mut self,
        ticket: &GenerationTicket,
        outcome: Result<GenerationResult, EnhanceError>,
    ) -> Result<(), SubmitError> {
        self.state = RequestState::Idle;
        match outcome {
            Ok(result) => {
                info!("Generation {} succeeded", ticket.id);
                self.result = Some(result);
                Ok(())
            }
            Err(e) => {
                error!("Generation {} failed: {}", ticket.id, e);
                let description = e.to_string();
                self.notifications.push(Notification {
                    level: Level::Error,
                    title: FAILURE_TITLE.to_string(),
                    description: description.clone(),
                });
                Err(SubmitError::Failed(description))
            }
        }
    }

    /// Full request cycle, retrying per the session's policy.
    pub async fn generate<C: ChatClient>(&mut self, enhancer: &Enhancer<C>) -> Result<(), SubmitError> {
        let ticket = self.begin_generation()?;
        let request = &ticket;
        let outcome = self
            .retry
            .run(move || {
                enhancer.enhance(&request.credential, &request.profile, &request.job_description)
            })
            .await;
        self.complete_generation(&ticket, outcome)
    }

    /// Replaces the stored profile with the validated form contents.
    pub fn save_profile_form(&mut self, form: &ProfileForm) -> Result<(), ValidationErrors> {
        let profile = form.submit()?;
        self.store.save_profile(&profile);
        self.profile = profile;
        self.report_storage_failure();
        info!("Profile saved");
        Ok(())
    }

    pub fn save_credential_form(&mut self, form: &CredentialForm) -> Result<(), ValidationErrors> {
        let credential = form.submit()?;
        self.store.save_credential(&credential);
        self.credential = credential;
        self.report_storage_failure();
        info!("API key saved");
        Ok(())
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn report_storage_failure(&mut self) {
        if let Some(failure) = self.store.take_unreported_failure() {
            self.notifications.push(Notification {
                level: Level::Warning,
                title: "Profile storage unavailable".to_string(),
                description: format!("Changes are kept in memory only. {failure}"),
            });
        }
    }
}
