// src/validation.rs
//! Field-level checks run before anything is saved or sent to the model

use std::fmt;

use thiserror::Error;
use validator::ValidateEmail;

use crate::types::UserProfile;

/// Form field name of the job description input.
pub const JOB_DESCRIPTION_FIELD: &str = "jobDesc";
/// Form field name of the API key input.
pub const CREDENTIAL_FIELD: &str = "userGPTKey";

const REQUIRED: &str = "Required";
const INVALID_EMAIL: &str = "Invalid email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors of one submission. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid field(s): {}", .0.len(), summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn single(field: &str, message: &str) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Message attached to `field`, if that field failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

pub fn validate_job_description(job_description: &str) -> Result<(), ValidationErrors> {
    if job_description.is_empty() {
        return Err(ValidationErrors::single(JOB_DESCRIPTION_FIELD, REQUIRED));
    }
    Ok(())
}

pub fn validate_credential(credential: &str) -> Result<(), ValidationErrors> {
    if credential.is_empty() {
        return Err(ValidationErrors::single(CREDENTIAL_FIELD, REQUIRED));
    }
    Ok(())
}

/// Presence rules for the whole profile plus the email format.
///
/// Date ordering is not checked.
pub fn validate_profile(profile: &UserProfile) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();

    errors.require("fullName", &profile.full_name);
    if profile.email.is_empty() {
        errors.push("email", REQUIRED);
    } else if !profile.email.validate_email() {
        errors.push("email", INVALID_EMAIL);
    }
    errors.require("phone", &profile.phone);
    errors.require("jobTitle", &profile.job_title);
    errors.require("address", &profile.address);

    if profile.experience.is_empty() {
        errors.push("experience", "At least one experience is required");
    }
    for (i, exp) in profile.experience.iter().enumerate() {
        let prefix = format!("experience.{i}");
        errors.require(&format!("{prefix}.company"), &exp.company);
        errors.require(&format!("{prefix}.location"), &exp.location);
        errors.require(&format!("{prefix}.position"), &exp.position);
        errors.require(&format!("{prefix}.startDate"), &exp.start_date);
        errors.require(&format!("{prefix}.endDate"), &exp.end_date);
        errors.require(&format!("{prefix}.description"), &exp.description);
    }

    for (i, edu) in profile.education().iter().enumerate() {
        let prefix = format!("education.{i}");
        errors.require(&format!("{prefix}.school"), &edu.school);
        errors.require(&format!("{prefix}.location"), &edu.location);
        errors.require(&format!("{prefix}.graduationDate"), &edu.graduation_date);
        errors.require(&format!("{prefix}.major"), &edu.major);
        errors.require(&format!("{prefix}.GPA"), &edu.gpa);
        errors.require(&format!("{prefix}.description"), &edu.description);
    }
    for (i, cert) in profile.certifications().iter().enumerate() {
        errors.require(&format!("certifications.{i}.name"), &cert.name);
        errors.require(&format!("certifications.{i}.description"), &cert.description);
    }
    for (i, skill) in profile.skills().iter().enumerate() {
        errors.require(&format!("skills.{i}.name"), &skill.name);
    }
    for (i, lang) in profile.languages().iter().enumerate() {
        errors.require(&format!("languages.{i}.name"), &lang.name);
        errors.require(&format!("languages.{i}.proficiency"), &lang.proficiency);
    }
    for (i, interest) in profile.interests().iter().enumerate() {
        errors.require(&format!("interests.{i}.name"), &interest.name);
    }

    errors.finish()
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    fn require(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.push(field, REQUIRED);
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{Experience, Language, Skill};

    pub(crate) fn minimal_profile() -> UserProfile {
        UserProfile {
            full_name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: "555-0100".to_string(),
            job_title: "Backend Engineer".to_string(),
            address: "1 Navy Yard".to_string(),
            experience: vec![Experience {
                company: "UNIVAC".to_string(),
                location: "Philadelphia".to_string(),
                position: "Engineer".to_string(),
                start_date: "1949-01-01".to_string(),
                end_date: "1967-01-01".to_string(),
                description: "Built the first compiler".to_string(),
            }],
            education: None,
            certifications: None,
            skills: Some(vec![Skill {
                name: "COBOL".to_string(),
            }]),
            languages: Some(vec![Language {
                name: "English".to_string(),
                proficiency: "Native".to_string(),
            }]),
            interests: Some(vec![]),
        }
    }

    #[test]
    fn test_empty_job_description_is_rejected() {
        let err = validate_job_description("").unwrap_err();
        assert_eq!(err.fields().len(), 1);
        assert_eq!(err.message_for(JOB_DESCRIPTION_FIELD), Some(REQUIRED));
        assert!(validate_job_description("Senior Backend Engineer at Acme").is_ok());
    }

    #[test]
    fn test_empty_credential_is_rejected() {
        assert!(validate_credential("").is_err());
        assert!(validate_credential("sk-test").is_ok());
    }

    #[test]
    fn test_minimal_profile_is_valid() {
        assert!(validate_profile(&minimal_profile()).is_ok());
    }

    #[test]
    fn test_blank_profile_reports_each_field_once() {
        let err = validate_profile(&UserProfile::blank()).unwrap_err();
        let fields: Vec<&str> = err.fields().iter().map(|e| e.field.as_str()).collect();

        assert!(fields.contains(&"fullName"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"experience.0.company"));
        assert!(fields.contains(&"languages.1.proficiency"));
        let email_count = fields.iter().filter(|f| **f == "email").count();
        assert_eq!(email_count, 1);
    }

    #[test]
    fn test_email_format() {
        let mut profile = minimal_profile();
        profile.email = "not-an-email".to_string();
        let err = validate_profile(&profile).unwrap_err();
        assert_eq!(err.message_for("email"), Some(INVALID_EMAIL));
        assert_eq!(err.fields().len(), 1);
    }

    #[test]
    fn test_experience_required() {
        let mut profile = minimal_profile();
        profile.experience.clear();
        let err = validate_profile(&profile).unwrap_err();
        assert!(err.message_for("experience").is_some());
    }

    #[test]
    fn test_date_order_not_enforced() {
        let mut profile = minimal_profile();
        profile.experience[0].start_date = "2030-01-01".to_string();
        profile.experience[0].end_date = "2001-01-01".to_string();
        assert!(validate_profile(&profile).is_ok());
    }
}
