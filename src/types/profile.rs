// src/types/profile.rs
//! User profile record shared by the store, the forms, the prompts and the renderers

use serde::{Deserialize, Serialize};

// ===== Profile Structure =====

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub job_title: String,
    pub address: String,
    pub experience: Vec<Experience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<Certification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Language>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<Interest>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub location: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub school: String,
    pub location: String,
    pub graduation_date: String,
    pub major: String,
    #[serde(rename = "GPA")]
    pub gpa: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Interest {
    pub name: String,
}

impl UserProfile {
    /// Placeholder profile used before anything has been saved.
    ///
    /// Every repeatable section starts with blank rows so the editing form has
    /// something to fill in; languages start with two.
    pub fn blank() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            job_title: String::new(),
            address: String::new(),
            experience: vec![Experience::default()],
            education: Some(vec![Education::default()]),
            certifications: Some(vec![Certification::default()]),
            skills: Some(vec![Skill::default()]),
            languages: Some(vec![Language::default(), Language::default()]),
            interests: Some(vec![Interest::default()]),
        }
    }

    pub fn education(&self) -> &[Education] {
        self.education.as_deref().unwrap_or_default()
    }

    pub fn certifications(&self) -> &[Certification] {
        self.certifications.as_deref().unwrap_or_default()
    }

    pub fn skills(&self) -> &[Skill] {
        self.skills.as_deref().unwrap_or_default()
    }

    pub fn languages(&self) -> &[Language] {
        self.languages.as_deref().unwrap_or_default()
    }

    pub fn interests(&self) -> &[Interest] {
        self.interests.as_deref().unwrap_or_default()
    }
}

/// Output of one successful generation request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub enhanced_profile: UserProfile,
    pub cover_letter: String,
}
