// src/form.rs
//! Editable working copies behind the profile and API key dialogs

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{
    Certification, Education, Experience, Interest, Language, Skill, UserProfile,
};
use crate::validation::{self, ValidationErrors};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown section '{0}'")]
    UnknownSection(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("{section} has no entry {index} (it has {len})")]
    OutOfRange {
        section: Section,
        index: usize,
        len: usize,
    },
}

/// Repeatable sections of the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Experience,
    Education,
    Languages,
    Certifications,
    Skills,
    Interests,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Experience,
        Section::Education,
        Section::Languages,
        Section::Certifications,
        Section::Skills,
        Section::Interests,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Languages => "languages",
            Self::Certifications => "certifications",
            Self::Skills => "skills",
            Self::Interests => "interests",
        }
    }

    /// Field names of one entry, in form order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Experience => &[
                "company",
                "location",
                "position",
                "startDate",
                "endDate",
                "description",
            ],
            Self::Education => &[
                "school",
                "location",
                "graduationDate",
                "major",
                "GPA",
                "description",
            ],
            Self::Languages => &["name", "proficiency"],
            Self::Certifications => &["name", "description"],
            Self::Skills | Self::Interests => &["name"],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormError::UnknownSection(s.to_string()))
    }
}

pub const SCALAR_FIELDS: [&str; 5] = ["fullName", "email", "phone", "jobTitle", "address"];

/// A single editable value, written the way validation reports it:
/// `email` or `experience.0.company`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Scalar(&'static str),
    Entry {
        section: Section,
        index: usize,
        field: &'static str,
    },
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => f.write_str(name),
            Self::Entry {
                section,
                index,
                field,
            } => write!(f, "{section}.{index}.{field}"),
        }
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || FormError::UnknownField(s.to_string());
        let parts: Vec<&str> = s.split('.').collect();

        match parts.as_slice() {
            [name] => SCALAR_FIELDS
                .into_iter()
                .find(|field| field == name)
                .map(FieldPath::Scalar)
                .ok_or_else(unknown),
            [section, index, field] => {
                let section: Section = section.parse()?;
                let index = index.parse().map_err(|_| unknown())?;
                let field = section
                    .fields()
                    .iter()
                    .copied()
                    .find(|f| f == field)
                    .ok_or_else(unknown)?;
                Ok(FieldPath::Entry {
                    section,
                    index,
                    field,
                })
            }
            _ => Err(unknown()),
        }
    }
}

// ===== Profile Form =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    values: UserProfile,
}

impl ProfileForm {
    pub fn new(profile: UserProfile) -> Self {
        Self { values: profile }
    }

    pub fn values(&self) -> &UserProfile {
        &self.values
    }

    pub fn len(&self, section: Section) -> usize {
        match section {
            Section::Experience => self.values.experience.len(),
            Section::Education => self.values.education().len(),
            Section::Languages => self.values.languages().len(),
            Section::Certifications => self.values.certifications().len(),
            Section::Skills => self.values.skills().len(),
            Section::Interests => self.values.interests().len(),
        }
    }

    /// Every editable field of the working copy, in form order.
    pub fn paths(&self) -> Vec<FieldPath> {
        let mut paths: Vec<FieldPath> = SCALAR_FIELDS.into_iter().map(FieldPath::Scalar).collect();
        for section in Section::ALL {
            for index in 0..self.len(section) {
                for &field in section.fields() {
                    paths.push(FieldPath::Entry {
                        section,
                        index,
                        field,
                    });
                }
            }
        }
        paths
    }

    /// Appends a blank entry to the end of `section`.
    pub fn add(&mut self, section: Section) {
        let v = &mut self.values;
        match section {
            Section::Experience => v.experience.push(Experience::default()),
            Section::Education => push_optional(&mut v.education, Education::default()),
            Section::Languages => push_optional(&mut v.languages, Language::default()),
            Section::Certifications => {
                push_optional(&mut v.certifications, Certification::default())
            }
            Section::Skills => push_optional(&mut v.skills, Skill::default()),
            Section::Interests => push_optional(&mut v.interests, Interest::default()),
        }
    }

    /// Removes entry `index`; the remaining entries keep their content and order.
    pub fn remove(&mut self, section: Section, index: usize) -> Result<(), FormError> {
        let len = self.len(section);
        if index >= len {
            return Err(FormError::OutOfRange {
                section,
                index,
                len,
            });
        }

        let v = &mut self.values;
        match section {
            Section::Experience => {
                v.experience.remove(index);
            }
            Section::Education => remove_optional(&mut v.education, index),
            Section::Languages => remove_optional(&mut v.languages, index),
            Section::Certifications => remove_optional(&mut v.certifications, index),
            Section::Skills => remove_optional(&mut v.skills, index),
            Section::Interests => remove_optional(&mut v.interests, index),
        }
        Ok(())
    }

    pub fn get(&self, path: &FieldPath) -> Result<&str, FormError> {
        let v = &self.values;
        let value = match path {
            FieldPath::Scalar(name) => match *name {
                "fullName" => &v.full_name,
                "email" => &v.email,
                "phone" => &v.phone,
                "jobTitle" => &v.job_title,
                "address" => &v.address,
                _ => return Err(FormError::UnknownField(path.to_string())),
            },
            FieldPath::Entry {
                section,
                index,
                field,
            } => {
                let len = self.len(*section);
                let out_of_range = FormError::OutOfRange {
                    section: *section,
                    index: *index,
                    len,
                };
                match section {
                    Section::Experience => {
                        let e = v.experience.get(*index).ok_or(out_of_range)?;
                        experience_field(e, field)
                    }
                    Section::Education => {
                        let e = v.education().get(*index).ok_or(out_of_range)?;
                        education_field(e, field)
                    }
                    Section::Languages => {
                        let e = v.languages().get(*index).ok_or(out_of_range)?;
                        if *field == "name" {
                            Some(&e.name)
                        } else {
                            Some(&e.proficiency)
                        }
                    }
                    Section::Certifications => {
                        let e = v.certifications().get(*index).ok_or(out_of_range)?;
                        if *field == "name" {
                            Some(&e.name)
                        } else {
                            Some(&e.description)
                        }
                    }
                    Section::Skills => Some(&v.skills().get(*index).ok_or(out_of_range)?.name),
                    Section::Interests => {
                        Some(&v.interests().get(*index).ok_or(out_of_range)?.name)
                    }
                }
                .ok_or_else(|| FormError::UnknownField(path.to_string()))?
            }
        };
        Ok(value.as_str())
    }

    pub fn set(&mut self, path: &FieldPath, value: impl Into<String>) -> Result<(), FormError> {
        let slot = self.slot_mut(path)?;
        *slot = value.into();
        Ok(())
    }

    fn slot_mut(&mut self, path: &FieldPath) -> Result<&mut String, FormError> {
        let unknown = || FormError::UnknownField(path.to_string());
        let (section, index, field) = match path {
            FieldPath::Scalar(name) => {
                let v = &mut self.values;
                return match *name {
                    "fullName" => Ok(&mut v.full_name),
                    "email" => Ok(&mut v.email),
                    "phone" => Ok(&mut v.phone),
                    "jobTitle" => Ok(&mut v.job_title),
                    "address" => Ok(&mut v.address),
                    _ => Err(unknown()),
                };
            }
            FieldPath::Entry {
                section,
                index,
                field,
            } => (*section, *index, *field),
        };

        let len = self.len(section);
        let out_of_range = FormError::OutOfRange {
            section,
            index,
            len,
        };
        let v = &mut self.values;
        let slot = match section {
            Section::Experience => {
                let e = v.experience.get_mut(index).ok_or(out_of_range)?;
                match field {
                    "company" => Some(&mut e.company),
                    "location" => Some(&mut e.location),
                    "position" => Some(&mut e.position),
                    "startDate" => Some(&mut e.start_date),
                    "endDate" => Some(&mut e.end_date),
                    "description" => Some(&mut e.description),
                    _ => None,
                }
            }
            Section::Education => {
                let e = entry_mut(&mut v.education, index).ok_or(out_of_range)?;
                match field {
                    "school" => Some(&mut e.school),
                    "location" => Some(&mut e.location),
                    "graduationDate" => Some(&mut e.graduation_date),
                    "major" => Some(&mut e.major),
                    "GPA" => Some(&mut e.gpa),
                    "description" => Some(&mut e.description),
                    _ => None,
                }
            }
            Section::Languages => {
                let e = entry_mut(&mut v.languages, index).ok_or(out_of_range)?;
                match field {
                    "name" => Some(&mut e.name),
                    "proficiency" => Some(&mut e.proficiency),
                    _ => None,
                }
            }
            Section::Certifications => {
                let e = entry_mut(&mut v.certifications, index).ok_or(out_of_range)?;
                match field {
                    "name" => Some(&mut e.name),
                    "description" => Some(&mut e.description),
                    _ => None,
                }
            }
            Section::Skills => {
                let e = entry_mut(&mut v.skills, index).ok_or(out_of_range)?;
                (field == "name").then_some(&mut e.name)
            }
            Section::Interests => {
                let e = entry_mut(&mut v.interests, index).ok_or(out_of_range)?;
                (field == "name").then_some(&mut e.name)
            }
        };
        slot.ok_or_else(unknown)
    }

    /// Validated copy of the working profile, ready to replace the stored one.
    pub fn submit(&self) -> Result<UserProfile, ValidationErrors> {
        validation::validate_profile(&self.values)?;
        Ok(self.values.clone())
    }
}

fn experience_field<'a>(e: &'a Experience, field: &str) -> Option<&'a String> {
    match field {
        "company" => Some(&e.company),
        "location" => Some(&e.location),
        "position" => Some(&e.position),
        "startDate" => Some(&e.start_date),
        "endDate" => Some(&e.end_date),
        "description" => Some(&e.description),
        _ => None,
    }
}

fn education_field<'a>(e: &'a Education, field: &str) -> Option<&'a String> {
    match field {
        "school" => Some(&e.school),
        "location" => Some(&e.location),
        "graduationDate" => Some(&e.graduation_date),
        "major" => Some(&e.major),
        "GPA" => Some(&e.gpa),
        "description" => Some(&e.description),
        _ => None,
    }
}

fn push_optional<T>(section: &mut Option<Vec<T>>, entry: T) {
    section.get_or_insert_with(Vec::new).push(entry);
}

fn remove_optional<T>(section: &mut Option<Vec<T>>, index: usize) {
    if let Some(entries) = section {
        entries.remove(index);
    }
}

fn entry_mut<T>(section: &mut Option<Vec<T>>, index: usize) -> Option<&mut T> {
    section.as_mut().and_then(|entries| entries.get_mut(index))
}

// ===== Credential Form =====

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialForm {
    pub value: String,
}

impl CredentialForm {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn submit(&self) -> Result<String, ValidationErrors> {
        validation::validate_credential(&self.value)?;
        Ok(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::minimal_profile;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_field_paths() {
        assert_eq!(path("email"), FieldPath::Scalar("email"));
        assert_eq!(
            path("experience.2.startDate"),
            FieldPath::Entry {
                section: Section::Experience,
                index: 2,
                field: "startDate"
            }
        );
        assert_eq!(path("education.0.GPA").to_string(), "education.0.GPA");
        assert!("nickname".parse::<FieldPath>().is_err());
        assert!("skills.x.name".parse::<FieldPath>().is_err());
        assert!("skills.0.level".parse::<FieldPath>().is_err());
        assert!("hobbies.0.name".parse::<FieldPath>().is_err());
    }

    #[test]
    fn test_add_appends_blank_entry() {
        for section in Section::ALL {
            let mut form = ProfileForm::new(minimal_profile());
            let before = form.len(section);
            form.add(section);
            assert_eq!(form.len(section), before + 1, "{section}");

            for &field in section.fields() {
                let p = FieldPath::Entry {
                    section,
                    index: before,
                    field,
                };
                assert_eq!(form.get(&p).unwrap(), "", "{p}");
            }
        }
    }

    #[test]
    fn test_add_to_absent_section_creates_it() {
        let mut form = ProfileForm::new(minimal_profile());
        assert_eq!(form.len(Section::Education), 0);
        form.add(Section::Education);
        assert_eq!(form.values().education().len(), 1);
    }

    #[test]
    fn test_remove_keeps_other_entries_in_order() {
        let mut form = ProfileForm::new(minimal_profile());
        for name in ["Rust", "Go"] {
            form.add(Section::Skills);
            let last = form.len(Section::Skills) - 1;
            form.set(&path(&format!("skills.{last}.name")), name).unwrap();
        }
        assert_eq!(form.len(Section::Skills), 3);

        form.remove(Section::Skills, 1).unwrap();

        let names: Vec<&str> = form.values().skills().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["COBOL", "Go"]);
    }

    #[test]
    fn test_paths_cover_every_field() {
        let form = ProfileForm::new(UserProfile::blank());
        let paths = form.paths();
        // 5 scalars, 6 experience, 6 education, 2x2 languages, 2 certification, 1 skill, 1 interest
        assert_eq!(paths.len(), 5 + 6 + 6 + 4 + 2 + 1 + 1);
        for p in &paths {
            assert_eq!(form.get(p).unwrap(), "");
            assert_eq!(&p.to_string().parse::<FieldPath>().unwrap(), p);
        }
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut form = ProfileForm::new(minimal_profile());
        let err = form.remove(Section::Experience, 3).unwrap_err();
        assert_eq!(
            err,
            FormError::OutOfRange {
                section: Section::Experience,
                index: 3,
                len: 1
            }
        );
    }

    #[test]
    fn test_set_then_submit() {
        let mut form = ProfileForm::new(UserProfile::blank());
        assert!(form.submit().is_err());

        let mut form = ProfileForm::new(minimal_profile());
        form.set(&path("experience.0.company"), "Remington Rand").unwrap();
        let saved = form.submit().unwrap();
        assert_eq!(saved.experience[0].company, "Remington Rand");
    }

    #[test]
    fn test_set_out_of_range_entry() {
        let mut form = ProfileForm::new(minimal_profile());
        assert!(matches!(
            form.set(&path("languages.5.name"), "French"),
            Err(FormError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_credential_form() {
        assert!(CredentialForm::new("").submit().is_err());
        assert_eq!(CredentialForm::new("sk-test").submit().unwrap(), "sk-test");
    }
}
