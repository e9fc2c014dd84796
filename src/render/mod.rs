// src/render/mod.rs
//! Document layout of a profile, independent of the output format

pub mod pdf;
pub mod text;
pub mod typst;

use chrono::NaiveDate;

use crate::types::UserProfile;

pub use pdf::TypstCompiler;

/// Two-column resume layout: main column about 70%, side column 30%.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub name: String,
    pub job_title: String,
    pub contact: Vec<String>,
    pub main: Vec<Section>,
    pub side: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub entries: Vec<Entry>,
}

/// One entry; side-column entries only use `title`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub title: String,
    pub subtitle: String,
    pub detail: Option<String>,
    pub body: Option<String>,
}

impl Entry {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            title: text.into(),
            ..Self::default()
        }
    }
}

impl DocumentView {
    /// Entries keep their stored order. Empty sections are left out.
    pub fn from_profile(profile: &UserProfile) -> Self {
        let experience = profile
            .experience
            .iter()
            .map(|exp| Entry {
                title: exp.company.clone(),
                subtitle: format!(", {} — {}", exp.position, exp.location),
                detail: Some(format!(
                    "{} - {}",
                    display_date(&exp.start_date),
                    display_date(&exp.end_date)
                )),
                body: Some(exp.description.clone()),
            })
            .collect();

        let education = profile
            .education()
            .iter()
            .map(|edu| Entry {
                title: edu.school.clone(),
                subtitle: format!(", {} — {}", edu.location, edu.major),
                detail: Some(format!(
                    "Graduated at {} with {} GPA",
                    display_date(&edu.graduation_date),
                    edu.gpa
                )),
                body: Some(edu.description.clone()),
            })
            .collect();

        let certifications = profile
            .certifications()
            .iter()
            .map(|cert| Entry {
                title: cert.name.clone(),
                body: Some(cert.description.clone()),
                ..Entry::default()
            })
            .collect();

        let skills = profile
            .skills()
            .iter()
            .map(|s| Entry::plain(&s.name))
            .collect();
        let languages = profile
            .languages()
            .iter()
            .map(|l| Entry::plain(format!("{} ({})", l.name, l.proficiency)))
            .collect();
        let interests = profile
            .interests()
            .iter()
            .map(|i| Entry::plain(&i.name))
            .collect();

        Self {
            name: profile.full_name.clone(),
            job_title: profile.job_title.clone(),
            contact: vec![
                profile.address.clone(),
                profile.phone.clone(),
                profile.email.clone(),
            ],
            main: non_empty(vec![
                ("EXPERIENCE", experience),
                ("EDUCATION", education),
                ("CERTIFICATIONS", certifications),
            ]),
            side: non_empty(vec![
                ("SKILLS", skills),
                ("LANGUAGES", languages),
                ("INTERESTS", interests),
            ]),
        }
    }

    pub fn headings(&self) -> Vec<&'static str> {
        self.main
            .iter()
            .chain(self.side.iter())
            .map(|s| s.heading)
            .collect()
    }
}

fn non_empty(sections: Vec<(&'static str, Vec<Entry>)>) -> Vec<Section> {
    sections
        .into_iter()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(heading, entries)| Section { heading, entries })
        .collect()
}

/// `2021-01-01` becomes `01 January 2021`; anything unparseable is shown as typed.
pub fn display_date(raw: &str) -> String {
    let candidate = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .map(|date| date.format("%d %B %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::minimal_profile;

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2021-01-01"), "01 January 2021");
        assert_eq!(display_date("2019-03-15T00:00:00Z"), "15 March 2019");
        assert_eq!(display_date("Present"), "Present");
        assert_eq!(display_date(""), "");
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let view = DocumentView::from_profile(&minimal_profile());
        assert_eq!(view.headings(), vec!["EXPERIENCE", "SKILLS", "LANGUAGES"]);
    }

    #[test]
    fn test_blank_profile_keeps_placeholder_sections() {
        let view = DocumentView::from_profile(&UserProfile::blank());
        assert_eq!(
            view.headings(),
            vec![
                "EXPERIENCE",
                "EDUCATION",
                "CERTIFICATIONS",
                "SKILLS",
                "LANGUAGES",
                "INTERESTS"
            ]
        );
    }

    #[test]
    fn test_experience_order_is_preserved() {
        let mut profile = minimal_profile();
        let mut older = profile.experience[0].clone();
        older.company = "Harvard".to_string();
        profile.experience.push(older);

        let view = DocumentView::from_profile(&profile);
        let companies: Vec<&str> = view.main[0].entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(companies, vec!["UNIVAC", "Harvard"]);
        assert_eq!(view.main[0].entries[0].subtitle, ", Engineer — Philadelphia");
        assert_eq!(
            view.main[0].entries[0].detail.as_deref(),
            Some("01 January 1949 - 01 January 1967")
        );
    }

    #[test]
    fn test_language_shows_proficiency() {
        let view = DocumentView::from_profile(&minimal_profile());
        let languages = view.side.iter().find(|s| s.heading == "LANGUAGES").unwrap();
        assert_eq!(languages.entries[0].title, "English (Native)");
    }
}
