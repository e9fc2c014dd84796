// src/prompts.rs
//! Prompt construction for the profile rewrite and the cover letter

use anyhow::{Context, Result};
use serde_json::json;

use crate::types::{ChatMessage, ChatRequest, UserProfile};

pub const MODEL: &str = "gpt-4-turbo";
pub const COVER_LETTER_TEMPERATURE: f32 = 0.7;

/// Rewrite request. Uses the model's default sampling.
pub fn profile_rewrite_request(profile: &UserProfile, job_description: &str) -> Result<ChatRequest> {
    let current = serde_json::to_string_pretty(profile).context("Failed to serialize profile")?;
    let example = serde_json::to_string_pretty(&example_profile())
        .context("Failed to serialize example profile")?;

    let system = format!(
        r#"Your task is to enhance the user's resume information for the job description below.

1. Experience descriptions:
  - Align every existing experience entry with the job requirements
  - Emphasize relevant skills and achievements
  - Use action verbs and quantify accomplishments where possible
  - Keep all existing experience entries

2. Skills and interests:
  - Add skills that the job description asks for
  - Add interests that fit the company culture or industry

3. Education and certifications:
  - Highlight relevant coursework or projects
  - Add missing certifications that match the job requirements

4. Data integrity:
  - Keep the existing JSON structure
  - Never remove existing fields or experience entries
  - Only change content inside existing fields, and add skills or interests as needed

5. Input:
  - Current user information: {current}
  - Job description: {job_description}

6. Output format:
  - Return the updated user information as JSON
  - Return nothing but the JSON document: no prose, no markdown fences. It is parsed as-is.

7. Style:
  - Use the industry terminology of the job description
  - Match the company's tone and values
  - Keep every addition realistic and consistent with the user's background

8. Example output structure:
{example}"#
    );

    Ok(ChatRequest {
        model: MODEL.to_string(),
        messages: vec![ChatMessage::system(system), ChatMessage::user(job_description)],
        temperature: None,
    })
}

/// Cover letter request with fixed model and temperature.
pub fn cover_letter_request(profile: &UserProfile, job_description: &str) -> ChatRequest {
    let system = format!(
        r#"You are a career assistant who writes compelling cover letters. Write a professional, personalized cover letter for the job in the user's message, based on the user information below.

1. Structure:
  - Opening paragraph: introduce the candidate and show enthusiasm for the role.
  - Two or three body paragraphs: relevant skills, experience and qualifications.
  - Closing paragraph: restate interest, ask for an interview, give contact details.

2. Content:
  - Tie the candidate's experience to the job requirements with concrete examples.
  - Emphasize achievements and measurable results.
  - Show knowledge of the company and its industry.

3. Tone:
  - Formal and professional throughout.
  - Active voice and strong verbs.
  - Language that fits the company's culture.

4. Customization:
  - Address a specific person if the job description names one.
  - Mention referrals or mutual connections found in the user information.
  - Work keywords from the job description in naturally.

5. Format:
  - Between 250 and 400 words.
  - Standard business letter layout: greeting, body, closing.
  - Include the date, company address and recipient name or title when known.

User information:
{}
Connect the candidate's experience to this specific role. Avoid generic statements; build a narrative around what this candidate uniquely brings to this company."#,
        profile_summary(profile)
    );

    ChatRequest {
        model: MODEL.to_string(),
        messages: vec![ChatMessage::system(system), ChatMessage::user(job_description)],
        temperature: Some(COVER_LETTER_TEMPERATURE),
    }
}

/// Labelled plain-text view of the profile for the letter prompt.
pub fn profile_summary(profile: &UserProfile) -> String {
    let mut out = String::new();
    out.push_str(&format!("Name: {}\n", profile.full_name));
    out.push_str(&format!("Email: {}\n", profile.email));
    out.push_str(&format!("Phone: {}\n", profile.phone));
    out.push_str(&format!("Job Title: {}\n", profile.job_title));
    out.push_str(&format!("Address: {}\n", profile.address));

    out.push_str("Experience:\n");
    for exp in &profile.experience {
        out.push_str(&format!("  - Company: {}\n", exp.company));
        out.push_str(&format!("    Location: {}\n", exp.location));
        out.push_str(&format!("    Position: {}\n", exp.position));
        out.push_str(&format!("    Dates: {} to {}\n", exp.start_date, exp.end_date));
        out.push_str(&format!("    Description: {}\n", exp.description));
    }

    out.push_str("Education:\n");
    for edu in profile.education() {
        out.push_str(&format!("  - School: {}\n", edu.school));
        out.push_str(&format!("    Location: {}\n", edu.location));
        out.push_str(&format!("    Graduation Date: {}\n", edu.graduation_date));
        out.push_str(&format!("    Major: {}\n", edu.major));
        out.push_str(&format!("    GPA: {}\n", edu.gpa));
    }

    let skills: Vec<&str> = profile.skills().iter().map(|s| s.name.as_str()).collect();
    out.push_str(&format!("Skills: {}\n", skills.join(", ")));

    out.push_str("Languages:\n");
    for lang in profile.languages() {
        out.push_str(&format!("  - Language: {} ({})\n", lang.name, lang.proficiency));
    }

    let interests: Vec<&str> = profile.interests().iter().map(|i| i.name.as_str()).collect();
    out.push_str(&format!("Interests: {}\n", interests.join(", ")));

    out.push_str("Certifications:\n");
    for cert in profile.certifications() {
        out.push_str(&format!("  - Name: {}\n", cert.name));
        out.push_str(&format!("    Description: {}\n", cert.description));
    }

    out
}

fn example_profile() -> serde_json::Value {
    json!({
        "fullName": "John Doe",
        "email": "john.doe@example.com",
        "phone": "555-1234",
        "jobTitle": "Software Engineer",
        "address": "123 Main Street",
        "experience": [{
            "company": "TechCorp",
            "location": "New York, NY",
            "position": "Backend Developer",
            "startDate": "2019-01-01",
            "endDate": "2021-01-01",
            "description": "Implemented a scalable microservices architecture, improving system performance by 30%..."
        }],
        "education": [{
            "school": "State University",
            "location": "New York, NY",
            "graduationDate": "2021-01-01",
            "major": "Computer Science",
            "GPA": "3.8",
            "description": "Coursework in algorithms, data structures and software engineering..."
        }],
        "skills": [{ "name": "JavaScript" }],
        "languages": [{ "name": "English", "proficiency": "Fluent" }],
        "interests": [{ "name": "Programming" }],
        "certifications": [{
            "name": "AWS Certified Developer",
            "description": "Associate level certification for developing on AWS"
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use crate::validation::tests::minimal_profile;

    const JOB: &str = "Senior Backend Engineer at Acme";

    #[test]
    fn test_rewrite_request_embeds_profile_json_and_job() {
        let request = profile_rewrite_request(&minimal_profile(), JOB).unwrap();

        assert_eq!(request.model, MODEL);
        assert!(request.temperature.is_none());
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.contains("\"fullName\": \"Grace Hopper\""));
        assert!(request.messages[0].content.contains(JOB));
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, JOB);
    }

    #[test]
    fn test_example_structure_is_a_valid_profile() {
        let parsed: UserProfile = serde_json::from_value(example_profile()).unwrap();
        assert_eq!(parsed.experience.len(), 1);
        assert_eq!(parsed.education()[0].gpa, "3.8");
    }

    #[test]
    fn test_cover_letter_request_fixed_sampling() {
        let request = cover_letter_request(&minimal_profile(), JOB);

        assert_eq!(request.model, MODEL);
        assert_eq!(request.temperature, Some(COVER_LETTER_TEMPERATURE));
        assert!(request.messages[0].content.contains("250 and 400 words"));
        assert!(request.messages[0].content.contains("Name: Grace Hopper"));
        assert_eq!(request.messages[1].content, JOB);
    }

    #[test]
    fn test_profile_summary_lists_skill_names() {
        let summary = profile_summary(&minimal_profile());
        assert!(summary.contains("Skills: COBOL"));
        assert!(summary.contains("Language: English (Native)"));
        assert!(summary.contains("Dates: 1949-01-01 to 1967-01-01"));
    }
}
