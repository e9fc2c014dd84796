// src/dialog.rs
//! Interactive profile and API key editor

use std::fmt;

use anyhow::Result;
use colored::Colorize;
use inquire::{Password, PasswordDisplayMode, Select, Text};

use crate::form::{CredentialForm, FieldPath, ProfileForm, Section};
use crate::orchestrator::Session;
use crate::validation::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    EditField,
    AddEntry,
    RemoveEntry,
    SetApiKey,
    Save,
    Cancel,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::EditField,
        Action::AddEntry,
        Action::RemoveEntry,
        Action::SetApiKey,
        Action::Save,
        Action::Cancel,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EditField => "edit field",
            Self::AddEntry => "add entry",
            Self::RemoveEntry => "remove entry",
            Self::SetApiKey => "set OpenAI API key",
            Self::Save => "save profile",
            Self::Cancel => "cancel",
        };
        f.write_str(label)
    }
}

/// A select option that shows some text but carries a value.
struct Labeled<T> {
    label: String,
    value: T,
}

impl<T> fmt::Display for Labeled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Runs until the profile is saved or the dialog is cancelled.
/// Nothing is written until "save profile" passes validation.
pub fn run(session: &mut Session) -> Result<()> {
    let mut form = ProfileForm::new(session.persisted_profile().clone());

    loop {
        let action = Select::new(&"Configuration".blue().to_string(), Action::ALL.to_vec()).prompt()?;

        match action {
            Action::EditField => edit_field(&mut form)?,
            Action::AddEntry => {
                let section = pick_section()?;
                form.add(section);
                println!(
                    "{}",
                    format!("added {} {}", section, form.len(section)).green()
                );
            }
            Action::RemoveEntry => remove_entry(&mut form)?,
            Action::SetApiKey => set_api_key(session)?,
            Action::Save => match session.save_profile_form(&form) {
                Ok(()) => {
                    println!("{}", "profile saved".green());
                    return Ok(());
                }
                Err(errors) => print_field_errors(&errors),
            },
            Action::Cancel => {
                println!("{}", "closed without saving".yellow());
                return Ok(());
            }
        }
    }
}

fn edit_field(form: &mut ProfileForm) -> Result<()> {
    let options: Vec<Labeled<FieldPath>> = form
        .paths()
        .into_iter()
        .map(|path| {
            let current = form.get(&path).unwrap_or_default();
            Labeled {
                label: format!("{path} = {}", preview(current)),
                value: path,
            }
        })
        .collect();

    let choice = Select::new("field", options).with_page_size(15).prompt()?;
    let current = form.get(&choice.value)?.to_string();
    let value = Text::new(&choice.value.to_string())
        .with_default(&current)
        .prompt()?;
    form.set(&choice.value, value)?;
    Ok(())
}

fn remove_entry(form: &mut ProfileForm) -> Result<()> {
    let section = pick_section()?;
    let len = form.len(section);
    if len == 0 {
        println!("{}", format!("{section} is empty").yellow());
        return Ok(());
    }

    let first_field = section.fields()[0];
    let options: Vec<Labeled<usize>> = (0..len)
        .map(|index| {
            let path = FieldPath::Entry {
                section,
                index,
                field: first_field,
            };
            Labeled {
                label: format!("{} {}: {}", section, index + 1, preview(form.get(&path).unwrap_or_default())),
                value: index,
            }
        })
        .collect();

    let choice = Select::new("entry to remove", options).prompt()?;
    form.remove(section, choice.value)?;
    println!("{}", format!("removed {} {}", section, choice.value + 1).green());
    Ok(())
}

fn set_api_key(session: &mut Session) -> Result<()> {
    let key = Password::new("OpenAI API key")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;

    match session.save_credential_form(&CredentialForm::new(key)) {
        Ok(()) => println!("{}", "API key saved".green()),
        Err(errors) => print_field_errors(&errors),
    }
    Ok(())
}

fn pick_section() -> Result<Section> {
    Ok(Select::new("section", Section::ALL.to_vec()).prompt()?)
}

pub fn print_field_errors(errors: &ValidationErrors) {
    for error in errors.fields() {
        println!("{} {}", format!("{}:", error.field).red(), error.message);
    }
}

fn preview(value: &str) -> String {
    const MAX: usize = 40;
    if value.is_empty() {
        return "<empty>".to_string();
    }
    let mut short: String = value.chars().take(MAX).collect();
    if value.chars().count() > MAX {
        short.push('…');
    }
    short.replace('\n', " ")
}
