// src/cli.rs
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};

use crate::core::{ConfigManager, FsOps, OpenAiClient};
use crate::dialog;
use crate::enhancer::Enhancer;
use crate::form::{CredentialForm, FieldPath, FormError, ProfileForm, Section};
use crate::orchestrator::{Level, Notification, Session, SubmitError};
use crate::render::{self, DocumentView, TypstCompiler};
use crate::store::{FileStore, ProfileStore};
use crate::types::UserProfile;
use crate::validation;

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Tailor your resume and draft a cover letter for a job description")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the stored profile and API key
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory generated documents are written to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the stored profile, API key state and whether generation is possible
    Status,
    /// Preview the stored profile as a document
    Show {
        /// Also write Typst markup to this file
        #[arg(long)]
        typst: Option<PathBuf>,
        /// Also compile a PDF to this file (needs the typst binary)
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
    /// Manage the OpenAI API key
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },
    /// Edit, import or export the stored profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Rewrite the profile for a job description and draft a cover letter
    Generate {
        /// Job description text
        #[arg(long, conflicts_with = "job_file", required_unless_present = "job_file")]
        job: Option<String>,
        /// Read the job description from a file
        #[arg(long)]
        job_file: Option<PathBuf>,
        /// Overrides --output-dir for this run
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Compile the tailored resume to PDF
        #[arg(long)]
        pdf: bool,
    },
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Store a new API key
    Set { key: String },
    /// Show the stored key, masked
    Show,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Open the interactive editor
    Edit,
    /// Apply edits and save them as one change
    ///
    /// Removals run first (indices refer to the stored profile), then
    /// additions, then field assignments.
    Update {
        /// Entry to remove, e.g. `skills.2`
        #[arg(long = "remove", value_name = "SECTION.INDEX")]
        remove: Vec<EntryRef>,
        /// Append a blank entry to a section
        #[arg(long = "add", value_name = "SECTION")]
        add: Vec<Section>,
        /// Set one field, e.g. `experience.0.company=Acme`
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<Assignment>,
    },
    /// Check the stored profile against the form rules
    Validate,
    /// Replace the stored profile with a JSON file
    Import { file: PathBuf },
    /// Print the stored profile as JSON
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// `section.index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    pub section: Section,
    pub index: usize,
}

impl FromStr for EntryRef {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (section, index) = s
            .split_once('.')
            .ok_or_else(|| FormError::UnknownField(s.to_string()))?;
        Ok(Self {
            section: section.parse()?,
            index: index
                .parse()
                .map_err(|_| FormError::UnknownField(s.to_string()))?,
        })
    }
}

/// `path=value`; the value may be empty or contain `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub path: FieldPath,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s
            .split_once('=')
            .ok_or_else(|| FormError::UnknownField(s.to_string()))?;
        Ok(Self {
            path: path.trim().parse()?,
            value: value.to_string(),
        })
    }
}

impl Cli {
    /// Command line flags win over file and environment configuration.
    pub fn apply_to(&self, mut config: ConfigManager) -> ConfigManager {
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir.clone());
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        config
    }
}

pub fn open_store(data_dir: &Path) -> ProfileStore {
    match FileStore::open(data_dir) {
        Ok(store) => ProfileStore::new(store),
        Err(e) => ProfileStore::in_memory_after(e),
    }
}

pub async fn handle_command(command: Command, config: &ConfigManager) -> Result<()> {
    let mut session = Session::open(open_store(&config.environment.data_path));
    print_notifications(&mut session);

    let outcome = match command {
        Command::Status => {
            show_status(&session, config);
            Ok(())
        }
        Command::Show { typst, pdf } => show_document(&session, typst, pdf),
        Command::Key { action } => handle_key(&mut session, action),
        Command::Profile { action } => handle_profile(&mut session, action),
        Command::Generate {
            job,
            job_file,
            out_dir,
            pdf,
        } => {
            let job_description = match (job, job_file) {
                (Some(text), _) => text,
                (None, Some(path)) => FsOps::read_file(&path)?,
                (None, None) => anyhow::bail!("Provide --job or --job-file"),
            };
            let out_dir = out_dir.unwrap_or_else(|| config.environment.output_path.clone());
            generate(&mut session, config, job_description, &out_dir, pdf).await
        }
    };

    print_notifications(&mut session);
    outcome
}

fn show_status(session: &Session, config: &ConfigManager) {
    let profile = session.persisted_profile();
    let name = if profile.full_name.is_empty() {
        "<unnamed>"
    } else {
        profile.full_name.as_str()
    };

    println!("{} {}", "profile:".blue(), name);
    println!(
        "  {} experience, {} education, {} certifications, {} skills, {} languages, {} interests",
        profile.experience.len(),
        profile.education().len(),
        profile.certifications().len(),
        profile.skills().len(),
        profile.languages().len(),
        profile.interests().len(),
    );
    match validation::validate_profile(profile) {
        Ok(()) => println!("  {}", "complete".green()),
        Err(errors) => println!(
            "  {}",
            format!("{} field(s) need attention", errors.fields().len()).yellow()
        ),
    }

    let key_state = if session.credential().is_empty() {
        "missing".red()
    } else {
        "set".green()
    };
    println!("{} {}", "API key:".blue(), key_state);
    println!("{} {}", "generate:".blue(), session.generate_label());
    println!("{} {}", "data:".blue(), config.environment.data_path.display());
    println!("{} {}", "endpoint:".blue(), config.service.base_url);
}

fn show_document(session: &Session, typst: Option<PathBuf>, pdf: Option<PathBuf>) -> Result<()> {
    let view = DocumentView::from_profile(session.active_profile());
    println!("{}", render::text::render(&view));

    if typst.is_none() && pdf.is_none() {
        return Ok(());
    }

    let source = render::typst::render(&view);
    if let Some(path) = typst {
        FsOps::write_file(&path, &source)?;
        println!("{} {}", "typst:".green(), path.display());
    }
    if let Some(path) = pdf {
        let output = TypstCompiler::default().compile(&source, &path)?;
        println!("{} {}", "pdf:".green(), output.display());
    }
    Ok(())
}

fn handle_key(session: &mut Session, action: KeyCommand) -> Result<()> {
    match action {
        KeyCommand::Set { key } => {
            if let Err(errors) = session.save_credential_form(&CredentialForm::new(key)) {
                dialog::print_field_errors(&errors);
                return Err(errors).context("API key not saved");
            }
            println!("{}", "API key saved".green());
        }
        KeyCommand::Show => {
            if session.credential().is_empty() {
                println!("{}", "Missing OpenAI API key".red());
            } else {
                println!("{}", mask(session.credential()));
            }
        }
    }
    Ok(())
}

fn handle_profile(session: &mut Session, action: ProfileCommand) -> Result<()> {
    match action {
        ProfileCommand::Edit => dialog::run(session),
        ProfileCommand::Update { remove, add, set } => {
            let form = apply_edits(session.persisted_profile().clone(), remove, add, set)?;
            save_form(session, &form)
        }
        ProfileCommand::Validate => match validation::validate_profile(session.persisted_profile()) {
            Ok(()) => {
                println!("{}", "profile is valid".green());
                Ok(())
            }
            Err(errors) => {
                dialog::print_field_errors(&errors);
                Err(errors).context("Stored profile is incomplete")
            }
        },
        ProfileCommand::Import { file } => {
            let content = FsOps::read_file(&file)?;
            let profile: UserProfile = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a valid profile", file.display()))?;
            save_form(session, &ProfileForm::new(profile))
        }
        ProfileCommand::Export { output } => {
            let json = serde_json::to_string_pretty(session.persisted_profile())
                .context("Failed to serialize profile")?;
            match output {
                Some(path) => {
                    FsOps::write_file(&path, &json)?;
                    println!("{} {}", "exported:".green(), path.display());
                }
                None => println!("{json}"),
            }
            Ok(())
        }
    }
}

/// Builds the edited form without saving it.
pub fn apply_edits(
    profile: UserProfile,
    mut remove: Vec<EntryRef>,
    add: Vec<Section>,
    set: Vec<Assignment>,
) -> Result<ProfileForm, FormError> {
    let mut form = ProfileForm::new(profile);

    // Highest index first so earlier indices still point at the stored entries.
    remove.sort_by(|a, b| {
        b.index
            .cmp(&a.index)
            .then_with(|| a.section.key().cmp(b.section.key()))
    });
    remove.dedup();
    for entry in remove {
        form.remove(entry.section, entry.index)?;
    }
    for section in add {
        form.add(section);
    }
    for assignment in set {
        form.set(&assignment.path, assignment.value)?;
    }
    Ok(form)
}

fn save_form(session: &mut Session, form: &ProfileForm) -> Result<()> {
    if let Err(errors) = session.save_profile_form(form) {
        dialog::print_field_errors(&errors);
        return Err(errors).context("Profile not saved");
    }
    println!("{}", "profile saved".green());
    Ok(())
}

async fn generate(
    session: &mut Session,
    config: &ConfigManager,
    job_description: String,
    out_dir: &Path,
    pdf: bool,
) -> Result<()> {
    session.set_job_description(job_description);
    let enhancer = Enhancer::new(OpenAiClient::new(config.service.base_url.clone())?);

    println!("{}", "Generating...".blue());
    if let Err(e) = session.generate(&enhancer).await {
        error!("Generation did not complete: {}", e);
        if let SubmitError::Invalid(errors) = &e {
            dialog::print_field_errors(errors);
        }
        if matches!(e, SubmitError::Failed(_)) {
            print_notifications(session);
            println!("{}", "The preview still shows your stored profile.".yellow());
        }
        return Err(e.into());
    }

    let profile = session.active_profile();
    let view = DocumentView::from_profile(profile);
    println!("{}", render::text::render(&view));

    let letter = session.cover_letter().unwrap_or_default();
    println!("{}\n\n{}", "Cover letter".blue().bold(), letter);

    FsOps::ensure_dir_exists(out_dir)?;
    let source = render::typst::render(&view);
    let resume = FsOps::output_stem(out_dir, &profile.full_name, "resume");
    if pdf {
        let output = TypstCompiler::default().compile(&source, &resume.with_extension("pdf"))?;
        println!("{} {}", "resume:".green(), output.display());
    } else {
        let output = resume.with_extension("typ");
        FsOps::write_file(&output, &source)?;
        println!("{} {}", "resume:".green(), output.display());
    }

    let letter_path = FsOps::output_stem(out_dir, &profile.full_name, "cover_letter").with_extension("txt");
    FsOps::write_file(&letter_path, letter)?;
    println!("{} {}", "cover letter:".green(), letter_path.display());

    info!("Generated documents in {}", out_dir.display());
    Ok(())
}

fn print_notifications(session: &mut Session) {
    for Notification {
        level,
        title,
        description,
    } in session.drain_notifications()
    {
        match level {
            Level::Warning => eprintln!("{} {}", title.yellow().bold(), description),
            Level::Error => eprintln!("{} {}", title.red().bold(), description),
        }
    }
}

/// Keeps only the last four characters visible.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let visible = chars.len().min(4);
    let tail: String = chars[chars.len() - visible..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - visible), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::minimal_profile;

    #[test]
    fn test_parse_entry_ref() {
        let entry: EntryRef = "Skills.2".parse().unwrap();
        assert_eq!(entry.section, Section::Skills);
        assert_eq!(entry.index, 2);
        assert!("skills".parse::<EntryRef>().is_err());
        assert!("hobbies.0".parse::<EntryRef>().is_err());
    }

    #[test]
    fn test_parse_assignment_keeps_equals_in_value() {
        let assignment: Assignment = "experience.0.description=a=b".parse().unwrap();
        assert_eq!(assignment.path.to_string(), "experience.0.description");
        assert_eq!(assignment.value, "a=b");

        let cleared: Assignment = "phone=".parse().unwrap();
        assert_eq!(cleared.value, "");
    }

    #[test]
    fn test_apply_edits_removes_by_stored_index() {
        let mut profile = minimal_profile();
        profile.skills = Some(
            ["COBOL", "FORTRAN", "Assembly"]
                .into_iter()
                .map(|name| crate::types::Skill {
                    name: name.to_string(),
                })
                .collect(),
        );

        let remove = vec![
            EntryRef {
                section: Section::Skills,
                index: 0,
            },
            EntryRef {
                section: Section::Skills,
                index: 2,
            },
        ];
        let form = apply_edits(profile, remove, vec![], vec![]).unwrap();
        let skills: Vec<&str> = form.values().skills().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skills, ["FORTRAN"]);
    }

    #[test]
    fn test_apply_edits_fills_added_entry() {
        let set = vec![
            "skills.1.name=Compilers".parse().unwrap(),
            "jobTitle=Rear Admiral".parse().unwrap(),
        ];
        let form = apply_edits(minimal_profile(), vec![], vec![Section::Skills], set).unwrap();
        let profile = form.submit().unwrap();
        assert_eq!(profile.skills()[1].name, "Compilers");
        assert_eq!(profile.job_title, "Rear Admiral");
    }

    #[test]
    fn test_apply_edits_out_of_range() {
        let remove = vec![EntryRef {
            section: Section::Experience,
            index: 5,
        }];
        assert!(matches!(
            apply_edits(minimal_profile(), remove, vec![], vec![]),
            Err(FormError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("sk-test1234"), "*******1234");
        assert_eq!(mask("abc"), "abc");
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from(["resume-tailor", "--data-dir", "/tmp/rt", "status"]).unwrap();
        let config = cli.apply_to(ConfigManager::defaults(Path::new("/home/u")));
        assert_eq!(config.environment.data_path, PathBuf::from("/tmp/rt"));
        assert_eq!(config.environment.output_path, PathBuf::from("/home/u/out"));
    }

    #[tokio::test]
    async fn test_unusable_data_dir_still_runs_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();
        let cli = Cli::try_parse_from([
            "resume-tailor",
            "--data-dir",
            blocker.join("data").to_str().unwrap(),
            "status",
        ])
        .unwrap();
        let config = cli.apply_to(ConfigManager::defaults(dir.path()));

        let log = crate::core::logging::open_log_file(&config.log_file()).unwrap();
        assert!(log.fallback_reason.is_some());

        let store = open_store(&config.environment.data_path);
        assert!(store.is_degraded());
        handle_command(cli.command, &config).await.unwrap();
    }

    #[test]
    fn test_generate_requires_a_job() {
        assert!(Cli::try_parse_from(["resume-tailor", "generate"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-tailor",
            "generate",
            "--job",
            "x",
            "--job-file",
            "y"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["resume-tailor", "generate", "--job", "Engineer"]).is_ok());
    }
}
