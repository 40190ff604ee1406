//! Scripted wizard sessions.
//!
//! A script is a JSON array of commands replayed against the orchestrator in
//! order, e.g.
//!
//! ```json
//! [
//!   { "op": "open" },
//!   { "op": "contact", "email": "client@shop.test" },
//!   { "op": "project", "projectName": "Shop", "projectType": "web-app",
//!     "description": "...", "timeline": "1-month", "budget": "5k-15k" },
//!   { "op": "next" }
//! ]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use ci_app::WizardOrchestrator;
use ci_core::files::SelectedFile;
use ci_core::intake::{ContactInfo, FeaturesData, PaymentData, ProjectData};
use ci_core::ports::{AuthSessionPort, AuthUser};
use ci_core::wizard::WizardState;
use serde::Deserialize;
use tracing::{info, info_span, warn, Instrument};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptCommand {
    Open,
    Close,
    Contact(ContactInfo),
    Project(ProjectData),
    Features(FeaturesData),
    Payment(PaymentData),
    Next,
    Back,
    FullName { name: String },
    Password { password: String },
    ConfirmPassword { password: String },
    DismissGate,
    /// Record a sign-in that happened elsewhere, then notify the wizard.
    SignedIn {
        email: String,
        #[serde(default)]
        name: Option<String>,
    },
    Attach { paths: Vec<PathBuf> },
    /// Remove attached files by name.
    Detach { name: String },
    WaitUploads,
}

impl ScriptCommand {
    /// The `op` tag; commands may carry passwords, so spans log only this.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptCommand::Open => "open",
            ScriptCommand::Close => "close",
            ScriptCommand::Contact(_) => "contact",
            ScriptCommand::Project(_) => "project",
            ScriptCommand::Features(_) => "features",
            ScriptCommand::Payment(_) => "payment",
            ScriptCommand::Next => "next",
            ScriptCommand::Back => "back",
            ScriptCommand::FullName { .. } => "full_name",
            ScriptCommand::Password { .. } => "password",
            ScriptCommand::ConfirmPassword { .. } => "confirm_password",
            ScriptCommand::DismissGate => "dismiss_gate",
            ScriptCommand::SignedIn { .. } => "signed_in",
            ScriptCommand::Attach { .. } => "attach",
            ScriptCommand::Detach { .. } => "detach",
            ScriptCommand::WaitUploads => "wait_uploads",
        }
    }
}

pub fn parse_script(raw: &str) -> anyhow::Result<Vec<ScriptCommand>> {
    serde_json::from_str(raw).context("Failed to parse wizard script")
}

pub async fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptCommand>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&raw)
}

/// Replay `commands` and return the final wizard state.
pub async fn run_script(
    orchestrator: &WizardOrchestrator,
    auth: &dyn AuthSessionPort,
    commands: Vec<ScriptCommand>,
) -> anyhow::Result<WizardState> {
    let mut state = orchestrator.get_state().await;
    for (index, command) in commands.into_iter().enumerate() {
        let span = info_span!("script.command", index, op = command.name());
        state = run_command(orchestrator, auth, command)
            .instrument(span)
            .await
            .with_context(|| format!("Script command #{index} failed"))?;
    }
    info!(step = ?state.step, completed = state.completed, "script finished");
    Ok(state)
}

async fn run_command(
    orchestrator: &WizardOrchestrator,
    auth: &dyn AuthSessionPort,
    command: ScriptCommand,
) -> anyhow::Result<WizardState> {
    let state = match command {
        ScriptCommand::Open => orchestrator.open().await?,
        ScriptCommand::Close => {
            orchestrator.close().await;
            orchestrator.get_state().await
        }
        ScriptCommand::Contact(contact) => orchestrator.update_contact(contact).await,
        ScriptCommand::Project(project) => orchestrator.update_project(project).await,
        ScriptCommand::Features(features) => orchestrator.update_features(features).await,
        ScriptCommand::Payment(payment) => orchestrator.update_payment(payment).await,
        ScriptCommand::Next => orchestrator.next().await,
        ScriptCommand::Back => orchestrator.back().await,
        ScriptCommand::FullName { name } => orchestrator.submit_full_name(name).await,
        ScriptCommand::Password { password } => orchestrator.submit_password(password).await,
        ScriptCommand::ConfirmPassword { password } => {
            orchestrator.confirm_password(password).await
        }
        ScriptCommand::DismissGate => orchestrator.dismiss_gate().await,
        ScriptCommand::SignedIn { email, name } => {
            auth.sign_in(AuthUser { email, name }).await;
            orchestrator.on_auth_changed().await?
        }
        ScriptCommand::Attach { paths } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in paths {
                files.push(read_selected_file(&path).await?);
            }
            orchestrator.file_stage().select(files).await;
            orchestrator.get_state().await
        }
        ScriptCommand::Detach { name } => {
            let stage = orchestrator.file_stage();
            let ids: Vec<_> = stage
                .files()
                .into_iter()
                .filter(|file| file.name == name)
                .map(|file| file.id)
                .collect();
            if ids.is_empty() {
                warn!(%name, "no attached file with that name");
            }
            for id in ids {
                stage.remove(&id).await;
            }
            orchestrator.get_state().await
        }
        ScriptCommand::WaitUploads => {
            orchestrator.file_stage().wait_idle().await;
            orchestrator.get_state().await
        }
    };
    Ok(state)
}

async fn read_selected_file(path: &Path) -> anyhow::Result<SelectedFile> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = SelectedFile::new(name, content);
    Ok(match guess_content_type(path) {
        Some(content_type) => file.with_content_type(content_type),
        None => file,
    })
}

fn guess_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "zip" => "application/zip",
        _ => return None,
    })
}
