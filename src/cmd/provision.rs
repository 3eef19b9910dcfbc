// ============================================================================
// src/cmd/provision.rs – generate a secret and write it into the env file
// ============================================================================

use anyhow::Result;
use std::path::PathBuf;

use crate::envfile::{edit_env_file, EditMode};
use crate::secret::{fingerprint, generate, SecretKind};
use crate::ui::UX;

#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub env_path: PathBuf,
    pub key: String,
    pub bytes: usize,
    pub mode: EditMode,
    pub echo: bool,
}

impl ProvisionOptions {
    /// Built-in defaults for `kind` against `env_path`.
    pub fn for_kind(kind: SecretKind, env_path: PathBuf) -> Self {
        Self {
            env_path,
            key: kind.default_key().to_string(),
            bytes: kind.default_bytes(),
            mode: EditMode::default(),
            echo: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Provisioned { key: String, fingerprint: String },
    EnvFileMissing(PathBuf),
}

impl Outcome {
    /// Process exit code: 0 once written, 2 when there was no env file to edit.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Provisioned { .. } => 0,
            Outcome::EnvFileMissing(_) => 2,
        }
    }
}

// ----------------------------------------------------------------------------
// Public entrypoint
// ----------------------------------------------------------------------------

pub fn run_provision(ui: &UX, kind: SecretKind, opts: &ProvisionOptions) -> Result<Outcome> {
    ui.phase(&format!("Forging {} // {}", kind.label(), opts.key));
    tracing::info!(path = %opts.env_path.display(), key = %opts.key, "provisioning");

    if !opts.env_path.exists() {
        ui.notice(&format!(".env file not found at {}", opts.env_path.display()));
        tracing::warn!(path = %opts.env_path.display(), "env file missing; nothing written");
        return Ok(Outcome::EnvFileMissing(opts.env_path.clone()));
    }

    ui.info(&format!(
        "Drawing {} bytes from the OS randomness source.",
        opts.bytes
    ));
    let value = generate(kind, opts.bytes)?;
    let signet = fingerprint(&value);
    tracing::debug!(bytes = opts.bytes, fingerprint = %signet, "secret generated");

    let edited = edit_env_file(&opts.env_path, &opts.key, &value, opts.mode)?;

    if opts.echo {
        ui.phase("Updated .env");
        ui.echo_file(&edited.contents);
    }

    ui.data_panel(
        "Forge Ledger",
        &[
            ("Env File", opts.env_path.display().to_string()),
            ("Key", opts.key.clone()),
            ("Mode", format!("{:?}", opts.mode)),
            ("Matched", edited.outcome.matched.to_string()),
            ("Inserted", edited.outcome.inserted.to_string()),
        ],
    );
    if edited.outcome.matched > 1 && opts.mode == EditMode::AppendAfterMatch {
        ui.warn(&format!(
            "{} appears {} times; each occurrence received a new entry.",
            opts.key, edited.outcome.matched
        ));
    }
    ui.security(&format!("{} signet (SHA-256 · first 64 bits): {signet}", opts.key));
    ui.success(&format!("{} written to {}", opts.key, opts.env_path.display()));
    tracing::info!(
        key = %opts.key,
        matched = edited.outcome.matched,
        inserted = edited.outcome.inserted,
        removed = edited.outcome.removed,
        appended = edited.outcome.appended,
        "env file updated"
    );

    Ok(Outcome::Provisioned {
        key: opts.key.clone(),
        fingerprint: signet,
    })
}
