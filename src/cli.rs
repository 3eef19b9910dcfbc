// ============================================================================
// src/cli.rs – shared command-line surface for the two forge binaries
// ============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cmd::{run_provision, Outcome, ProvisionOptions};
use crate::config::ConfigFile;
use crate::envfile::EditMode;
use crate::error::MAX_SECRET_BYTES;
use crate::logging::init_tracing;
use crate::secret::SecretKind;
use crate::ui::UX;
use crate::util::paths::default_env_path;

/// Every flag is optional; a bare invocation edits `<binary dir>/../.env`.
#[derive(Debug, Parser)]
#[command(version, about = "Generate a secret and record it in a .env file")]
pub struct Args {
    /// Env file to edit (default: .env one directory above this binary)
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// TOML or YAML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Env key to write
    #[arg(long, value_name = "NAME")]
    pub key: Option<String>,

    /// Number of random bytes to draw
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=MAX_SECRET_BYTES as i64))]
    pub bytes: Option<u32>,

    /// How the value is merged into existing lines
    #[arg(long, value_enum)]
    pub mode: Option<EditMode>,

    /// Do not print the updated file
    #[arg(long)]
    pub no_echo: bool,

    /// Only print the updated file and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Merge flags over config over built-in defaults.
    pub fn resolve(&self, kind: SecretKind) -> Result<ProvisionOptions> {
        let cfg = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        let secret = cfg.secret(kind);

        let env_path = match (&self.env_file, &cfg.env_file) {
            (Some(p), _) | (None, Some(p)) => p.clone(),
            (None, None) => default_env_path().context("resolve default .env location")?,
        };

        Ok(ProvisionOptions {
            env_path,
            key: self.key.clone().unwrap_or_else(|| secret.key.clone()),
            bytes: self.bytes.map_or(secret.bytes, |b| b as usize),
            mode: self.mode.unwrap_or(cfg.mode),
            echo: !self.no_echo,
        })
    }
}

/// 0 on success, 2 when the env file is missing, 1 on any failure.
pub fn exit_code_for(result: &Result<Outcome>) -> u8 {
    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(_) => 1,
    }
}

/// Resolve options and run one provisioning cycle, reporting any failure.
pub fn run_with(ui: &UX, kind: SecretKind, args: &Args) -> Result<Outcome> {
    ui.banner(&format!("SECRET FORGE // {}", kind.label().to_uppercase()));

    let result = args.resolve(kind).and_then(|opts| run_provision(ui, kind, &opts));
    if let Err(err) = &result {
        tracing::error!("{err:#}");
        ui.error(&format!("{err:#}"));
    }
    result
}

pub fn main_for(kind: SecretKind) -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);
    let ui = UX::new(args.quiet);

    ExitCode::from(exit_code_for(&run_with(&ui, kind, &args)))
}
