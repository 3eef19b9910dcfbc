// ============================================================================
// src/lib.rs – Secret Forge: provision JWT secrets and peppers into .env
// ============================================================================
//! Each binary runs one cycle: draw OS randomness, encode it, rewrite the
//! env file with a `KEY=VALUE` line, echo the result.

pub mod cli;
pub mod cmd;
pub mod config;
pub mod envfile;
pub mod error;
pub mod logging;
pub mod secret;
pub mod ui;
pub mod util;
