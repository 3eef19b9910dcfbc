// ============================================================================
// src/cmd/mod.rs – command subsystem root
// ============================================================================
pub mod provision; // gen_jwt_secret / gen_pepper

pub use provision::{run_provision, Outcome, ProvisionOptions};
