// ============================================================================
// src/bin/gen_pepper.rs – write a fresh PEPPER (32 random bytes, URL-safe base64)
// ============================================================================

use secret_forge::cli::main_for;
use secret_forge::secret::SecretKind;
use std::process::ExitCode;

fn main() -> ExitCode {
    main_for(SecretKind::Pepper)
}
