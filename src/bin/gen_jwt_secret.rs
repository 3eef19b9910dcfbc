// ============================================================================
// src/bin/gen_jwt_secret.rs – write a fresh JWT_SECRET (64 random bytes, hex)
// ============================================================================

use secret_forge::cli::main_for;
use secret_forge::secret::SecretKind;
use std::process::ExitCode;

fn main() -> ExitCode {
    main_for(SecretKind::JwtSecret)
}
