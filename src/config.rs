// ============================================================================
// src/config.rs – strict config loader
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::envfile::EditMode;
use crate::error::check_length;
use crate::secret::{SecretKind, DEFAULT_JWT_BYTES, DEFAULT_PEPPER_BYTES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretCfg {
    pub key: String,
    pub bytes: usize,
}

fn default_jwt() -> SecretCfg {
    SecretCfg {
        key: SecretKind::JwtSecret.default_key().to_string(),
        bytes: DEFAULT_JWT_BYTES,
    }
}

fn default_pepper() -> SecretCfg {
    SecretCfg {
        key: SecretKind::Pepper.default_key().to_string(),
        bytes: DEFAULT_PEPPER_BYTES,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Target env file. Relative paths resolve against the config file's directory.
    #[serde(default)]
    pub env_file: Option<PathBuf>,
    #[serde(default)]
    pub mode: EditMode,
    #[serde(default = "default_jwt")]
    pub jwt: SecretCfg,
    #[serde(default = "default_pepper")]
    pub pepper: SecretCfg,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            env_file: None,
            mode: EditMode::default(),
            jwt: default_jwt(),
            pepper: default_pepper(),
        }
    }
}

impl ConfigFile {
    pub fn load<P: AsRef<Path>>(p: P) -> Result<Self> {
        let path = p.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let mut cfg: Self = if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            toml::from_str(&s).context("toml parse")?
        } else {
            serde_yaml::from_str(&s).context("yaml parse")?
        };

        for (section, secret) in [("jwt", &cfg.jwt), ("pepper", &cfg.pepper)] {
            check_length(secret.bytes)
                .with_context(|| format!("{section}.bytes in {}", path.display()))?;
        }

        if let Some(env) = cfg.env_file.take() {
            cfg.env_file = Some(match path.parent() {
                Some(base) if env.is_relative() => base.join(env),
                _ => env,
            });
        }
        Ok(cfg)
    }

    pub fn secret(&self, kind: SecretKind) -> &SecretCfg {
        match kind {
            SecretKind::JwtSecret => &self.jwt,
            SecretKind::Pepper => &self.pepper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_builtin_secrets() {
        let cfg = ConfigFile::default();
        assert_eq!(cfg.secret(SecretKind::JwtSecret).key, "JWT_SECRET");
        assert_eq!(cfg.secret(SecretKind::JwtSecret).bytes, 64);
        assert_eq!(cfg.secret(SecretKind::Pepper).key, "PEPPER");
        assert_eq!(cfg.secret(SecretKind::Pepper).bytes, 32);
        assert_eq!(cfg.mode, EditMode::AppendAfterMatch);
    }

    #[test]
    fn loads_partial_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forge.toml");
        fs::write(
            &path,
            "env_file = \"app/.env\"\nmode = \"replace\"\n\n[pepper]\nkey = \"APP_PEPPER\"\nbytes = 48\n",
        )
        .unwrap();

        let cfg = ConfigFile::load(&path).unwrap();
        assert_eq!(cfg.mode, EditMode::Replace);
        assert_eq!(cfg.env_file, Some(dir.path().join("app/.env")));
        assert_eq!(cfg.pepper.key, "APP_PEPPER");
        assert_eq!(cfg.pepper.bytes, 48);
        assert_eq!(cfg.jwt, default_jwt());
    }

    #[test]
    fn loads_yaml_with_absolute_env_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forge.yaml");
        fs::write(&path, "env_file: /srv/app/.env\njwt:\n  key: SIGNING_KEY\n  bytes: 32\n").unwrap();

        let cfg = ConfigFile::load(&path).unwrap();
        assert_eq!(cfg.env_file, Some(PathBuf::from("/srv/app/.env")));
        assert_eq!(cfg.jwt.key, "SIGNING_KEY");
        assert_eq!(cfg.mode, EditMode::AppendAfterMatch);
    }

    #[test]
    fn rejects_out_of_range_byte_counts() {
        use crate::error::{ForgeError, MAX_SECRET_BYTES};

        let dir = tempdir().unwrap();
        let path = dir.path().join("forge.toml");
        for bytes in [0usize, MAX_SECRET_BYTES + 1, 1 << 40] {
            fs::write(&path, format!("[pepper]\nkey = \"PEPPER\"\nbytes = {bytes}\n")).unwrap();
            let err = ConfigFile::load(&path).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ForgeError>(),
                Some(ForgeError::InvalidLength(n)) if *n == bytes
            ));
        }

        fs::write(&path, format!("[jwt]\nkey = \"JWT_SECRET\"\nbytes = {MAX_SECRET_BYTES}\n")).unwrap();
        assert_eq!(ConfigFile::load(&path).unwrap().jwt.bytes, MAX_SECRET_BYTES);
    }

    #[test]
    fn rejects_unknown_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forge.toml");
        fs::write(&path, "envfile = \".env\"\n").unwrap();
        assert!(ConfigFile::load(&path).is_err());
    }
}
