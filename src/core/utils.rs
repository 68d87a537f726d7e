use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const HOME_ENV: &str = "FINANCE_LEDGER_HOME";
const DEFAULT_DIR_NAME: &str = ".finance_ledger";
const USERS_DIR: &str = "users";
const CONFIG_FILE: &str = "config.json";

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolves the on-disk layout of the application data directory.
pub struct PathResolver;

impl PathResolver {
    /// Explicit path, then `FINANCE_LEDGER_HOME`, then `~/.finance_ledger`.
    pub fn resolve_base(explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(Self::base_dir)
    }

    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn user_dir_in(base: &Path, user_slug: &str) -> PathBuf {
        base.join(USERS_DIR).join(user_slug)
    }
}

/// Maps a user id to a directory name. Lowercase ASCII letters, digits and `-` are kept; every
/// other byte becomes `_` followed by two hex digits. The mapping is injective, so distinct ids
/// never share a directory.
pub fn user_dir_name(id: &str) -> String {
    if id.is_empty() {
        return "_".into();
    }
    let mut name = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => name.push(byte as char),
            _ => name.push_str(&format!("_{byte:02x}")),
        }
    }
    name
}
