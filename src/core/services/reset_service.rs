//! Destructive ledger reset guarded by a typed-back confirmation word.

use uuid::Uuid;

use crate::core::session::Session;
use crate::errors::LedgerError;

use super::ServiceResult;

const TOKEN_LEN: usize = 8;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A one-shot confirmation word shown to the user before a reset.
#[derive(Debug)]
pub struct ResetChallenge {
    token: String,
}

impl ResetChallenge {
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The ledger file was deleted.
    Removed,
    /// There was no ledger file to delete.
    NothingToReset,
}

pub struct ResetService;

impl ResetService {
    pub fn issue_challenge() -> ResetChallenge {
        ResetChallenge {
            token: generate_token(),
        }
    }

    /// Deletes the ledger only when `input` equals the challenge word exactly. The challenge
    /// is consumed, so a failed attempt needs a new word.
    pub fn confirm(
        session: &Session,
        challenge: ResetChallenge,
        input: &str,
    ) -> ServiceResult<ResetOutcome> {
        if input != challenge.token {
            tracing::warn!(user = %session.user(), "reset confirmation word mismatch");
            return Err(LedgerError::ConfirmationMismatch);
        }
        let outcome = if session.stores().ledger.reset()? {
            ResetOutcome::Removed
        } else {
            ResetOutcome::NothingToReset
        };
        tracing::info!(user = %session.user(), ?outcome, "ledger reset");
        Ok(outcome)
    }
}

/// Draws alphanumeric characters from v4 UUID randomness. Bytes 6 and 8 carry the version
/// and variant bits and are skipped; bytes past the last full multiple of the alphabet are
/// rejected so every character is equally likely.
fn generate_token() -> String {
    let limit = (u8::MAX as usize + 1) / ALPHABET.len() * ALPHABET.len();
    let mut token = String::with_capacity(TOKEN_LEN);
    while token.len() < TOKEN_LEN {
        let bytes = Uuid::new_v4().into_bytes();
        for (idx, byte) in bytes.into_iter().enumerate() {
            if idx == 6 || idx == 8 {
                continue;
            }
            if (byte as usize) < limit {
                token.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
                if token.len() == TOKEN_LEN {
                    break;
                }
            }
        }
    }
    token
}
