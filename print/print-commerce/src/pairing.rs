//! Device pairing codes.

use std::time::{Duration, Instant};

use hashbrown::HashMap;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// How long an issued code stays claimable.
pub const DEFAULT_CODE_TTL: Duration = Duration::from_secs(300);

/// Active codes allowed per user.
pub const PER_USER_CODE_CAP: usize = 5;

const CODE_LEN: usize = 6;
// No 0/O/1/I: codes get read aloud and typed on TV remotes.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Errors from the pairing-code service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PairingError {
    /// The user already holds the maximum number of active codes.
    #[error("too many active pairing codes; wait for one to expire")]
    TooManyActive,

    /// The code was never issued, already claimed, or has expired.
    #[error("pairing code is unknown or expired")]
    UnknownCode,
}

struct PairingEntry {
    user: String,
    token: String,
    expires_at: Instant,
}

/// Issues and redeems short-lived device pairing codes.
///
/// Owns its table; expired entries are swept lazily on every access,
/// so no background task is needed. A claim is single use: the entry
/// is removed as the token is handed out. The per-user cap counts only
/// live codes, so it frees itself by expiry.
pub struct PairingCodes {
    ttl: Duration,
    per_user_cap: usize,
    codes: HashMap<String, PairingEntry>,
}

impl Default for PairingCodes {
    fn default() -> Self {
        Self::new()
    }
}

impl PairingCodes {
    /// Service with the default TTL and per-user cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CODE_TTL)
    }

    /// Service with a custom TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            per_user_cap: PER_USER_CODE_CAP,
            codes: HashMap::new(),
        }
    }

    /// Issue a fresh code for `user` that redeems to `token`.
    ///
    /// # Errors
    ///
    /// [`PairingError::TooManyActive`] when the user is at the cap;
    /// existing codes stay valid.
    pub fn issue(&mut self, user: &str, token: &str) -> Result<String, PairingError> {
        self.issue_at(user, token, Instant::now(), &mut rand::thread_rng())
    }

    /// Redeem a code for its token, removing it.
    ///
    /// Codes match case-insensitively and ignore surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// [`PairingError::UnknownCode`] for unissued, already-claimed or
    /// expired codes.
    pub fn claim(&mut self, code: &str) -> Result<String, PairingError> {
        self.claim_at(code, Instant::now())
    }

    /// Number of live codes.
    #[must_use]
    pub fn active(&self) -> usize {
        self.codes.len()
    }

    fn issue_at<R: Rng>(
        &mut self,
        user: &str,
        token: &str,
        now: Instant,
        rng: &mut R,
    ) -> Result<String, PairingError> {
        self.sweep(now);
        let active = self.codes.values().filter(|e| e.user == user).count();
        if active >= self.per_user_cap {
            return Err(PairingError::TooManyActive);
        }

        let code = loop {
            let candidate: String = (0..CODE_LEN)
                .map(|_| {
                    let index = rng.gen_range(0..CODE_ALPHABET.len());
                    char::from(CODE_ALPHABET[index])
                })
                .collect();
            if !self.codes.contains_key(&candidate) {
                break candidate;
            }
        };

        self.codes.insert(
            code.clone(),
            PairingEntry {
                user: user.to_owned(),
                token: token.to_owned(),
                expires_at: now + self.ttl,
            },
        );
        debug!(user, "pairing code issued");
        Ok(code)
    }

    fn claim_at(&mut self, code: &str, now: Instant) -> Result<String, PairingError> {
        self.sweep(now);
        let normalized = code.trim().to_ascii_uppercase();
        match self.codes.remove(&normalized) {
            Some(entry) => {
                debug!(user = %entry.user, "pairing code claimed");
                Ok(entry.token)
            }
            None => Err(PairingError::UnknownCode),
        }
    }

    fn sweep(&mut self, now: Instant) {
        self.codes.retain(|_, entry| entry.expires_at > now);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn service() -> (PairingCodes, StdRng) {
        (PairingCodes::new(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn issued_code_claims_exactly_once() {
        let (mut codes, mut rng) = service();
        let now = Instant::now();

        let code = codes.issue_at("user-1", "token-1", now, &mut rng).unwrap();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));

        assert_eq!(codes.claim_at(&code, now).unwrap(), "token-1");
        assert_eq!(codes.claim_at(&code, now), Err(PairingError::UnknownCode));
    }

    #[test]
    fn claim_normalizes_case_and_whitespace() {
        let (mut codes, mut rng) = service();
        let now = Instant::now();

        let code = codes.issue_at("user-1", "token-1", now, &mut rng).unwrap();
        let sloppy = format!("  {} ", code.to_ascii_lowercase());
        assert_eq!(codes.claim_at(&sloppy, now).unwrap(), "token-1");
    }

    #[test]
    fn expired_codes_cannot_be_claimed() {
        let (mut codes, mut rng) = service();
        let now = Instant::now();

        let code = codes.issue_at("user-1", "token-1", now, &mut rng).unwrap();
        let later = now + DEFAULT_CODE_TTL + Duration::from_secs(1);
        assert_eq!(codes.claim_at(&code, later), Err(PairingError::UnknownCode));
        assert_eq!(codes.active(), 0);
    }

    #[test]
    fn per_user_cap_rejects_the_next_issue() {
        let (mut codes, mut rng) = service();
        let now = Instant::now();

        for n in 0..PER_USER_CODE_CAP {
            codes
                .issue_at("user-1", &format!("token-{n}"), now, &mut rng)
                .unwrap();
        }
        assert_eq!(
            codes.issue_at("user-1", "one-more", now, &mut rng),
            Err(PairingError::TooManyActive)
        );
        // The cap is per user.
        assert!(codes.issue_at("user-2", "token", now, &mut rng).is_ok());
    }

    #[test]
    fn expiry_frees_the_cap() {
        let (mut codes, mut rng) = service();
        let now = Instant::now();

        for n in 0..PER_USER_CODE_CAP {
            codes
                .issue_at("user-1", &format!("token-{n}"), now, &mut rng)
                .unwrap();
        }
        let later = now + DEFAULT_CODE_TTL + Duration::from_secs(1);
        assert!(codes.issue_at("user-1", "fresh", later, &mut rng).is_ok());
        assert_eq!(codes.active(), 1);
    }

    #[test]
    fn claims_are_scoped_to_the_issued_code() {
        let (mut codes, mut rng) = service();
        let now = Instant::now();

        let a = codes.issue_at("user-1", "token-a", now, &mut rng).unwrap();
        let b = codes.issue_at("user-2", "token-b", now, &mut rng).unwrap();
        assert_ne!(a, b);
        assert_eq!(codes.claim_at(&b, now).unwrap(), "token-b");
        assert_eq!(codes.claim_at(&a, now).unwrap(), "token-a");
    }
}
