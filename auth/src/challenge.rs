//! Short-lived one-time codes for phone verification.
//!
//! The store is an injected instance owned by whoever wires the
//! application together; nothing here is global. Codes are single-use
//! and expire after a fixed TTL; expired entries are evicted lazily on
//! the next issue or verify for the same key.

use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use verity_types::Timestamp;

/// Default code lifetime: five minutes.
pub const CHALLENGE_TTL_SECS: u64 = 5 * 60;

struct Challenge {
    code: String,
    expires_at: Timestamp,
}

/// In-memory one-time-code store, keyed by an opaque caller-chosen key
/// (in practice the phone number in E.164 form).
pub struct ChallengeStore {
    ttl_secs: u64,
    entries: Mutex<HashMap<String, Challenge>>,
}

impl Default for ChallengeStore {
    fn default() -> Self {
        Self::new(CHALLENGE_TTL_SECS)
    }
}

impl ChallengeStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a fresh 6-digit code for `key`, replacing any outstanding
    /// one.
    pub fn issue(&self, key: &str) -> String {
        self.issue_at(key, Timestamp::now())
    }

    pub fn issue_at(&self, key: &str, now: Timestamp) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            Challenge {
                code: code.clone(),
                expires_at: now.plus_secs(self.ttl_secs),
            },
        );
        code
    }

    /// Check a code. Success consumes the entry; an expired entry is
    /// removed and reported as a failure.
    pub fn verify(&self, key: &str, code: &str) -> bool {
        self.verify_at(key, code, Timestamp::now())
    }

    pub fn verify_at(&self, key: &str, code: &str, now: Timestamp) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(challenge) if challenge.expires_at.is_past(now) => {
                entries.remove(key);
                false
            }
            Some(challenge) if challenge.code == code => {
                entries.remove(key);
                true
            }
            _ => false,
        }
    }
}
