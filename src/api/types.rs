//! Shared types for the API layer: request context, nurse sessions,
//! token utilities and rate limiting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::core_state::CoreState;

/// Bearer sessions live this long after login.
const SESSION_TTL_SECS: u64 = 8 * 3600;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
/// Wraps `CoreState` plus API-specific stores.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self {
            core,
            sessions: Arc::new(Mutex::new(SessionStore::new())),
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new())),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Nurse context — injected by auth middleware
// ═══════════════════════════════════════════════════════════

/// Authenticated nurse context, injected into request extensions by the
/// auth middleware after successful token validation.
#[derive(Debug, Clone)]
pub struct NurseContext {
    pub nurse_id: Uuid,
    pub first_name: String,
}

// ═══════════════════════════════════════════════════════════
// Token utilities
// ═══════════════════════════════════════════════════════════

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

// ═══════════════════════════════════════════════════════════
// Session store — server-side bearer sessions
// ═══════════════════════════════════════════════════════════

/// Outcome of a session lookup.
#[derive(Debug)]
pub enum SessionCheck {
    Valid(NurseContext),
    Expired,
    Missing,
}

struct SessionEntry {
    nurse_id: Uuid,
    first_name: String,
    expires_at: Instant,
}

/// In-memory store of active nurse sessions. Only token hashes are kept;
/// the token itself exists client-side only.
pub struct SessionStore {
    sessions: HashMap<[u8; 32], SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            ttl: Duration::from_secs(SESSION_TTL_SECS),
        }
    }

    /// Issue a fresh session token for a nurse.
    pub fn issue(&mut self, nurse_id: Uuid, first_name: String) -> String {
        self.cleanup();
        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            SessionEntry {
                nurse_id,
                first_name,
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Look up a presented token.
    pub fn check(&self, token: &str) -> SessionCheck {
        match self.sessions.get(&hash_token(token)) {
            Some(entry) if Instant::now() < entry.expires_at => {
                SessionCheck::Valid(NurseContext {
                    nurse_id: entry.nurse_id,
                    first_name: entry.first_name.clone(),
                })
            }
            Some(_) => SessionCheck::Expired,
            None => SessionCheck::Missing,
        }
    }

    /// Revoke a session (logout). Returns `true` when a session was removed.
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(&hash_token(token)).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        self.sessions.retain(|_, entry| now < entry.expires_at);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Rate limiter — per-source sliding window
// ═══════════════════════════════════════════════════════════

/// Per-source rate limiter with per-minute and per-hour limits.
pub struct RateLimiter {
    windows: HashMap<String, Vec<Instant>>,
    per_minute: u32,
    per_hour: u32,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
            per_minute: 100,
            per_hour: 1000,
        }
    }

    /// Check if a source is within rate limits. Returns `Ok(())` or
    /// `Err(retry_after_secs)` if exceeded.
    pub fn check(&mut self, source: &str) -> Result<(), u64> {
        let now = Instant::now();
        let entries = self.windows.entry(source.to_string()).or_default();

        entries.retain(|ts| now.duration_since(*ts) < Duration::from_secs(3600));

        let last_minute = entries
            .iter()
            .filter(|ts| now.duration_since(**ts) < Duration::from_secs(60))
            .count() as u32;
        if last_minute >= self.per_minute {
            return Err(60);
        }

        if entries.len() as u32 >= self.per_hour {
            return Err(3600);
        }

        entries.push(now);
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
