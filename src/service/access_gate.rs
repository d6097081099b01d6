//! Shared-secret gate in front of the admin console.
//!
//! This is a UI convenience, not an authorization boundary: the code ships with the
//! program and the attempt counter resets whenever the gate is closed. It controls
//! whether the console is shown, nothing more. Do not treat it as access control.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::GateConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked { attempts: u32 },
    /// Too many wrong codes. Returns to `Locked { attempts: 0 }` once the lockout elapses.
    Denied { since: Instant },
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateOutcome {
    Unlocked,
    Rejected { attempt: u32, max_attempts: u32, remaining: u32, message: String },
    Denied { message: String },
    /// Submission while denied; nothing was evaluated.
    Refused { retry_in_ms: u64 },
    EmptyCode,
}

/// Serializable view of the gate for the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateView {
    pub state: &'static str,
    pub attempts: u32,
    pub max_attempts: u32,
    pub retry_in_ms: Option<u64>,
}

pub type SharedGate = Arc<Mutex<AccessGate>>;

pub struct AccessGate {
    code: String,
    max_attempts: u32,
    lockout: Duration,
    state: GateState,
}

impl AccessGate {
    pub fn new(config: &GateConfig) -> Self {
        AccessGate {
            code: config.code.clone(),
            max_attempts: config.max_attempts,
            lockout: config.lockout(),
            state: GateState::Locked { attempts: 0 },
        }
    }

    pub fn shared(config: &GateConfig) -> SharedGate {
        Arc::new(Mutex::new(AccessGate::new(config)))
    }

    /// Current state, after expiring an elapsed lockout.
    pub fn state(&mut self, now: Instant) -> GateState {
        self.refresh(now);
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Move `Denied` back to `Locked(0)` once the lockout has elapsed.
    /// Returns true when that happened, meaning the gate UI should close.
    pub fn refresh(&mut self, now: Instant) -> bool {
        if let GateState::Denied { since } = self.state {
            if now.saturating_duration_since(since) >= self.lockout {
                info!("Admin gate lockout elapsed, gate reset");
                self.state = GateState::Locked { attempts: 0 };
                return true;
            }
        }
        false
    }

    pub fn submit(&mut self, code: &str, now: Instant) -> GateOutcome {
        self.refresh(now);
        let attempts = match self.state {
            GateState::Unlocked => return GateOutcome::Unlocked,
            GateState::Denied { since } => {
                let retry_in = self.lockout.saturating_sub(now.saturating_duration_since(since));
                return GateOutcome::Refused { retry_in_ms: retry_in.as_millis() as u64 };
            }
            GateState::Locked { attempts } => attempts,
        };

        if code.is_empty() {
            return GateOutcome::EmptyCode;
        }

        // The input field upper-cases as the user types.
        if code.to_uppercase() == self.code {
            info!("Admin gate unlocked");
            self.state = GateState::Unlocked;
            return GateOutcome::Unlocked;
        }

        let attempt = attempts + 1;
        if attempt >= self.max_attempts {
            warn!(attempt, "Admin gate denied after too many wrong codes");
            self.state = GateState::Denied { since: now };
            GateOutcome::Denied { message: "Too many failed attempts. Access denied.".to_string() }
        } else {
            warn!(attempt, "Wrong admin gate code");
            self.state = GateState::Locked { attempts: attempt };
            GateOutcome::Rejected {
                attempt,
                max_attempts: self.max_attempts,
                remaining: self.max_attempts - attempt,
                message: format!("Invalid code. Attempt {}/{}", attempt, self.max_attempts),
            }
        }
    }

    /// Close the gate UI or leave the console. Always back to `Locked(0)`.
    pub fn close(&mut self) {
        self.state = GateState::Locked { attempts: 0 };
    }

    pub fn view(&mut self, now: Instant) -> GateView {
        self.refresh(now);
        match self.state {
            GateState::Locked { attempts } => GateView {
                state: "locked",
                attempts,
                max_attempts: self.max_attempts,
                retry_in_ms: None,
            },
            GateState::Denied { since } => GateView {
                state: "denied",
                attempts: self.max_attempts,
                max_attempts: self.max_attempts,
                retry_in_ms: Some(
                    self.lockout.saturating_sub(now.saturating_duration_since(since)).as_millis() as u64,
                ),
            },
            GateState::Unlocked => GateView {
                state: "unlocked",
                attempts: 0,
                max_attempts: self.max_attempts,
                retry_in_ms: None,
            },
        }
    }
}
