use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SpinStatus {
    #[default]
    Idle,
    Spinning,
}

/// The spin whose animation is still playing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingSpin {
    pub token: String,
    pub wheel_id: String,
    pub segment_id: String,
    pub index: usize,
    pub target_rotation: f64,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
}

/// Two-state spin machine. At most one spin is in flight; there is no queue
/// and no way to cancel a running spin.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpinState {
    pub status: SpinStatus,
    pub pending: Option<PendingSpin>,
}

impl SpinState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_spinning(&self) -> bool {
        self.status == SpinStatus::Spinning
    }

    /// Enters `Spinning`. Rejected (returns false) while another spin is
    /// in flight.
    pub fn begin(&mut self, pending: PendingSpin) -> bool {
        if self.is_spinning() {
            return false;
        }
        *self = Self {
            status: SpinStatus::Spinning,
            pending: Some(pending),
        };
        true
    }

    /// Returns to `Idle` if `token` names the spin in flight, handing back
    /// the pending spin. Any other token leaves the state untouched.
    pub fn finish(&mut self, token: &str) -> Option<PendingSpin> {
        let matches = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.token == token);
        if !self.is_spinning() || !matches {
            return None;
        }
        self.status = SpinStatus::Idle;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(token: &str) -> PendingSpin {
        PendingSpin {
            token: token.into(),
            wheel_id: "w".into(),
            segment_id: "s".into(),
            index: 0,
            target_rotation: 1500.0,
            duration_ms: 4000,
            started_at: Utc::now(),
        }
    }

    #[test]
    fn starts_idle() {
        let state = SpinState::new();
        assert_eq!(state.status, SpinStatus::Idle);
        assert!(state.pending.is_none());
    }

    #[test]
    fn second_begin_is_rejected() {
        let mut state = SpinState::new();
        assert!(state.begin(pending("a")));
        assert!(!state.begin(pending("b")));
        assert_eq!(state.pending.as_ref().unwrap().token, "a");
    }

    #[test]
    fn finish_requires_matching_token() {
        let mut state = SpinState::new();
        state.begin(pending("a"));

        assert!(state.finish("b").is_none());
        assert!(state.is_spinning());

        let finished = state.finish("a").unwrap();
        assert_eq!(finished.token, "a");
        assert_eq!(state.status, SpinStatus::Idle);
        assert!(state.pending.is_none());

        assert!(state.finish("a").is_none());
    }

    #[test]
    fn can_spin_again_after_finish() {
        let mut state = SpinState::new();
        state.begin(pending("a"));
        state.finish("a");
        assert!(state.begin(pending("b")));
    }
}
