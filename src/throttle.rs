//! Auth attempt throttle.
//!
//! Tracks consecutive upstream rate-limit signals for the whole process and
//! computes an exponential backoff wait, so callers can tell clients how
//! long to hold off instead of relaying whatever the provider said.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use utoipa::ToSchema;

use crate::error::AuthError;

const TRIGGER_WINDOW: Duration = Duration::from_secs(5 * 60);
const BASE_WAIT_MINUTES: u64 = 2;
const MAX_WAIT_MINUTES: u64 = 15;

/// Read-only snapshot of the throttle, exposed on the diagnostics surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ThrottleStatus {
    /// When the most recent rate-limit signal was observed.
    pub last_trigger_time: Option<DateTime<Utc>>,
    /// Signals seen without a five minute gap between them.
    pub consecutive_count: u32,
    /// Whether the wait computed for the current count is still running.
    pub in_cooldown: bool,
}

/// Process-wide backoff tracker, shared by every auth operation.
///
/// One instance lives for the process lifetime and is handed to handlers as
/// an extension. State is guarded by a mutex: two near-simultaneous
/// triggers must not observe the same count.
#[derive(Debug, Default)]
pub struct Throttle {
    state: Mutex<ThrottleState>,
}

#[derive(Debug, Default)]
struct ThrottleState {
    last_trigger: Option<DateTime<Utc>>,
    consecutive: u32,
}

impl Throttle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds raw provider error text into the closed failure taxonomy.
    ///
    /// Matching is case insensitive and ordered. The rate-limit branch is
    /// the only one that mutates throttle state; unrecognized text maps to
    /// `AuthError::Internal` with the original detail dropped.
    pub fn classify(&self, error_text: &str, operation: &str) -> AuthError {
        let message = error_text.to_lowercase();

        if message.contains("rate limit exceeded") || message.contains("too many requests") {
            let wait_minutes = self.record_trigger();
            AuthError::RateLimited {
                operation: operation.to_string(),
                wait_minutes,
            }
        } else if message.contains("user already registered") {
            AuthError::DuplicateUser
        } else if message.contains("invalid login credentials") {
            AuthError::InvalidCredentials
        } else if message.contains("email not confirmed") {
            AuthError::UnconfirmedEmail
        } else if message.contains("signup disabled") {
            AuthError::RegistrationDisabled
        } else {
            AuthError::Internal
        }
    }

    /// Records a rate-limit signal and returns the wait in whole minutes.
    pub fn record_trigger(&self) -> u64 {
        self.record_trigger_at(Utc::now())
    }

    fn record_trigger_at(&self, now: DateTime<Utc>) -> u64 {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        state.consecutive = match state.last_trigger {
            Some(last) if within_trigger_window(last, now) => state.consecutive.saturating_add(1),
            _ => 1,
        };
        state.last_trigger = Some(now);

        wait_minutes(state.consecutive)
    }

    /// Snapshot of the current state. No side effects.
    #[must_use]
    pub fn status(&self) -> ThrottleStatus {
        self.status_at(Utc::now())
    }

    fn status_at(&self, now: DateTime<Utc>) -> ThrottleStatus {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let in_cooldown = state.last_trigger.is_some_and(|last| {
            let cooldown_seconds =
                i64::try_from(wait_minutes(state.consecutive) * 60).unwrap_or(i64::MAX);
            now.signed_duration_since(last).num_seconds() < cooldown_seconds
        });

        ThrottleStatus {
            last_trigger_time: state.last_trigger,
            consecutive_count: state.consecutive,
            in_cooldown,
        }
    }
}

/// Strictly less than five minutes since the previous trigger.
fn within_trigger_window(last: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let window_seconds = i64::try_from(TRIGGER_WINDOW.as_secs()).unwrap_or(i64::MAX);
    now.signed_duration_since(last).num_seconds() < window_seconds
}

/// Backoff schedule: 2, 4, 8, then capped at 15 minutes.
fn wait_minutes(consecutive: u32) -> u64 {
    let doubling = 2_u64.saturating_pow(consecutive.saturating_sub(1));
    BASE_WAIT_MINUTES
        .saturating_mul(doubling)
        .min(MAX_WAIT_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn backoff_schedule_doubles_then_saturates() {
        assert_eq!(wait_minutes(1), 2);
        assert_eq!(wait_minutes(2), 4);
        assert_eq!(wait_minutes(3), 8);
        assert_eq!(wait_minutes(4), 15);
        assert_eq!(wait_minutes(5), 15);
        assert_eq!(wait_minutes(100), 15);
    }

    #[test]
    fn triggers_spaced_beyond_window_never_escalate() {
        let throttle = Throttle::new();
        let start = base_time();

        for k in 0..4 {
            let now = start + chrono::Duration::minutes(6 * k);
            assert_eq!(throttle.record_trigger_at(now), 2);
            assert_eq!(throttle.status_at(now).consecutive_count, 1);
        }
    }

    #[test]
    fn consecutive_triggers_within_window_count_up() {
        let throttle = Throttle::new();
        let start = base_time();

        for k in 0..5_u32 {
            let now = start + chrono::Duration::minutes(i64::from(k));
            throttle.record_trigger_at(now);
            assert_eq!(throttle.status_at(now).consecutive_count, k + 1);
        }
    }

    #[test]
    fn gap_of_exactly_five_minutes_resets_the_count() {
        let throttle = Throttle::new();
        let start = base_time();

        assert_eq!(throttle.record_trigger_at(start), 2);
        let wait = throttle.record_trigger_at(start + chrono::Duration::minutes(5));
        assert_eq!(wait, 2);
        assert_eq!(
            throttle
                .status_at(start + chrono::Duration::minutes(5))
                .consecutive_count,
            1
        );
    }

    #[test]
    fn gap_just_under_five_minutes_still_escalates() {
        let throttle = Throttle::new();
        let start = base_time();

        throttle.record_trigger_at(start);
        let now = start + chrono::Duration::minutes(5) - chrono::Duration::seconds(1);
        assert_eq!(throttle.record_trigger_at(now), 4);
        assert_eq!(throttle.status_at(now).consecutive_count, 2);
    }

    #[test]
    fn status_is_idempotent_between_triggers() {
        let throttle = Throttle::new();
        let start = base_time();

        throttle.record_trigger_at(start);
        let later = start + chrono::Duration::seconds(30);
        assert_eq!(throttle.status_at(later), throttle.status_at(later));
    }

    #[test]
    fn fresh_throttle_reports_no_cooldown() {
        let throttle = Throttle::new();
        let status = throttle.status_at(base_time());

        assert_eq!(status.last_trigger_time, None);
        assert_eq!(status.consecutive_count, 0);
        assert!(!status.in_cooldown);
    }

    #[test]
    fn cooldown_ends_once_the_wait_has_elapsed() {
        let throttle = Throttle::new();
        let start = base_time();

        throttle.record_trigger_at(start);
        assert!(
            throttle
                .status_at(start + chrono::Duration::minutes(1))
                .in_cooldown
        );
        // First wait is two minutes; the boundary itself is out of cooldown.
        assert!(
            !throttle
                .status_at(start + chrono::Duration::minutes(2))
                .in_cooldown
        );
    }

    #[test]
    fn classify_rate_limit_escalates_wait_times() {
        let throttle = Throttle::new();

        for expected in [2, 4, 8, 15, 15] {
            let error = throttle.classify("Rate limit exceeded", "login");
            assert_eq!(
                error,
                AuthError::RateLimited {
                    operation: "login".to_string(),
                    wait_minutes: expected,
                }
            );
            assert_eq!(error.retry_after_seconds(), Some(expected * 60));
        }
    }

    #[test]
    fn classify_matches_are_case_insensitive() {
        let throttle = Throttle::new();

        assert!(matches!(
            throttle.classify("Too Many Requests", "login"),
            AuthError::RateLimited { .. }
        ));
        assert_eq!(
            throttle.classify("USER ALREADY REGISTERED", "register"),
            AuthError::DuplicateUser
        );
    }

    #[test]
    fn classify_duplicate_user_leaves_state_untouched() {
        let throttle = Throttle::new();

        assert_eq!(
            throttle.classify("User already registered", "register"),
            AuthError::DuplicateUser
        );

        let status = throttle.status();
        assert_eq!(status.last_trigger_time, None);
        assert_eq!(status.consecutive_count, 0);
    }

    #[test]
    fn classify_covers_the_whole_taxonomy() {
        let throttle = Throttle::new();

        assert_eq!(
            throttle.classify("Invalid login credentials", "login"),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            throttle.classify("Email not confirmed", "login"),
            AuthError::UnconfirmedEmail
        );
        assert_eq!(
            throttle.classify("Signup disabled", "register"),
            AuthError::RegistrationDisabled
        );
    }

    #[test]
    fn classify_unknown_text_hides_the_detail() {
        let throttle = Throttle::new();

        let error = throttle.classify("connection refused by postgres-17", "login");
        assert_eq!(error, AuthError::Internal);
        assert_eq!(error.public_message(), "Internal server error");

        let status = throttle.status();
        assert_eq!(status.consecutive_count, 0);
    }

    #[test]
    fn concurrent_triggers_are_not_lost() {
        let throttle = Throttle::new();
        let threads = 8;
        let triggers_per_thread = 5;

        std::thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| {
                    for _ in 0..triggers_per_thread {
                        throttle.record_trigger();
                    }
                });
            }
        });

        assert_eq!(
            throttle.status().consecutive_count,
            threads * triggers_per_thread
        );
    }

    #[test]
    fn status_serializes_null_for_missing_trigger_time() {
        let throttle = Throttle::new();
        let value = serde_json::to_value(throttle.status()).unwrap();

        assert!(value["last_trigger_time"].is_null());
        assert_eq!(value["consecutive_count"], 0);
        assert_eq!(value["in_cooldown"], false);
    }
}
