//! # Gardisto (Authentication Gateway)
//!
//! `gardisto` fronts a managed auth-and-database provider and exposes a small
//! HTTP API for registration, login, and role checks. Identities live in the
//! provider; this service keeps the profile rows next to them and shields the
//! provider from credential-stuffing bursts.
//!
//! ## Attempt Throttling
//!
//! Every provider rejection passes through a process-wide throttle that folds
//! raw error text into a closed failure taxonomy. Rate-limit rejections
//! escalate an exponential cooldown (2, 4, 8, then capped at 15 minutes);
//! a quiet gap of five minutes resets the escalation. Clients receive the
//! cooldown via `Retry-After` and can inspect it without tripping it on
//! `/api/auth/rate-limit-status`.
//!
//! ## Roles
//!
//! Each user carries exactly one role (`manager`, `employee`, `sponsor`).
//! Managers may create any employee profile; everyone else only their own.

pub mod api;
pub mod cli;
pub mod error;
pub mod provider;
pub mod throttle;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
