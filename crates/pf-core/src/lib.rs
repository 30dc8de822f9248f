//! # pf-core
//!
//! Core types for the pocketforge conversion pipeline.
//!
//! This crate provides:
//!
//! - **Error taxonomy** ([`Error`]) -- one variant per failure class, with a
//!   process exit code mapping for the CLI.
//! - **Media types** ([`SourceVideo`], [`TargetResolution`], [`StreamKind`])
//!   and the pure resolution planner ([`plan`]).
//! - **Settings** ([`ConversionSettings`], [`PlanLimits`], [`Threads`]) with
//!   defaults matching the stock encode profile.

pub mod config;
pub mod error;
pub mod media;

// ---- Re-exports for convenience ----

pub use config::{ConversionSettings, PlanLimits, Threads};
pub use error::{Error, Result};
pub use media::{plan, SourceVideo, StreamKind, TargetResolution};
