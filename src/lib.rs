//! Client-side pipeline board core mirroring an external applicant tracking
//! service (ATS).
//!
//! The ATS stores application and stage data canonically; this crate derives
//! a coherent, deduplicated view of that state for a recruiter's multi-column
//! board and a candidate's (re)apply dashboard. There is no local database:
//! boards are rebuilt wholesale from fresh remote records and patched
//! optimistically when a stage move succeeds.

pub mod ats;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;
