#![warn(clippy::all, missing_docs)]

//! Core domain logic for the openrev harvester.
//!
//! This crate hosts the configuration handling, the authenticated
//! OpenReview API client, the submission extraction/aggregation logic,
//! and the JSON export layers used by the command-line frontend.

pub mod client;
pub mod config;
pub mod extract;
pub mod manifest;
pub mod models;
pub mod store;

pub use client::{NoteQuery, OpenReviewClient};
pub use config::AppConfig;
pub use extract::{InvalidStatusError, SubmissionExtractor, SubmissionStatus};
pub use manifest::ExportMetadata;
pub use models::{AcceptedRecord, ContentMap, Group, Note, Reply, WorkshopRecord};
pub use store::ExportStore;
