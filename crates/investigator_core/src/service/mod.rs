//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case level APIs.
//! - Keep web/CLI layers decoupled from storage details.

pub mod character_service;
pub mod stat_service;
