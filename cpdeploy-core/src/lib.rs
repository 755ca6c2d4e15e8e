//! cpdeploy Core
//!
//! Core types for the cpdeploy deployment step.
//!
//! This crate contains:
//! - Domain types: the deployment record and the completion-watch semantics
//! - DTOs: wire shapes for cPanel's UAPI responses

pub mod domain;
pub mod dto;
