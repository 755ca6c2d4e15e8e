//! Core domain types
//!
//! This module contains the domain structures shared by the client and the
//! driver: the deployment record cPanel hands back on creation, the status
//! entries it reports while a deployment runs, and the normalized signals
//! the completion watch works with.

pub mod deployment;
pub mod watch;
