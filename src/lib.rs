//! review-robot: merge eligibility and authorization for pull requests
//!
//! The library decides whether a pull request may be merged and who may run
//! review commands on it:
//!
//! - [`audit`] checks labels against the merge policy and the operation log
//! - [`ownership`] answers whether a login owns every sig directory a PR touches
//! - [`freeze`] finds freeze windows covering the target branch
//! - [`merge`] combines them into a [`merge::MergeVerdict`] and performs the merge
//! - [`handlers`] runs the command and event handlers for webhook deliveries
//!
//! Everything remote goes through [`platform::PlatformService`].

pub mod audit;
pub mod auth;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod freeze;
pub mod handlers;
pub mod labels;
pub mod merge;
pub mod ownership;
pub mod permission;
pub mod platform;
pub mod types;

pub use error::{Error, Result};
