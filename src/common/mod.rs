//! # Common Components
//!
//! Data structures and configuration shared by every transport.
//!
//! ## Modules
//!
//! - [`messages`]: Request, acknowledgment and error payloads exchanged with clients
//! - [`config`]: Configuration parsing utilities

pub mod config;
pub mod messages;
