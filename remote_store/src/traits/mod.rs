//! Traits for remote operations
//!
//! This module contains the traits that define the interface to the remote
//! data service.

pub mod core;

pub use core::{IdFilter, RemoteStore};
