//! Use-case services.
//!
//! # Responsibility
//! - Compose repositories and record store adapters into school use-cases.
//! - Keep every use-case inside one unit of work.

pub mod school_service;
