// src/lib.rs
#![crate_type = "lib"]
#![crate_name = "navigator"]

// Core modules
pub mod application;
pub mod domain;
pub mod infrastructure;

// Persistence service
pub mod server;

// CLI modules
pub mod cli;
pub mod config;
pub mod exitcode;
pub mod util;
