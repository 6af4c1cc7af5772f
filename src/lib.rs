//! assetree: equipment hierarchies for maintenance planning.
//!
//! Layers, inner to outer: `domain` (pure values and rules), `application`
//! (services over I/O traits), `infrastructure` (real I/O, wiring), `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
