//! budgetctl: allocate budgets to services running in a managed model
//!
//! Layers, innermost first:
//! - `domain`: budget specs, allocation requests, model selectors
//! - `application`: the `allocate` and `update-allocation` commands
//! - `infrastructure`: local model stores, authenticated HTTP session, budget API client
//! - `cli`: argument parsing and dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
