//! roadnet: command-line front end for roadnet-core.
//!
//! Loads a road network from the text edge-list format, resolves query
//! settings from defaults, a TOML file, environment and flags, runs a single
//! earliest-arrival query and writes the result as text or JSON.

pub mod config;
pub mod load;
pub mod logging;
pub mod path;
pub mod sink;
pub mod state;
pub mod status;
pub mod util;
