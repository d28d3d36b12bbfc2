//! Terminal front end of the chaos admin console.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod output;
pub mod render;
pub mod timing;
