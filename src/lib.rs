pub mod changelog;
pub mod cli;
pub mod codename;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod output;
pub mod release;
pub mod themes;
pub mod ui;

pub use error::{Result, TagtasticError};
