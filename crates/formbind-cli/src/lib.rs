//! Library half of the `formbind` command-line tool.

#![deny(unsafe_code)]

pub mod config;
pub mod logging;
pub mod render;
