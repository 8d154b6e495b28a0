#![forbid(unsafe_code)]

//! Terminal demo for the dropform engine.

pub mod app;
pub mod cli;
pub mod present;
