pub mod apps;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod runner;
pub mod writer;
