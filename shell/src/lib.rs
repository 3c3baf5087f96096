pub mod types;
pub mod error;
pub mod config;
pub mod parser;
pub mod pipe;
pub mod job;
pub mod signals;
pub mod global;
pub mod builtin;
pub mod prompt;
pub mod eval;
