pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod interrupt;
pub mod progress;
pub mod recognizer;
pub mod scanner;
