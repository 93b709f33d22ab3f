pub mod artifact;
pub mod config;
pub mod export;
pub mod job;
pub mod language;
