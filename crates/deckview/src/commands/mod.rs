pub mod completion;
pub mod config;
