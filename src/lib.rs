pub mod config;
pub mod error;
pub mod grade;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod processor;
pub mod stats;
