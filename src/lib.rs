pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod reporting;
pub mod store;
