pub mod api;
pub mod app_state;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod llm;
pub mod normalizer;
pub mod pipeline;
pub mod recognizer;
pub mod store;
