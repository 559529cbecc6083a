pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod storage;
