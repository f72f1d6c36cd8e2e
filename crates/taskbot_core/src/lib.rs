pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod registry;
pub mod session;
pub mod storage;
pub mod timer;
