pub mod cli;
pub mod gateway;
pub mod runtime;
