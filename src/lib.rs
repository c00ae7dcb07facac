pub mod app;
pub mod changes;
pub mod config;
pub mod install;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod rdjson;
