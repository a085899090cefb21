pub mod audio;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod progress;
pub mod quiz;
pub mod report;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod study;
