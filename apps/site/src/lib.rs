pub mod api_client;
pub mod config;
pub mod contact;
pub mod errors;
pub mod logging;
pub mod models;
pub mod routes;
pub mod state;
pub mod submission;
pub mod timeline;
