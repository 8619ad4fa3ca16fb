pub mod config;
pub mod logging;

// Core modules
pub mod checksum;
pub mod downloader;
pub mod fetch_head;
pub mod url_model;
