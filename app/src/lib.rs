pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod navigation;
pub mod permissions;
pub mod repositories;
pub mod services;
pub mod session;
pub mod state;
pub mod types;
pub mod utils;
