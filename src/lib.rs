pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod remote;
pub mod services;
pub mod state;
