pub mod models;
pub mod port;
pub mod service;
