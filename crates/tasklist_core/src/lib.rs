pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod state;
pub mod view;

pub use client::TaskListClient;
