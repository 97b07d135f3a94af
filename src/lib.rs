pub mod api;
pub mod auth;
pub mod client;
pub mod config;
mod error;
pub mod session;
pub mod storage;

pub use self::{client::Client, config::Config, error::Error};
