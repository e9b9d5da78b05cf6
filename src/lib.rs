pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod employees;
pub mod error;
pub mod graphql;
pub mod state;
pub mod uploads;
pub mod validation;

#[cfg(test)]
mod testing;
