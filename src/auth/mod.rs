pub mod dto;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod resolvers;
pub mod services;

pub use resolvers::{AuthMutation, AuthQuery};
