pub mod auth;
pub mod failure;
pub mod gateway;
pub mod prompt;
