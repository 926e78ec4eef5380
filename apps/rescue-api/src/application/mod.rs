use core_lib::CoreError;
use token::TokenError;

pub mod breed_import;
pub mod commands;
pub mod data_init;
pub mod middleware;
pub mod password;
pub mod token;

// Top-level error type for the application layer
#[derive(thiserror::Error, Debug)]
pub enum ApplicationError {
    #[error("Core Error: {0}")]
    Core(#[from] CoreError),

    #[error("Token Error: {0}")]
    Token(#[from] TokenError),

    #[error("Authorization Error: {0}")]
    Unauthorized(String),

    #[error("Validation Error: {0}")]
    Validation(String),
}
