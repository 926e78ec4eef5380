pub mod login;

pub use login::{LoginHandler, LoginRequest, LoginResponse};
