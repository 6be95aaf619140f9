// Authentication module
// Issues and refreshes JWT bearer tokens and guards the /api routes

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{obtain_token_handler, refresh_token_handler};
pub use middleware::AuthenticatedUser;
pub use models::{AccessTokenResponse, RefreshRequest, TokenPairResponse, TokenRequest, User};
pub use service::AuthService;
pub use token::{Claims, TokenService, TokenType};
