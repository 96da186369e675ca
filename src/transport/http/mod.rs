pub mod auth;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod category;
    pub mod common;
    pub mod health;
    pub mod order;
    pub mod product;
}

pub use auth::{Authenticator, HeaderAuthenticator, Principal, Role};
pub use router::{create_router, ApiDoc};
pub use types::AppState;
