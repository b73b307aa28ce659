mod auth;

pub use auth::CacheError;
pub use auth::TokenCache;
