pub mod client;
pub mod credentials;
pub mod types;

pub use client::OAuthClient;
pub use credentials::{JwtConfig, read_key_file};
pub use types::{ANALYTICS_READONLY_SCOPE, AccessToken};
