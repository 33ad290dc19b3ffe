pub mod client;
pub mod reports;
pub mod transport;
pub mod types;

pub use client::{ApiClient, ApiContext};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, MinreqTransport};
pub use types::*;
