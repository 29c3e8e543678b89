//! REDCap API client: project metadata and single-record export.

mod client;
mod credentials;
mod error;

pub use client::RedcapClient;
pub use credentials::ApiCredentials;
pub use error::RedcapError;
