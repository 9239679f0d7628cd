// Licensing service client: trust anchor, request wiring, remote operations

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod key;
pub mod license;
pub mod request;
pub mod types;

pub use client::LicensingClient;
pub use config::*;
pub use error::{Fields, LicensingError, LicensingResult, ResultExt};
pub use key::{load_public_key, PublicKey};
pub use license::parse_license;
pub use request::{default_error_summary, message_error_summary, ErrorSummary, RequestContext};
pub use types::*;
