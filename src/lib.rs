//! Client for the Docker licensing service.
//!
//! Authenticates against the Hub identity service, reads organization,
//! subscription and license data from the licensing backend, and checks
//! issued licenses. A [`LicensingClient`] is built once from a [`Config`]
//! whose base64 PEM public key must load; auth tokens are passed per call
//! through a [`RequestContext`].
//!
//! ```no_run
//! use licensing_client::{Config, LicensingClient, RequestContext};
//!
//! # async fn run(public_key: &str) -> licensing_client::LicensingResult<()> {
//! let client = LicensingClient::new(Config::new("https://store.docker.com", public_key)?)?;
//! let ctx = RequestContext::new();
//!
//! let token = client.login_via_auth(&ctx, "jane", "secret").await?;
//! for sub in client.list_subscriptions(&ctx, &token, "jane-id").await? {
//!     let license = client.download_license_from_hub(&ctx, &token, &sub.id).await?;
//!     let check = client.verify_license(&ctx, &license).await?;
//!     println!("{} expires {:?}", sub.id, check.expiration);
//! }
//! # Ok(())
//! # }
//! ```

pub mod licensing;

pub use licensing::*;
