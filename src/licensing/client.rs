use crate::licensing::api::LicenseApiClient;
use crate::licensing::config::{
    default_http_client, Config, PRODUCT_FAMILY_PREFIX, TRIAL_PRODUCT_ID, TRIAL_RATE_PLAN_ID,
    TRIAL_SUBSCRIPTION_NAME,
};
use crate::licensing::error::{Fields, LicensingResult, ResultExt};
use crate::licensing::key::{load_public_key, PublicKey};
use crate::licensing::license;
use crate::licensing::request::{ApiTransport, RequestContext};
use crate::licensing::types::{
    AccountCreationRequest, CheckResponse, EusaState, IssuedLicense, Org, PaginationParams,
    Profile, SubscriptionCreationRequest, SubscriptionDetail, User,
};

/// Client for the licensing service.
///
/// Immutable once built. Tokens are passed per call and never kept, so one
/// instance can be shared between concurrent callers.
#[derive(Clone, Debug)]
pub struct LicensingClient {
    api: LicenseApiClient,
    public_key: PublicKey,
}

impl LicensingClient {
    /// Build a client, failing if the configured public key does not load
    pub fn new(config: Config) -> LicensingResult<Self> {
        let public_key = load_public_key(&config.public_key)?;

        let http_client = match config.http_client {
            Some(client) => client,
            None => default_http_client()?,
        };

        Ok(Self {
            api: LicenseApiClient::new(ApiTransport::new(http_client, config.base_uri)),
            public_key,
        })
    }

    /// Key used to validate issued licenses
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn api(&self) -> &LicenseApiClient {
        &self.api
    }

    /// Log in and return the auth token for subsequent calls
    pub async fn login_via_auth(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> LicensingResult<String> {
        let creds = self
            .api
            .login(ctx, username, password)
            .await
            .with_fields(Fields::new().with("username", username))?;

        Ok(creds.token)
    }

    pub async fn get_hub_user_orgs(
        &self,
        ctx: &RequestContext,
        auth_token: &str,
    ) -> LicensingResult<Vec<Org>> {
        let ctx = ctx.with_token(auth_token);

        self.api
            .get_user_orgs(&ctx, &PaginationParams::default())
            .await
            .with_message("failed to get orgs for user")
    }

    pub async fn get_hub_user_by_name(
        &self,
        ctx: &RequestContext,
        username: &str,
    ) -> LicensingResult<User> {
        self.api
            .get_user_by_name(ctx, username)
            .await
            .with_fields(Fields::new().with("username", username))
    }

    /// Check an issued license with the licensing service
    pub async fn verify_license(
        &self,
        ctx: &RequestContext,
        license: &IssuedLicense,
    ) -> LicensingResult<CheckResponse> {
        self.api
            .check(ctx, license)
            .await
            .with_message("failed to verify license")
    }

    /// Create a trial subscription, creating the billing account first when
    /// the Docker ID has none. Returns the new subscription id.
    ///
    /// There is no rollback: if the subscription step fails the account
    /// stays, and a retry finds it and skips creation.
    pub async fn generate_new_trial_subscription(
        &self,
        ctx: &RequestContext,
        auth_token: &str,
        docker_id: &str,
        email: &str,
    ) -> LicensingResult<String> {
        let ctx = ctx.with_token(auth_token);
        let id_and_email = || {
            Fields::new()
                .with("docker_id", docker_id)
                .with("email", email)
        };

        match self.api.get_account(&ctx, docker_id).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                let request = AccountCreationRequest {
                    profile: Profile {
                        email: email.to_string(),
                        ..Default::default()
                    },
                };
                self.api
                    .create_account(&ctx, docker_id, &request)
                    .await
                    .with_fields(id_and_email())?;
                tracing::info!(docker_id, "created billing account for trial");
            }
            Err(e) => return Err(e.with_fields(Fields::new().with("docker_id", docker_id))),
        }

        let request = SubscriptionCreationRequest {
            name: TRIAL_SUBSCRIPTION_NAME.to_string(),
            docker_id: docker_id.to_string(),
            product_id: TRIAL_PRODUCT_ID.to_string(),
            product_rate_plan: TRIAL_RATE_PLAN_ID.to_string(),
            eusa: Some(EusaState { accepted: true }),
        };
        let sub = self
            .api
            .create_subscription(&ctx, &request)
            .await
            .with_fields(id_and_email())?;

        Ok(sub.id)
    }

    /// List the Docker ID's subscriptions in the product family
    pub async fn list_subscriptions(
        &self,
        ctx: &RequestContext,
        auth_token: &str,
        docker_id: &str,
    ) -> LicensingResult<Vec<SubscriptionDetail>> {
        let ctx = ctx.with_token(auth_token);

        let subs = self
            .api
            .list_subscriptions(&ctx, &[("docker_id", docker_id)])
            .await
            .with_fields(Fields::new().with("docker_id", docker_id))?;

        Ok(product_family_subscriptions(subs))
    }

    pub async fn download_license_from_hub(
        &self,
        ctx: &RequestContext,
        auth_token: &str,
        subscription_id: &str,
    ) -> LicensingResult<IssuedLicense> {
        let ctx = ctx.with_token(auth_token);

        self.api
            .get_license_file(&ctx, subscription_id)
            .await
            .with_fields(Fields::new().with("subscription_id", subscription_id))
    }

    /// Parse a license file; see [`license::parse_license`]
    pub fn parse_license(&self, license: &[u8]) -> LicensingResult<IssuedLicense> {
        license::parse_license(license)
    }
}

// filter out subscriptions for other products
fn product_family_subscriptions(subs: Vec<SubscriptionDetail>) -> Vec<SubscriptionDetail> {
    subs.into_iter()
        .filter(|sub| sub.product_id.starts_with(PRODUCT_FAMILY_PREFIX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::licensing::error::LicensingError;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    fn sub(id: &str, product_id: &str) -> SubscriptionDetail {
        SubscriptionDetail {
            id: id.to_string(),
            product_id: product_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_product_family_filter() {
        let subs = vec![
            sub("1", "docker-ee"),
            sub("2", "docker-ce"),
            sub("3", "docker-ee-trial"),
            sub("4", ""),
            sub("5", "other-docker-ee"),
            sub("6", "DOCKER-EE"),
        ];

        let ids: Vec<_> = product_family_subscriptions(subs)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_new_rejects_invalid_base64_key() {
        let config = Config::new("https://store.example.com", "%%%").unwrap();
        let err = LicensingClient::new(config).unwrap_err();
        assert!(matches!(err, LicensingError::PublicKeyDecode { .. }));
    }

    #[test]
    fn test_new_rejects_non_pem_key() {
        let config = Config::new("https://store.example.com", BASE64.encode("plain text")).unwrap();
        let err = LicensingClient::new(config).unwrap_err();
        assert!(matches!(err, LicensingError::PublicKeyParse { .. }));
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LicensingClient>();
    }
}
