use crate::licensing::config::endpoints;
use crate::licensing::error::LicensingResult;
use crate::licensing::request::{ApiTransport, RequestContext};
use crate::licensing::types::{
    Account, AccountCreationRequest, CheckResponse, Credentials, IssuedLicense, LoginRequest, Org,
    PaginatedOrgs, PaginationParams, SubscriptionCreationRequest, SubscriptionDetail, User,
};
use reqwest::Method;

// ============================================================================
// HTTP Client
// ============================================================================

/// One method per licensing service endpoint.
///
/// Authenticated calls read the token from the `RequestContext`; nothing here
/// wraps errors with caller context.
#[derive(Clone, Debug)]
pub struct LicenseApiClient {
    transport: ApiTransport,
}

impl LicenseApiClient {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    /// Exchange a username and password for a token
    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> LicensingResult<Credentials> {
        self.transport
            .request_no_auth(ctx, Method::POST, endpoints::LOGIN)
            .json(&LoginRequest { username, password })
            .send_json()
            .await
    }

    /// Fetch one page of the caller's organizations
    pub async fn get_user_orgs(
        &self,
        ctx: &RequestContext,
        params: &PaginationParams,
    ) -> LicensingResult<Vec<Org>> {
        let page: PaginatedOrgs = self
            .transport
            .request(ctx, Method::GET, endpoints::USER_ORGS)
            .query(params)
            .send_json()
            .await?;

        Ok(page.results)
    }

    pub async fn get_user_by_name(&self, ctx: &RequestContext, username: &str) -> LicensingResult<User> {
        self.transport
            .request_no_auth(ctx, Method::GET, &endpoints::user(username))
            .send_json()
            .await
    }

    /// Check an issued license with the licensing service
    pub async fn check(
        &self,
        ctx: &RequestContext,
        license: &IssuedLicense,
    ) -> LicensingResult<CheckResponse> {
        self.transport
            .request(ctx, Method::POST, endpoints::LICENSE_CHECK)
            .json(license)
            .send_json()
            .await
    }

    pub async fn get_account(&self, ctx: &RequestContext, docker_id: &str) -> LicensingResult<Account> {
        self.transport
            .request(ctx, Method::GET, &endpoints::account(docker_id))
            .send_json()
            .await
    }

    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        docker_id: &str,
        request: &AccountCreationRequest,
    ) -> LicensingResult<Account> {
        self.transport
            .request(ctx, Method::PUT, &endpoints::account(docker_id))
            .json(request)
            .send_json()
            .await
    }

    pub async fn create_subscription(
        &self,
        ctx: &RequestContext,
        request: &SubscriptionCreationRequest,
    ) -> LicensingResult<SubscriptionDetail> {
        self.transport
            .request(ctx, Method::POST, endpoints::SUBSCRIPTIONS)
            .json(request)
            .send_json()
            .await
    }

    /// List subscriptions matching the given query filters
    pub async fn list_subscriptions(
        &self,
        ctx: &RequestContext,
        filters: &[(&str, &str)],
    ) -> LicensingResult<Vec<SubscriptionDetail>> {
        self.transport
            .request(ctx, Method::GET, endpoints::SUBSCRIPTIONS)
            .query(filters)
            .send_json()
            .await
    }

    pub async fn get_license_file(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
    ) -> LicensingResult<IssuedLicense> {
        self.transport
            .request(ctx, Method::GET, &endpoints::license_file(subscription_id))
            .send_json()
            .await
    }
}
