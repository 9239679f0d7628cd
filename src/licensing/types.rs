use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Identity
// ============================================================================

/// Username/password pair exchanged for a token
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Token returned by the identity service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Credentials {
    pub token: String,
}

/// Hub user
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub location: String,
    pub company: String,
    pub profile_url: String,
    pub gravatar_url: String,
    #[serde(rename = "type")]
    pub user_type: String,
    pub date_joined: Option<DateTime<Utc>>,
}

/// Hub organization
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct Org {
    pub id: String,
    pub orgname: String,
    pub full_name: String,
    pub location: String,
    pub company: String,
    pub profile_url: String,
    pub gravatar_url: String,
    #[serde(rename = "type")]
    pub org_type: String,
    pub date_joined: Option<DateTime<Utc>>,
}

/// Page selection for paginated listings; unset values are left to the server
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// One page of organizations
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct PaginatedOrgs {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Org>,
}

// ============================================================================
// Licenses
// ============================================================================

/// License issued for a subscription
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct IssuedLicense {
    pub key_id: String,
    pub private_key: String,
    pub authorization: String,
}

/// Result of checking an issued license with the licensing service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct CheckResponse {
    pub expiration: Option<DateTime<Utc>>,
    pub token: String,
    pub max_engines: i64,
    pub scanning_enabled: bool,
    #[serde(rename = "licenseType")]
    pub license_type: String,
    pub tier: String,
    pub subscription_id: String,
    pub product_id: String,
    pub rate_plan: String,
    pub version: i64,
    pub grace_days: i64,
    pub metadata: HashMap<String, serde_json::Value>,
}

// ============================================================================
// Billing
// ============================================================================

/// Billing contact details
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct Profile {
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub company_name: String,
}

/// Billing account of a Docker ID
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct Account {
    pub docker_id: String,
    pub profile: Profile,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AccountCreationRequest {
    pub profile: Profile,
}

/// End user subscription agreement state
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct EusaState {
    pub accepted: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SubscriptionCreationRequest {
    pub name: String,
    pub docker_id: String,
    pub product_id: String,
    pub product_rate_plan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eusa: Option<EusaState>,
}

/// Subscription as reported by the billing service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct SubscriptionDetail {
    pub id: String,
    pub name: String,
    pub docker_id: String,
    pub product_id: String,
    pub product_rate_plan: String,
    pub state: String,
    pub start: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
    pub eusa: Option<EusaState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_skip_unset() {
        let params = PaginationParams::default();
        assert_eq!(serde_json::to_string(&params).unwrap(), "{}");

        let params = PaginationParams {
            page: Some(2),
            page_size: None,
        };
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"page":2}"#);
    }

    #[test]
    fn test_subscription_request_serialization() {
        let request = SubscriptionCreationRequest {
            name: "trial".to_string(),
            docker_id: "abc".to_string(),
            product_id: "docker-ee-trial".to_string(),
            product_rate_plan: "free-trial".to_string(),
            eusa: Some(EusaState { accepted: true }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["product_rate_plan"], "free-trial");
        assert_eq!(json["eusa"]["accepted"], true);
    }

    #[test]
    fn test_check_response_minimal() {
        let json = r#"{
            "expiration": "2027-01-10T00:00:00Z",
            "licenseType": "online",
            "max_engines": 10
        }"#;

        let response: CheckResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.license_type, "online");
        assert_eq!(response.max_engines, 10);
        assert!(response.expiration.is_some());
        assert!(!response.scanning_enabled);
        assert!(response.metadata.is_empty());
    }

    #[test]
    fn test_subscription_detail_ignores_unknown_fields() {
        let json = r#"{"id":"sub-1","product_id":"docker-ee","pricing_components":[]}"#;
        let sub: SubscriptionDetail = serde_json::from_str(json).unwrap();
        assert_eq!(sub.id, "sub-1");
        assert_eq!(sub.eusa, None);
    }
}
