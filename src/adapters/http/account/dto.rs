//! HTTP DTOs for membership and account endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{GetMembershipResult, LoginResult};
use crate::domain::foundation::Timestamp;
use crate::domain::membership::{Membership, MembershipTier};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MembershipQuery {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetPasswordRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub ok: bool,
    pub active: bool,
    pub membership: Option<Membership>,
}

impl From<GetMembershipResult> for MembershipResponse {
    fn from(result: GetMembershipResult) -> Self {
        Self {
            ok: true,
            active: result.active,
            membership: result.membership,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub ok: bool,
    pub email: String,
    pub plan_id: String,
    pub tier: MembershipTier,
    /// `None` for memberships that never expire.
    pub end_at: Option<Timestamp>,
    pub has_password: bool,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            ok: true,
            email: result.membership.email.as_str().to_string(),
            plan_id: result.membership.plan_id,
            tier: result.membership.tier,
            end_at: result.membership.end_at,
            has_password: result.has_password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPasswordResponse {
    pub ok: bool,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::EmailAddress;

    #[test]
    fn login_response_uses_camel_case() {
        let membership = Membership::activate(
            EmailAddress::parse("a@x.com").unwrap(),
            "lifetime",
            Timestamp::now(),
        );
        let response = LoginResponse::from(LoginResult {
            membership,
            has_password: true,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["planId"], "lifetime");
        assert_eq!(json["tier"], "pro");
        assert_eq!(json["hasPassword"], true);
        assert!(json["endAt"].is_null());
    }

    #[test]
    fn login_request_tolerates_missing_password() {
        let request: LoginRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(request.email.as_deref(), Some("a@x.com"));
        assert!(request.password.is_none());
    }
}
