//! Session token issuance and verification.
//!
//! Sessions are stateless JWTs carrying the fields the UI needs to render
//! without a round trip. A small in-memory cutoff map forces re-login when
//! a user's role changes or the account is deactivated: any token issued
//! before the recorded cutoff is rejected even though its signature and
//! expiry are still valid.

use crate::error::{AdminError, Result};
use crate::rbac::Role;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════════════
// Claims
// ═══════════════════════════════════════════════════════════════════════════════

/// JWT claims for an authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: Uuid,
    /// Personnel number, 7 digits.
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    pub role: Role,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Token ID.
    pub jti: Uuid,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Session Manager
// ═══════════════════════════════════════════════════════════════════════════════

/// Issues and verifies session tokens.
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    /// user id -> unix second before which their tokens are invalid.
    invalidated_before: DashMap<Uuid, i64>,
}

impl SessionManager {
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl: Duration::hours(ttl_hours as i64),
            invalidated_before: DashMap::new(),
        }
    }

    /// Issue a token for the given identity.
    pub fn issue(
        &self,
        user_id: Uuid,
        employee_id: &str,
        role: Role,
        first_name: &str,
        last_name: &str,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            employee_id: employee_id.to_string(),
            role,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AdminError::internal(format!("token encoding failed: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Rejects expired tokens, bad signatures, and tokens issued before the
    /// user's invalidation cutoff.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if let Some(cutoff) = self.invalidated_before.get(&claims.sub) {
            if claims.iat < *cutoff {
                return Err(AdminError::unauthorized(format!(
                    "session for user {} predates invalidation cutoff",
                    claims.sub
                )));
            }
        }

        Ok(claims)
    }

    /// Invalidate every session the user holds right now.
    ///
    /// Called when a user's role changes or the account is deactivated.
    pub fn invalidate_user(&self, user_id: Uuid) {
        let now = Utc::now().timestamp();
        // A cutoff older than the TTL can no longer match a live token;
        // drop those entries so the map tracks recent invalidations only.
        let horizon = now - self.ttl.num_seconds();
        self.invalidated_before.retain(|_, cutoff| *cutoff > horizon);
        // +1 so a token issued in the same second is also rejected.
        self.invalidated_before.insert(user_id, now + 1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn manager() -> SessionManager {
        SessionManager::new("test-secret-at-least-32-bytes-long", 12)
    }

    #[test]
    fn test_issue_and_verify() {
        let mgr = manager();
        let id = Uuid::new_v4();
        let token = mgr
            .issue(id, "1234567", Role::HrRegional, "Анна", "Петрова")
            .unwrap();
        let claims = mgr.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.employee_id, "1234567");
        assert_eq!(claims.role, Role::HrRegional);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_use_camel_case_on_the_wire() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            employee_id: "1234567".to_string(),
            role: Role::Employee,
            first_name: "Иван".to_string(),
            last_name: "Иванов".to_string(),
            jti: Uuid::new_v4(),
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"employeeId\""));
        assert!(json.contains("\"firstName\""));
        assert!(json.contains("\"role\":\"employee\""));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let mgr = manager();
        let token = mgr
            .issue(Uuid::new_v4(), "1234567", Role::Employee, "a", "b")
            .unwrap();
        let other = SessionManager::new("completely-different-secret-value", 12);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_invalidation_rejects_existing_sessions() {
        let mgr = manager();
        let id = Uuid::new_v4();
        let token = mgr
            .issue(id, "1234567", Role::HrLine, "a", "b")
            .unwrap();
        assert!(mgr.verify(&token).is_ok());

        mgr.invalidate_user(id);
        let err = mgr.verify(&token).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn test_invalidation_is_per_user() {
        let mgr = manager();
        let victim = Uuid::new_v4();
        let bystander = Uuid::new_v4();
        let token = mgr
            .issue(bystander, "7654321", Role::Employee, "a", "b")
            .unwrap();
        mgr.invalidate_user(victim);
        assert!(mgr.verify(&token).is_ok());
    }

    #[test]
    fn test_expired_cutoffs_are_pruned() {
        let mgr = manager();
        let stale = Uuid::new_v4();
        // Older than the 12h TTL, so no live token can carry an earlier iat.
        mgr.invalidated_before
            .insert(stale, Utc::now().timestamp() - 100_000);

        let fresh = Uuid::new_v4();
        mgr.invalidate_user(fresh);

        assert!(!mgr.invalidated_before.contains_key(&stale));
        assert!(mgr.invalidated_before.contains_key(&fresh));
    }
}
