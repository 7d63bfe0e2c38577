//! Session authentication for tenant- and manager-owned writes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use leasehold_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Caller identified by a verified Clerk session token.
///
/// Handlers that act on a tenant or manager take this extractor and then call
/// [`AuthUser::ensure_self`] with the identity named in the path or body.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The token's `sub` claim.
    pub clerk_id: String,
}

impl AuthUser {
    /// 403 unless the caller is `clerk_id`.
    pub fn ensure_self(&self, clerk_id: &str) -> Result<(), AppError> {
        if self.clerk_id == clerk_id {
            Ok(())
        } else {
            tracing::debug!(caller = %self.clerk_id, target = %clerk_id, "Ownership check failed");
            Err(CoreError::Forbidden("You can only act on your own account".into()).into())
        }
    }
}

fn unauthorized(message: &str) -> AppError {
    CoreError::Unauthorized(message.to_string()).into()
}

/// The token of a `Bearer` authorization header. The scheme is case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>",
        )),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let Some(verifier) = state.token_verifier.as_ref() else {
            tracing::warn!("Rejecting authenticated request: no session key configured");
            return Err(unauthorized("Authentication is not configured"));
        };

        let claims = verifier.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            clerk_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token_in_any_case() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert_matches!(
            bearer_token(&HeaderMap::new()),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
        for value in ["Basic dXNlcjpwdw==", "Bearer", "Bearer   ", "abc.def"] {
            assert_matches!(
                bearer_token(&headers(value)),
                Err(AppError::Core(CoreError::Unauthorized(_)))
            );
        }
    }

    #[test]
    fn ensure_self_allows_only_the_caller() {
        let user = AuthUser {
            clerk_id: "user_a".into(),
        };
        assert!(user.ensure_self("user_a").is_ok());
        assert_matches!(
            user.ensure_self("user_b"),
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
    }
}
