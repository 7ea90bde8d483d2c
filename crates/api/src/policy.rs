//! Route-level policy engine.
//!
//! Evaluated once per incoming request, before any handler runs, using
//! two independently resolved identities: the HR admin (signed token
//! checked against the allow-list) and the employee (session cookie in
//! non-strict mode). The decision table routes page-level requests;
//! API routes fall under "other" and pass through to their own guards.
//!
//! Cookie hygiene: when an identity's cookie is *logically* invalid
//! (stale token, no matching record, expired or revoked session), the
//! response clears that specific cookie. A transient backend failure
//! while resolving must never clear — destroying a valid session over a
//! temporary database error is worse than skipping one cleanup.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use newhire_core::cookie::{self, extract_session_cookie};
use newhire_core::session::{evaluate_session, SessionMode};
use newhire_core::token::hash_token;
use newhire_db::repositories::OnboardingRepo;
use uuid::Uuid;

use crate::auth::admin::{validate_admin_token, ADMIN_COOKIE_NAME};
use crate::middleware::admin::admin_token_from_parts;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

/// Outcome of the policy decision for a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

/// Decide where a request may go, given the resolved identities.
///
/// Pure: identity resolution (and its error handling) happens in the
/// middleware; this table only maps `(path, admin?, employee?)` to a
/// decision. When both identities are present the admin column wins.
pub fn decide(path: &str, admin: bool, employee: Option<Uuid>) -> RouteDecision {
    match path {
        "/" | "/login" => {
            if admin {
                RouteDecision::Redirect("/dashboard".to_string())
            } else if let Some(id) = employee {
                RouteDecision::Redirect(format!("/onboarding/{id}"))
            } else if path == "/login" {
                RouteDecision::Allow
            } else {
                RouteDecision::Redirect("/login".to_string())
            }
        }

        p if p == "/dashboard" || p.starts_with("/dashboard/") => {
            if admin {
                RouteDecision::Allow
            } else {
                RouteDecision::Redirect(format!("/login?callbackUrl={p}"))
            }
        }

        // Bare /onboarding (the invite landing page) is public.
        "/onboarding" => RouteDecision::Allow,

        p if p.starts_with("/onboarding/") => {
            let requested = &p["/onboarding/".len()..];
            if admin {
                // Admins are barred from employee forms.
                RouteDecision::Redirect("/dashboard".to_string())
            } else if let Some(session_id) = employee {
                // Canonicalize: an employee may only sit on their own form.
                match requested.parse::<Uuid>() {
                    Ok(id) if id == session_id => RouteDecision::Allow,
                    _ => RouteDecision::Redirect(format!("/onboarding/{session_id}")),
                }
            } else {
                RouteDecision::Redirect("/onboarding".to_string())
            }
        }

        _ => RouteDecision::Allow,
    }
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

/// Per-identity resolution outcome for the middleware.
struct ResolvedIdentities {
    admin: bool,
    employee: Option<Uuid>,
    /// Clear the admin cookie: it was presented but is logically invalid.
    clear_admin: bool,
    /// Clear the employee cookie: same, for the session cookie.
    clear_employee: bool,
}

/// Axum middleware applying the decision table to every request.
pub async fn policy_layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let identities = resolve_identities(&parts, &state).await;

    let path = parts.uri.path().to_string();
    let decision = decide(&path, identities.admin, identities.employee);

    let req = Request::from_parts(parts, body);
    let mut response = match decision {
        RouteDecision::Allow => next.run(req).await,
        RouteDecision::Redirect(target) => Redirect::temporary(&target).into_response(),
    };

    if identities.clear_employee {
        append_clear_cookie(&mut response, cookie::SESSION_COOKIE_NAME, cookie::clear());
    }
    if identities.clear_admin {
        append_clear_cookie(&mut response, ADMIN_COOKIE_NAME, clear_admin_cookie());
    }
    response
}

/// Append a clearing `Set-Cookie` unless the handler already set that
/// cookie itself. A handler that just issued a fresh session (verify-otp
/// replacing a stale cookie) must not have it wiped by the cleanup of
/// the cookie it replaced.
fn append_clear_cookie(response: &mut Response, name: &str, clear_value: String) {
    let prefix = format!("{name}=");
    let already_set = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.to_str().is_ok_and(|s| s.starts_with(&prefix)));
    if already_set {
        return;
    }
    if let Ok(value) = clear_value.parse() {
        response.headers_mut().append(SET_COOKIE, value);
    }
}

/// `Set-Cookie` value clearing the admin cookie.
fn clear_admin_cookie() -> String {
    format!("{ADMIN_COOKIE_NAME}=; Max-Age=0; Path=/; HttpOnly; Secure; SameSite=Lax")
}

async fn resolve_identities(parts: &axum::http::request::Parts, state: &AppState) -> ResolvedIdentities {
    // Admin identity: signature + expiry + allow-list. Any failure of a
    // presented token is logical (the token itself is bad or unknown).
    let mut admin = false;
    let mut clear_admin = false;
    if let Some(token) = admin_token_from_parts(parts) {
        match validate_admin_token(&token, &state.config.admin) {
            Ok(claims) if state.config.admin.is_allowed(&claims.sub) => admin = true,
            _ => clear_admin = true,
        }
    }

    // Employee identity: non-strict session resolution. Database errors
    // are transient — report "no session" but leave the cookie alone.
    let mut employee = None;
    let mut clear_employee = false;
    let session_cookie = parts
        .headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(extract_session_cookie);
    if let Some(raw_token) = session_cookie {
        let token_hash = hash_token(&raw_token);
        match OnboardingRepo::find_digital_by_invite_hash(&state.pool, &token_hash).await {
            Ok(Some(onboarding)) => {
                let logically_valid = onboarding
                    .access_snapshot()
                    .and_then(|snap| evaluate_session(&snap, Utc::now(), SessionMode::ReadOnly))
                    .is_ok();
                if logically_valid {
                    employee = Some(onboarding.id);
                } else {
                    clear_employee = true;
                }
            }
            Ok(None) => clear_employee = true,
            Err(e) => {
                tracing::warn!(error = %e, "Transient failure resolving employee session; leaving cookie intact");
            }
        }
    }

    ResolvedIdentities {
        admin,
        employee,
        clear_admin,
        clear_employee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid() -> Uuid {
        Uuid::now_v7()
    }

    #[test]
    fn root_redirects_by_identity() {
        let id = uuid();
        assert_eq!(
            decide("/", true, None),
            RouteDecision::Redirect("/dashboard".into())
        );
        assert_eq!(
            decide("/", false, Some(id)),
            RouteDecision::Redirect(format!("/onboarding/{id}"))
        );
        assert_eq!(
            decide("/", false, None),
            RouteDecision::Redirect("/login".into())
        );
    }

    #[test]
    fn login_allows_only_anonymous() {
        let id = uuid();
        assert_eq!(
            decide("/login", true, None),
            RouteDecision::Redirect("/dashboard".into())
        );
        assert_eq!(
            decide("/login", false, Some(id)),
            RouteDecision::Redirect(format!("/onboarding/{id}"))
        );
        assert_eq!(decide("/login", false, None), RouteDecision::Allow);
    }

    #[test]
    fn dashboard_requires_admin_with_callback() {
        assert_eq!(decide("/dashboard", true, None), RouteDecision::Allow);
        assert_eq!(decide("/dashboard/hires", true, None), RouteDecision::Allow);
        assert_eq!(
            decide("/dashboard/hires", false, None),
            RouteDecision::Redirect("/login?callbackUrl=/dashboard/hires".into())
        );
        // An employee session grants nothing on the admin surface.
        assert_eq!(
            decide("/dashboard", false, Some(uuid())),
            RouteDecision::Redirect("/login?callbackUrl=/dashboard".into())
        );
    }

    #[test]
    fn bare_onboarding_is_public_for_everyone() {
        assert_eq!(decide("/onboarding", true, None), RouteDecision::Allow);
        assert_eq!(decide("/onboarding", false, Some(uuid())), RouteDecision::Allow);
        assert_eq!(decide("/onboarding", false, None), RouteDecision::Allow);
    }

    #[test]
    fn admins_are_barred_from_employee_forms() {
        let id = uuid();
        assert_eq!(
            decide(&format!("/onboarding/{id}"), true, None),
            RouteDecision::Redirect("/dashboard".into())
        );
    }

    #[test]
    fn employee_is_canonicalized_to_own_form() {
        let session_id = uuid();
        let other_id = uuid();
        assert_eq!(
            decide(&format!("/onboarding/{session_id}"), false, Some(session_id)),
            RouteDecision::Allow
        );
        assert_eq!(
            decide(&format!("/onboarding/{other_id}"), false, Some(session_id)),
            RouteDecision::Redirect(format!("/onboarding/{session_id}"))
        );
        // A malformed id in the path also canonicalizes.
        assert_eq!(
            decide("/onboarding/not-a-uuid", false, Some(session_id)),
            RouteDecision::Redirect(format!("/onboarding/{session_id}"))
        );
    }

    #[test]
    fn anonymous_onboarding_form_access_lands_on_public_page() {
        assert_eq!(
            decide(&format!("/onboarding/{}", uuid()), false, None),
            RouteDecision::Redirect("/onboarding".into())
        );
    }

    #[test]
    fn fresh_session_cookie_suppresses_clear() {
        // Handler re-issued the session; the stale-cookie cleanup must
        // not destroy it.
        let mut response = Response::new(axum::body::Body::empty());
        response
            .headers_mut()
            .append(SET_COOKIE, cookie::issue("abc", 3600).parse().unwrap());
        append_clear_cookie(&mut response, cookie::SESSION_COOKIE_NAME, cookie::clear());

        let values: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 1);
        assert!(!values[0].contains("Max-Age=0"));
    }

    #[test]
    fn stale_session_cookie_is_cleared_when_none_reissued() {
        let mut response = Response::new(axum::body::Body::empty());
        append_clear_cookie(&mut response, cookie::SESSION_COOKIE_NAME, cookie::clear());

        let values: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 1);
        assert!(values[0].starts_with("nh_session="));
        assert!(values[0].contains("Max-Age=0"));
    }

    #[test]
    fn unrelated_set_cookie_does_not_suppress_clear() {
        // Only a Set-Cookie for the same name counts.
        let mut response = Response::new(axum::body::Body::empty());
        response
            .headers_mut()
            .append(SET_COOKIE, clear_admin_cookie().parse().unwrap());
        append_clear_cookie(&mut response, cookie::SESSION_COOKIE_NAME, cookie::clear());

        assert_eq!(response.headers().get_all(SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn unknown_paths_pass_through() {
        assert_eq!(decide("/api/v1/onboardings", true, None), RouteDecision::Allow);
        assert_eq!(decide("/healthz", false, None), RouteDecision::Allow);
        assert_eq!(decide("/assets/app.js", false, Some(uuid())), RouteDecision::Allow);
    }
}
