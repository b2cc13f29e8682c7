//! Region resolution middleware.
//!
//! The HTTP boundary around [`seedling_core::region::resolve_region`]:
//! captures the hostname, the `Accept-Language` header, and the two
//! region cookies into a `RequestContext`, resolves once, exposes the
//! result to handlers via request extensions, and persists the pair back
//! as response cookies for session stickiness.
//!
//! All branching lives in the core resolver; this file only moves bytes
//! between HTTP and the resolver's value types.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        HeaderValue, StatusCode,
        header::{ACCEPT_LANGUAGE, COOKIE, HOST, SET_COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use seedling_core::region::{
    DOMAIN_COOKIE, LOCALE_COOKIE, REGION_COOKIE_MAX_AGE_SECONDS, RequestContext, ResolvedRegion,
    resolve_region,
};

use crate::state::AppState;

/// Middleware that resolves the request's `(locale, domain_id)` pair.
///
/// The resolved [`ResolvedRegion`] is inserted into request extensions
/// for the [`ShopRegion`] extractor, and written back as the
/// `NEXT_LOCALE` / `DOMAIN_ID` cookies (30 days, `SameSite=Strict`) so
/// later development-context requests short-circuit on them.
pub async fn region_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = request_context(&request);
    let resolved = resolve_region(state.domains(), &ctx);

    tracing::debug!(
        hostname = %ctx.hostname,
        locale = %resolved.locale,
        domain_id = %resolved.domain_id,
        "region resolved"
    );

    request.extensions_mut().insert(resolved.clone());

    let mut response = next.run(request).await;

    for cookie in [
        region_cookie(LOCALE_COOKIE, &resolved.locale),
        region_cookie(DOMAIN_COOKIE, &resolved.domain_id),
    ] {
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

/// Capture everything resolution may consult from the request.
fn request_context(request: &Request) -> RequestContext {
    let hostname = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .map(strip_port)
        .unwrap_or_default()
        .to_owned();

    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|h| h.to_str().ok())
        .map(ToOwned::to_owned);

    RequestContext {
        hostname,
        accept_language,
        locale_cookie: cookie_value(request, LOCALE_COOKIE),
        domain_id_cookie: cookie_value(request, DOMAIN_COOKIE),
    }
}

/// Strip a trailing `:port` from a `Host` header value.
fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Read one cookie's value from the request's `Cookie` headers.
fn cookie_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(std::result::Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_owned())
}

/// Build one 30-day region cookie.
fn region_cookie(name: &'static str, value: &str) -> Cookie<'static> {
    Cookie::build((name, value.to_owned()))
        .path("/")
        .max_age(Duration::seconds(REGION_COOKIE_MAX_AGE_SECONDS))
        .same_site(SameSite::Strict)
        .build()
}

/// Extractor for the resolved region.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(ShopRegion(region): ShopRegion) -> impl IntoResponse {
///     format!("locale={} domain={}", region.locale, region.domain_id)
/// }
/// ```
pub struct ShopRegion(pub ResolvedRegion);

impl<S> FromRequestParts<S> for ShopRegion
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by region_middleware; a route outside that layer is a wiring bug.
        parts
            .extensions
            .get::<ResolvedRegion>()
            .cloned()
            .map(Self)
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("localhost:3000"), "localhost");
        assert_eq!(strip_port("seedling.de:443"), "seedling.de");
        assert_eq!(strip_port("seedling.de"), "seedling.de");
        // Not a port, keep intact.
        assert_eq!(strip_port("seedling.de:x"), "seedling.de:x");
    }

    #[test]
    fn test_region_cookie_attributes() {
        let cookie = region_cookie(LOCALE_COOKIE, "de");
        let serialized = cookie.to_string();
        assert!(serialized.starts_with("NEXT_LOCALE=de"));
        assert!(serialized.contains("Path=/"));
        assert!(serialized.contains("Max-Age=2592000"));
        assert!(serialized.contains("SameSite=Strict"));
    }
}
