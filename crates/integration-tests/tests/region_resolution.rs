//! End-to-end region resolution behavior.
//!
//! Covers the full decision table: production TLD lookup, the
//! development-context cookie/header chain, and the silent fallbacks.

use seedling_core::region::{
    DomainTable, RequestContext, ResolvedRegion, parse_accept_language, resolve_region,
};

fn resolve(
    hostname: &str,
    accept_language: Option<&str>,
    locale_cookie: Option<&str>,
    domain_id_cookie: Option<&str>,
) -> ResolvedRegion {
    let table = DomainTable::default();
    let ctx = RequestContext {
        hostname: hostname.to_owned(),
        accept_language: accept_language.map(ToOwned::to_owned),
        locale_cookie: locale_cookie.map(ToOwned::to_owned),
        domain_id_cookie: domain_id_cookie.map(ToOwned::to_owned),
    };
    resolve_region(&table, &ctx)
}

fn pair(locale: &str, domain_id: &str) -> ResolvedRegion {
    ResolvedRegion {
        locale: locale.to_owned(),
        domain_id: domain_id.to_owned(),
    }
}

// =============================================================================
// Production hostnames
// =============================================================================

#[test]
fn production_tlds_resolve_from_the_table_alone() {
    assert_eq!(resolve("seedling.nl", None, None, None), pair("nl", "nl"));
    assert_eq!(resolve("seedling.com", None, None, None), pair("en", "com"));
    assert_eq!(resolve("seedling.de", None, None, None), pair("de", "de"));
    assert_eq!(resolve("seedling.fr", None, None, None), pair("fr", "fr"));
    assert_eq!(resolve("shop.de", None, None, None), pair("de", "de"));
}

#[test]
fn production_ignores_cookies_and_headers_entirely() {
    // Even with every other signal pointing at French, the TLD wins.
    let resolved = resolve("seedling.de", Some("fr-FR,fr;q=0.9"), Some("fr"), Some("fr"));
    assert_eq!(resolved, pair("de", "de"));
}

#[test]
fn unknown_production_tld_degrades_to_the_default() {
    assert_eq!(resolve("seedling.be", None, None, None), pair("nl", "nl"));
    assert_eq!(
        resolve("seedling.be", Some("de-DE,de"), Some("de"), Some("de")),
        pair("nl", "nl")
    );
}

// =============================================================================
// Development hostnames
// =============================================================================

#[test]
fn dev_cookie_pair_short_circuits_verbatim() {
    let resolved = resolve("localhost:3000", Some("de"), Some("fr"), Some("fr"));
    assert_eq!(resolved, pair("fr", "fr"));

    // Even pairs absent from the domain table come back verbatim.
    let off_table = resolve("localhost", None, Some("xx"), Some("yy"));
    assert_eq!(off_table, pair("xx", "yy"));
}

#[test]
fn dev_locale_cookie_alone_recovers_the_domain() {
    assert_eq!(resolve("localhost:3000", None, Some("fr"), None), pair("fr", "fr"));
    // Unknown cookie locale keeps the locale, defaults the domain.
    assert_eq!(resolve("localhost", None, Some("es"), None), pair("es", "nl"));
}

#[test]
fn dev_negotiates_accept_language_by_weight() {
    let resolved = resolve("localhost:3000", Some("en-US,en;q=0.9,nl;q=0.8"), None, None);
    assert_eq!(resolved, pair("en", "com"));

    // Higher-weighted known language wins over earlier unknown ones.
    let weighted = resolve("localhost", Some("es;q=1.0,de;q=0.9,en;q=0.8"), None, None);
    assert_eq!(weighted, pair("de", "de"));
}

#[test]
fn dev_unrecognized_languages_degrade_to_the_default() {
    assert_eq!(
        resolve("localhost", Some("es-ES,es;q=0.9"), None, None),
        pair("nl", "nl")
    );
    assert_eq!(resolve("localhost", None, None, None), pair("nl", "nl"));
    assert_eq!(resolve("127.0.0.1", Some(""), None, None), pair("nl", "nl"));
}

#[test]
fn preview_deployments_behave_like_development() {
    let resolved = resolve("seedling-pr-7.fly.dev", Some("fr"), None, None);
    assert_eq!(resolved, pair("fr", "fr"));
}

#[test]
fn resolution_is_pure_and_idempotent() {
    let table = DomainTable::default();
    let ctx = RequestContext {
        hostname: "localhost".to_owned(),
        accept_language: Some("nl;q=0.4,de;q=0.6".to_owned()),
        locale_cookie: None,
        domain_id_cookie: None,
    };
    assert_eq!(resolve_region(&table, &ctx), resolve_region(&table, &ctx));
}

// =============================================================================
// Header parsing details
// =============================================================================

#[test]
fn accept_language_parsing_is_stable_and_tolerant() {
    // Ties keep header order.
    let tied = parse_accept_language("de;q=0.5,fr;q=0.5");
    let codes: Vec<&str> = tied.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(codes, vec!["de", "fr"]);

    // Garbage weights and empty entries never error.
    assert!(parse_accept_language("").is_empty());
    let messy = parse_accept_language(" ,nl;q=oops, en-GB ;q=0.9 ,");
    let codes: Vec<&str> = messy.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(codes, vec!["en", "nl"]);
}
