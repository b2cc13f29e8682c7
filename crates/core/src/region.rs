//! Domain-aware locale and region resolution.
//!
//! Seedling runs the same storefront on several top-level domains
//! (seedling.nl, seedling.com, seedling.de, seedling.fr). Which catalog
//! prices and which language a request sees is decided here, from nothing
//! but the request's hostname, its `Accept-Language` header, and two
//! previously persisted cookies.
//!
//! The resolver is a pure function over an explicit [`RequestContext`]; it
//! performs no I/O and touches no globals. The HTTP side (reading the
//! `Host` header, parsing the `Cookie` header, writing the `NEXT_LOCALE`
//! and `DOMAIN_ID` response cookies) lives in the storefront's region
//! middleware, keeping this module trivially unit-testable.
//!
//! # Resolution order
//!
//! Development hostnames (localhost, the loopback literal, `*.fly.dev`
//! previews) resolve from state the developer controls:
//!
//! 1. both cookies set: returned verbatim
//! 2. only the locale cookie set: locale looked up in the domain table
//! 3. `Accept-Language` negotiation against the table's locales
//! 4. the table's default entry
//!
//! Production hostnames resolve from the TLD alone; cookies and headers
//! are deliberately not consulted on that path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CurrencyCode;

/// Cookie name for the persisted locale.
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";

/// Cookie name for the persisted domain ID.
pub const DOMAIN_COOKIE: &str = "DOMAIN_ID";

/// Lifetime of both region cookies: 30 days, in seconds.
pub const REGION_COOKIE_MAX_AGE_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Hostname markers that put a request in the development context.
const DEV_HOST_MARKERS: &[&str] = &["localhost", "127.0.0.1", ".fly.dev"];

/// One storefront deployment bound to a top-level domain.
///
/// Static configuration, fixed at build time. Every TLD maps to exactly
/// one `(locale, domain_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Top-level domain key, e.g. "nl".
    pub tld: &'static str,
    /// ISO 639-1 language code served on this domain.
    pub locale: &'static str,
    /// Internal domain identifier; variant rows key on this.
    pub domain_id: &'static str,
    /// Currency variant prices on this domain are quoted in.
    pub currency: CurrencyCode,
}

/// Error constructing a [`DomainTable`].
#[derive(Debug, Error)]
pub enum DomainTableError {
    /// The table has no entries.
    #[error("domain table cannot be empty")]
    Empty,
    /// The declared default TLD has no entry in the table.
    #[error("default tld {0:?} is not in the domain table")]
    UnknownDefault(String),
}

/// The immutable TLD → `(locale, domain_id)` mapping.
///
/// Passed explicitly into [`resolve_region`] rather than living in a
/// global, so tests can substitute alternate tables without touching
/// process state. [`DomainTable::default`] is the table Seedling ships.
#[derive(Debug, Clone)]
pub struct DomainTable {
    domains: Vec<Domain>,
    default_index: usize,
}

impl DomainTable {
    /// Build a table from a domain list and the TLD to fall back to.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or the default TLD is not in
    /// it. Validating here keeps [`resolve_region`] itself infallible.
    pub fn new(domains: Vec<Domain>, default_tld: &str) -> Result<Self, DomainTableError> {
        if domains.is_empty() {
            return Err(DomainTableError::Empty);
        }
        let default_index = domains
            .iter()
            .position(|d| d.tld == default_tld)
            .ok_or_else(|| DomainTableError::UnknownDefault(default_tld.to_owned()))?;
        Ok(Self {
            domains,
            default_index,
        })
    }

    /// All configured domains, in declaration order.
    #[must_use]
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// The entry unknown TLDs, locales, and languages degrade to.
    #[must_use]
    pub fn default_domain(&self) -> &Domain {
        self.domains
            .get(self.default_index)
            .unwrap_or_else(|| unreachable!("default_index validated in new()"))
    }

    /// Look up a domain by its TLD key.
    #[must_use]
    pub fn by_tld(&self, tld: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.tld == tld)
    }

    /// Look up a domain by its locale.
    #[must_use]
    pub fn by_locale(&self, locale: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.locale == locale)
    }

    /// Look up a domain by its internal ID.
    #[must_use]
    pub fn by_domain_id(&self, domain_id: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.domain_id == domain_id)
    }

    /// Currency for a domain ID; unknown IDs fall back to the default
    /// domain's currency.
    #[must_use]
    pub fn currency_for(&self, domain_id: &str) -> CurrencyCode {
        self.by_domain_id(domain_id)
            .unwrap_or_else(|| self.default_domain())
            .currency
    }
}

impl Default for DomainTable {
    /// The shipped table: nl is the home market and the default.
    fn default() -> Self {
        let domains = vec![
            Domain {
                tld: "nl",
                locale: "nl",
                domain_id: "nl",
                currency: CurrencyCode::EUR,
            },
            Domain {
                tld: "com",
                locale: "en",
                domain_id: "com",
                currency: CurrencyCode::USD,
            },
            Domain {
                tld: "de",
                locale: "de",
                domain_id: "de",
                currency: CurrencyCode::EUR,
            },
            Domain {
                tld: "fr",
                locale: "fr",
                domain_id: "fr",
                currency: CurrencyCode::EUR,
            },
        ];
        Self::new(domains, "nl").unwrap_or_else(|_| unreachable!("shipped table is valid"))
    }
}

/// Everything region resolution may consult, captured from one request.
///
/// Constructed at request start by the region middleware, consulted once,
/// then discarded. Never escapes the request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Request hostname, without port.
    pub hostname: String,
    /// Raw `Accept-Language` header value, if present.
    pub accept_language: Option<String>,
    /// Previously persisted `NEXT_LOCALE` cookie value.
    pub locale_cookie: Option<String>,
    /// Previously persisted `DOMAIN_ID` cookie value.
    pub domain_id_cookie: Option<String>,
}

/// The resolved `(locale, domain_id)` pair for one request.
///
/// Consumed by all downstream rendering and query code: translations key
/// on `locale`, variant queries key on `domain_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRegion {
    pub locale: String,
    pub domain_id: String,
}

impl ResolvedRegion {
    fn from_domain(domain: &Domain) -> Self {
        Self {
            locale: domain.locale.to_owned(),
            domain_id: domain.domain_id.to_owned(),
        }
    }
}

/// Resolve the `(locale, domain_id)` pair for a request.
///
/// Pure and infallible: unknown TLDs, unknown cookie locales, and
/// unrecognizable `Accept-Language` headers all degrade silently to the
/// table's default entry. Callers persist the result as the two region
/// cookies so later development-context requests short-circuit on them.
///
/// Production hostnames resolve from the TLD alone; cookies and headers
/// are ignored on that path. Development hostnames never have a usable
/// TLD, so they resolve cookie-first, then by header negotiation.
#[must_use]
pub fn resolve_region(table: &DomainTable, ctx: &RequestContext) -> ResolvedRegion {
    if is_development_host(&ctx.hostname) {
        return resolve_development(table, ctx);
    }

    let tld = ctx.hostname.rsplit('.').next().unwrap_or_default();
    table
        .by_tld(tld)
        .map_or_else(|| ResolvedRegion::from_domain(table.default_domain()), ResolvedRegion::from_domain)
}

/// Whether a hostname belongs to a local or preview deployment.
#[must_use]
pub fn is_development_host(hostname: &str) -> bool {
    DEV_HOST_MARKERS.iter().any(|m| hostname.contains(m))
}

fn resolve_development(table: &DomainTable, ctx: &RequestContext) -> ResolvedRegion {
    match (&ctx.locale_cookie, &ctx.domain_id_cookie) {
        // Both cookies present: trust them verbatim, even for pairs the
        // table does not know. This is what makes region switching
        // testable on localhost.
        (Some(locale), Some(domain_id)) => ResolvedRegion {
            locale: locale.clone(),
            domain_id: domain_id.clone(),
        },
        // Locale cookie only: recover the domain ID from the table. An
        // unknown locale keeps the cookie value but gets the default
        // domain's ID.
        (Some(locale), None) => {
            let domain_id = table
                .by_locale(locale)
                .map_or(table.default_domain().domain_id, |d| d.domain_id);
            ResolvedRegion {
                locale: locale.clone(),
                domain_id: domain_id.to_owned(),
            }
        }
        // No locale cookie: negotiate from the browser's language list.
        (None, _) => ctx
            .accept_language
            .as_deref()
            .and_then(|header| negotiate_language(table, header))
            .unwrap_or_else(|| ResolvedRegion::from_domain(table.default_domain())),
    }
}

/// Pick the first negotiated language that has a domain, by weight.
fn negotiate_language(table: &DomainTable, header: &str) -> Option<ResolvedRegion> {
    parse_accept_language(header)
        .into_iter()
        .find_map(|(code, _)| table.by_locale(&code).map(ResolvedRegion::from_domain))
}

/// Parse an `Accept-Language` header into `(primary subtag, weight)`
/// pairs, sorted descending by weight.
///
/// Each comma-separated entry splits on `;q=` for an optional weight
/// (default 1.0) and keeps only the primary subtag (`en-US` → `en`).
/// The sort is stable, so equal weights keep header order. Malformed
/// weights parse as 0.0 rather than erroring; a broken entry sorts last
/// instead of failing the request.
#[must_use]
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let mut entries: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            let (tag, weight) = match entry.split_once(";q=") {
                Some((tag, q)) => (tag, q.trim().parse::<f32>().unwrap_or(0.0)),
                None => (entry, 1.0),
            };
            let primary = tag.trim().split('-').next().unwrap_or_default();
            if primary.is_empty() {
                return None;
            }
            Some((primary.to_ascii_lowercase(), weight))
        })
        .collect();

    // Stable descending sort; ties keep header order.
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(core::cmp::Ordering::Equal));
    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn ctx(hostname: &str) -> RequestContext {
        RequestContext {
            hostname: hostname.to_owned(),
            ..RequestContext::default()
        }
    }

    fn pair(locale: &str, domain_id: &str) -> ResolvedRegion {
        ResolvedRegion {
            locale: locale.to_owned(),
            domain_id: domain_id.to_owned(),
        }
    }

    // =========================================================================
    // Production hostnames
    // =========================================================================

    #[test]
    fn test_every_table_tld_resolves_to_its_own_pair() {
        let table = DomainTable::default();
        for domain in table.domains() {
            let resolved = resolve_region(&table, &ctx(&format!("seedling.{}", domain.tld)));
            assert_eq!(resolved, pair(domain.locale, domain.domain_id));
        }
    }

    #[test]
    fn test_production_ignores_cookies_and_headers() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "seedling.de".to_owned(),
            accept_language: Some("fr-FR,fr;q=0.9".to_owned()),
            locale_cookie: Some("nl".to_owned()),
            domain_id_cookie: Some("nl".to_owned()),
        };
        assert_eq!(resolve_region(&table, &context), pair("de", "de"));
    }

    #[test]
    fn test_unknown_production_tld_falls_back_to_default() {
        let table = DomainTable::default();
        assert_eq!(resolve_region(&table, &ctx("seedling.be")), pair("nl", "nl"));
        assert_eq!(resolve_region(&table, &ctx("seedling.co.uk")), pair("nl", "nl"));
        assert_eq!(resolve_region(&table, &ctx("no-dots")), pair("nl", "nl"));
    }

    #[test]
    fn test_shop_de_scenario() {
        let table = DomainTable::default();
        assert_eq!(resolve_region(&table, &ctx("shop.de")), pair("de", "de"));
    }

    // =========================================================================
    // Development hostnames
    // =========================================================================

    #[test]
    fn test_dev_both_cookies_returned_verbatim() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "localhost".to_owned(),
            accept_language: Some("de-DE,de;q=0.9".to_owned()),
            locale_cookie: Some("fr".to_owned()),
            domain_id_cookie: Some("fr".to_owned()),
        };
        assert_eq!(resolve_region(&table, &context), pair("fr", "fr"));
    }

    #[test]
    fn test_dev_both_cookies_verbatim_even_off_table() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "127.0.0.1".to_owned(),
            locale_cookie: Some("xx".to_owned()),
            domain_id_cookie: Some("yy".to_owned()),
            ..RequestContext::default()
        };
        // Cookie short-circuit has highest priority in dev context.
        assert_eq!(resolve_region(&table, &context), pair("xx", "yy"));
    }

    #[test]
    fn test_dev_locale_cookie_only_recovers_domain_id() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "localhost:3000".to_owned(),
            locale_cookie: Some("fr".to_owned()),
            ..RequestContext::default()
        };
        assert_eq!(resolve_region(&table, &context), pair("fr", "fr"));
    }

    #[test]
    fn test_dev_unknown_locale_cookie_keeps_locale_default_domain() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "localhost".to_owned(),
            locale_cookie: Some("es".to_owned()),
            ..RequestContext::default()
        };
        assert_eq!(resolve_region(&table, &context), pair("es", "nl"));
    }

    #[test]
    fn test_dev_domain_cookie_alone_does_not_short_circuit() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "localhost".to_owned(),
            domain_id_cookie: Some("de".to_owned()),
            accept_language: Some("fr".to_owned()),
            ..RequestContext::default()
        };
        // Without a locale cookie the chain falls through to negotiation.
        assert_eq!(resolve_region(&table, &context), pair("fr", "fr"));
    }

    #[test]
    fn test_dev_negotiates_accept_language() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "localhost:3000".to_owned(),
            accept_language: Some("en-US,en;q=0.9,nl;q=0.8".to_owned()),
            ..RequestContext::default()
        };
        assert_eq!(resolve_region(&table, &context), pair("en", "com"));
    }

    #[test]
    fn test_dev_unrecognized_languages_fall_back_to_default() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "localhost".to_owned(),
            accept_language: Some("es-ES,es;q=0.9".to_owned()),
            ..RequestContext::default()
        };
        assert_eq!(resolve_region(&table, &context), pair("nl", "nl"));
    }

    #[test]
    fn test_dev_no_signals_at_all_is_default() {
        let table = DomainTable::default();
        assert_eq!(resolve_region(&table, &ctx("localhost")), pair("nl", "nl"));
    }

    #[test]
    fn test_fly_preview_is_development() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "seedling-pr-42.fly.dev".to_owned(),
            accept_language: Some("de".to_owned()),
            ..RequestContext::default()
        };
        assert_eq!(resolve_region(&table, &context), pair("de", "de"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = DomainTable::default();
        let context = RequestContext {
            hostname: "localhost".to_owned(),
            accept_language: Some("en;q=0.7,de;q=0.8".to_owned()),
            ..RequestContext::default()
        };
        let first = resolve_region(&table, &context);
        let second = resolve_region(&table, &context);
        assert_eq!(first, second);
        assert_eq!(first, pair("de", "de"));
    }

    // =========================================================================
    // Accept-Language parsing
    // =========================================================================

    #[test]
    fn test_parse_accept_language_weights_and_subtags() {
        let parsed = parse_accept_language("en-US,en;q=0.9,nl;q=0.8");
        assert_eq!(
            parsed,
            vec![
                ("en".to_owned(), 1.0),
                ("en".to_owned(), 0.9),
                ("nl".to_owned(), 0.8),
            ]
        );
    }

    #[test]
    fn test_parse_accept_language_sorts_descending() {
        let parsed = parse_accept_language("nl;q=0.5,de;q=0.9,fr");
        let codes: Vec<&str> = parsed.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["fr", "de", "nl"]);
    }

    #[test]
    fn test_parse_accept_language_ties_keep_header_order() {
        let parsed = parse_accept_language("de;q=0.8,fr;q=0.8,nl;q=0.8");
        let codes: Vec<&str> = parsed.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["de", "fr", "nl"]);
    }

    #[test]
    fn test_parse_accept_language_tolerates_garbage() {
        assert!(parse_accept_language("").is_empty());
        assert!(parse_accept_language(",,,").is_empty());
        // Malformed weight sorts last but does not error.
        let parsed = parse_accept_language("de;q=abc,nl;q=0.2");
        let codes: Vec<&str> = parsed.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["nl", "de"]);
    }

    #[test]
    fn test_parse_accept_language_lowercases() {
        let parsed = parse_accept_language("DE-at");
        assert_eq!(parsed, vec![("de".to_owned(), 1.0)]);
    }

    // =========================================================================
    // Domain table construction
    // =========================================================================

    #[test]
    fn test_table_rejects_unknown_default() {
        let domains = vec![Domain {
            tld: "nl",
            locale: "nl",
            domain_id: "nl",
            currency: CurrencyCode::EUR,
        }];
        assert!(matches!(
            DomainTable::new(domains, "be"),
            Err(DomainTableError::UnknownDefault(_))
        ));
    }

    #[test]
    fn test_table_rejects_empty() {
        assert!(matches!(
            DomainTable::new(Vec::new(), "nl"),
            Err(DomainTableError::Empty)
        ));
    }

    #[test]
    fn test_currency_for() {
        let table = DomainTable::default();
        assert_eq!(table.currency_for("com"), CurrencyCode::USD);
        assert_eq!(table.currency_for("de"), CurrencyCode::EUR);
        assert_eq!(table.currency_for("unknown"), CurrencyCode::EUR);
    }
}
