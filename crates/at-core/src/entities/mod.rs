//! Regex-only IOC extraction from alert text.
//!
//! Produces the typed entities that correlation links on. Collector-side
//! entity types (actor handles, user/device/vendor ids) arrive already
//! attached to the alert; this module covers the indicator types that
//! can be recovered from raw text alone.
//!
//! Hash disambiguation: MD5 (32 hex), SHA1 (40 hex), and SHA256 (64 hex)
//! patterns also match ordinary hex strings such as UUID fragments, git
//! SHAs, and session tokens. A candidate must contain at least one digit
//! AND at least one a-f letter to count, which filters most of those.

use at_common::{Entity, EntityType};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

struct IocPatterns {
    ipv4: Regex,
    domain: Regex,
    url: Regex,
    cve: Regex,
    md5: Regex,
    sha1: Regex,
    sha256: Regex,
}

fn patterns() -> &'static IocPatterns {
    static PATTERNS: OnceLock<IocPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| IocPatterns {
        ipv4: Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1?\d?\d)\.){3}(?:25[0-5]|2[0-4]\d|1?\d?\d)\b")
            .expect("static pattern"),
        domain: Regex::new(
            r"\b(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[A-Za-z]{2,24}\b",
        )
        .expect("static pattern"),
        url: Regex::new(r#"(?i)\bhttps?://[^\s<>'")]+"#).expect("static pattern"),
        cve: Regex::new(r"(?i)\bCVE-\d{4}-\d{4,7}\b").expect("static pattern"),
        md5: Regex::new(r"\b[a-fA-F0-9]{32}\b").expect("static pattern"),
        sha1: Regex::new(r"\b[a-fA-F0-9]{40}\b").expect("static pattern"),
        sha256: Regex::new(r"\b[a-fA-F0-9]{64}\b").expect("static pattern"),
    })
}

/// Mixed-hex guard for hash candidates: at least one digit and one
/// letter, otherwise the match is more likely an id or token.
fn is_mixed_hex(candidate: &str) -> bool {
    candidate.chars().any(|c| c.is_ascii_digit())
        && candidate.chars().any(|c| c.is_ascii_alphabetic())
}

fn normalize(entity_type: EntityType, raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(['.', ',', ')', ';']);
    match entity_type {
        EntityType::Cve => trimmed.to_uppercase(),
        EntityType::Domain | EntityType::Md5 | EntityType::Sha1 | EntityType::Sha256 => {
            trimmed.to_lowercase()
        }
        _ => trimmed.to_string(),
    }
}

/// Extract unique IOC entities from raw alert text.
///
/// Domains overlapping a URL match are suppressed: the URL already
/// carries them and double-counting would inflate shared-entity
/// evidence.
pub fn extract_iocs(text: &str) -> BTreeSet<Entity> {
    let patterns = patterns();
    let mut found = BTreeSet::new();

    let url_spans: Vec<(usize, usize)> = patterns
        .url
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();
    let in_url_span =
        |start: usize, end: usize| url_spans.iter().any(|&(s, e)| start < e && end > s);

    let typed: [(EntityType, &Regex); 7] = [
        (EntityType::Ipv4, &patterns.ipv4),
        (EntityType::Domain, &patterns.domain),
        (EntityType::Url, &patterns.url),
        (EntityType::Cve, &patterns.cve),
        (EntityType::Md5, &patterns.md5),
        (EntityType::Sha1, &patterns.sha1),
        (EntityType::Sha256, &patterns.sha256),
    ];
    for (entity_type, pattern) in typed {
        for m in pattern.find_iter(text) {
            if entity_type == EntityType::Domain && in_url_span(m.start(), m.end()) {
                continue;
            }
            if matches!(
                entity_type,
                EntityType::Md5 | EntityType::Sha1 | EntityType::Sha256
            ) && !is_mixed_hex(m.as_str())
            {
                continue;
            }
            let value = normalize(entity_type, m.as_str());
            if value.is_empty() {
                continue;
            }
            found.insert(Entity::new(entity_type, value));
        }
    }
    found
}
