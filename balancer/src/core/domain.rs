//! Domain extraction
//!
//! Maps a tab URL onto the key used to cluster tabs: the registrable base
//! domain. Subdomains collapse onto the last two labels, except on shared
//! hosting platforms where every tenant gets its own subdomain and must stay
//! distinct (`alice.github.io` is not `bob.github.io`).

use url::{Host, Url};

/// Multi-tenant hosting suffixes whose subdomains belong to different owners
pub const HOSTING_SUFFIXES: &[&str] = &[
    "github.io",
    "gitlab.io",
    "vercel.app",
    "netlify.app",
    "herokuapp.com",
    "pages.dev",
    "web.app",
    "firebaseapp.com",
    "blogspot.com",
    "azurewebsites.net",
];

/// Base domain used to cluster a tab, `None` when the URL has no usable host
pub fn base_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let domain = match parsed.host()? {
        Host::Domain(domain) => domain.trim_end_matches('.').to_string(),
        Host::Ipv4(addr) => return Some(addr.to_string()),
        Host::Ipv6(addr) => return Some(addr.to_string()),
    };
    if domain.is_empty() {
        return None;
    }

    if is_hosted_tenant(&domain) {
        return Some(domain);
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() <= 2 {
        return Some(domain);
    }
    Some(labels[labels.len() - 2..].join("."))
}

fn is_hosted_tenant(domain: &str) -> bool {
    HOSTING_SUFFIXES.iter().any(|suffix| {
        domain
            .strip_suffix(suffix)
            .is_some_and(|rest| rest.ends_with('.'))
    })
}
