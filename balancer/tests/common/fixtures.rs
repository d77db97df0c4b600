//! Test fixtures and data for balancer tests
//!
//! This module provides consistent window layouts used across all test suites.

use shared::{Tab, Window};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Standard configuration values
    pub const MAX_TABS: usize = 30;
    pub const MIN_TABS: usize = 5;

    pub const DOMINANT_DOMAIN: &'static str = "example.com";

    /// `count` tabs of one domain, ids starting at `first_id`
    pub fn domain_tabs(window_id: i64, first_id: i64, domain: &str, count: usize) -> Vec<Tab> {
        (0..count as i64)
            .map(|n| {
                Tab::new(first_id + n, window_id, format!("https://{domain}/page/{n}"))
                    .with_title(format!("{domain} page {n}"))
            })
            .collect()
    }

    /// One tab on each of `count` distinct domains
    pub fn singleton_tabs(window_id: i64, first_id: i64, count: usize) -> Vec<Tab> {
        (0..count as i64)
            .map(|n| Tab::new(first_id + n, window_id, format!("https://site{n}.org/")))
            .collect()
    }

    /// Window 1: 30 tabs of the dominant domain plus 5 one-off domains
    pub fn overloaded_window() -> Window {
        let mut tabs = Self::domain_tabs(1, 1, Self::DOMINANT_DOMAIN, 30);
        tabs.extend(Self::singleton_tabs(1, 100, 5));
        Window::new(1, tabs)
    }

    /// Window 2 (3 tabs) whose domains all appear in window 3 (40 tabs)
    pub fn underloaded_pair() -> Vec<Window> {
        let mut small = Self::domain_tabs(2, 1, "rust-lang.org", 1);
        small.extend(Self::domain_tabs(2, 2, "docs.rs", 1));
        small.extend(Self::domain_tabs(2, 3, "crates.io", 1));

        let mut large = Self::domain_tabs(3, 100, "rust-lang.org", 15);
        large.extend(Self::domain_tabs(3, 200, "docs.rs", 15));
        large.extend(Self::domain_tabs(3, 300, "crates.io", 10));

        vec![Window::new(2, small), Window::new(3, large)]
    }

    /// Window 1 over the cap with two one-off domains, each of which has a
    /// home window
    pub fn two_destination_windows() -> Vec<Window> {
        let mut tabs = Self::domain_tabs(1, 1, Self::DOMINANT_DOMAIN, 30);
        tabs.extend(Self::domain_tabs(1, 50, "alpha.com", 1));
        tabs.extend(Self::domain_tabs(1, 60, "beta.com", 1));

        vec![
            Window::new(1, tabs),
            Window::new(2, Self::domain_tabs(2, 100, "alpha.com", 10)),
            Window::new(3, Self::domain_tabs(3, 200, "beta.com", 10)),
        ]
    }

    /// Balanced at 8/7 by relief into window 3 followed by a refill that
    /// takes window 3's only original tab
    pub fn refill_from_filled_window() -> Vec<Window> {
        let mut crowded = Self::domain_tabs(2, 10, "b.com", 8);
        crowded.extend(Self::domain_tabs(2, 20, "a.com", 1));
        crowded.extend(Self::domain_tabs(2, 30, "c.com", 7));

        vec![
            Window::new(1, Self::domain_tabs(1, 1, "a.com", 4)),
            Window::new(2, crowded),
            Window::new(3, Self::domain_tabs(3, 40, "a.com", 1)),
            Window::new(4, Self::domain_tabs(4, 50, "d.com", 8)),
        ]
    }
}
