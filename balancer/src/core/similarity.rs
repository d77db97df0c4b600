//! Title similarity clustering
//!
//! Fallback grouping for tabs that domain grouping leaves loose. Titles are
//! reduced to token sets and tabs whose sets overlap strongly enough share
//! a cluster. Quadratic in the number of tabs: meant for the small residual
//! set left after domain clustering, never a whole window.

use std::collections::HashSet;

use shared::{Tab, TabId};

/// Minimum Jaccard similarity (exclusive) for two titles to cluster
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Name used when cluster members share no token
pub const FALLBACK_NAME: &str = "Group";

/// A named set of similar tabs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityCluster {
    pub name: String,
    pub tab_ids: Vec<TabId>,
}

/// Lowercased title tokens longer than two characters, first-seen order, deduplicated
pub fn tokenize(title: &str) -> Vec<String> {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut seen = HashSet::new();
    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .filter(|token| seen.insert(token.to_string()))
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of two token sets, 0 when both are empty
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Cluster tabs whose titles are similar
pub fn cluster_by_similarity(tabs: &[Tab]) -> Vec<SimilarityCluster> {
    let mut sorted: Vec<&Tab> = tabs.iter().collect();
    sorted.sort_by(|a, b| a.title.cmp(&b.title));

    let tokens: Vec<Vec<String>> = sorted.iter().map(|tab| tokenize(&tab.title)).collect();
    let sets: Vec<HashSet<&str>> = tokens
        .iter()
        .map(|t| t.iter().map(String::as_str).collect())
        .collect();

    let mut processed = vec![false; sorted.len()];
    let mut clusters = Vec::new();

    for i in 0..sorted.len() {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let mut members = vec![i];

        for j in (i + 1)..sorted.len() {
            if !processed[j] && jaccard(&sets[i], &sets[j]) > SIMILARITY_THRESHOLD {
                processed[j] = true;
                members.push(j);
            }
        }

        if members.len() >= 2 {
            let member_sets: Vec<&HashSet<&str>> = members.iter().map(|&m| &sets[m]).collect();
            clusters.push(SimilarityCluster {
                name: cluster_name(&tokens[i], &member_sets),
                tab_ids: members.iter().map(|&m| sorted[m].id).collect(),
            });
        }
    }

    clusters
}

/// Tokens of the first member that every member shares, capitalised
fn cluster_name(first: &[String], members: &[&HashSet<&str>]) -> String {
    let common: Vec<String> = first
        .iter()
        .filter(|token| members.iter().all(|set| set.contains(token.as_str())))
        .map(|token| capitalize(token))
        .collect();

    if common.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        common.join(" ")
    }
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(id: i64, title: &str) -> Tab {
        Tab::new(id, 1, "about:blank").with_title(title)
    }

    #[test]
    fn test_tokenize_strips_noise() {
        assert_eq!(
            tokenize("The Rust Book: Ownership & Borrowing, ch. 4"),
            vec!["the", "rust", "book", "ownership", "borrowing"]
        );
        assert_eq!(tokenize("a an of"), Vec::<String>::new());
        assert_eq!(tokenize("rust RUST Rust"), vec!["rust"]);
    }

    #[test]
    fn test_jaccard_bounds() {
        let a: HashSet<&str> = ["rust", "book"].into_iter().collect();
        let b: HashSet<&str> = ["rust", "book"].into_iter().collect();
        let c: HashSet<&str> = ["python"].into_iter().collect();
        let empty: HashSet<&str> = HashSet::new();

        assert_eq!(jaccard(&a, &b), 1.0);
        assert_eq!(jaccard(&a, &c), 0.0);
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn test_clusters_similar_titles() {
        let tabs = vec![
            titled(1, "Rust async book chapter"),
            titled(2, "Weather forecast today"),
            titled(3, "Rust async book chapter two"),
            titled(4, "Grocery list"),
        ];

        let clusters = cluster_by_similarity(&tabs);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].tab_ids, vec![TabId(1), TabId(3)]);
        assert_eq!(clusters[0].name, "Rust Async Book Chapter");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // 3 shared tokens out of 5 distinct: exactly 0.6, not enough
        let tabs = vec![titled(1, "alpha beta gamma delta"), titled(2, "alpha beta gamma epsilon")];
        assert!(cluster_by_similarity(&tabs).is_empty());
    }

    #[test]
    fn test_singletons_and_empty_titles_do_not_cluster() {
        let tabs = vec![titled(1, ""), titled(2, ""), titled(3, "unique page")];
        assert!(cluster_by_similarity(&tabs).is_empty());
        assert!(cluster_by_similarity(&[]).is_empty());
    }
}
