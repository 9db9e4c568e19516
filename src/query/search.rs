// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Catalog, EntityId};

use super::tree::walk;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub entity: EntityId,
    pub score: i64,
}

/// Case-insensitive substring match over location and file names, in walk order.
pub fn find_by_name(catalog: &Catalog, needle: &str) -> Vec<EntityId> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    walk(catalog)
        .into_iter()
        .filter(|entry| {
            catalog
                .name_of(&entry.entity)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .map(|entry| entry.entity)
        .collect()
}

/// Ranked fuzzy match over location and file names, best first. Ties keep walk order.
pub fn fuzzy_find(catalog: &Catalog, needle: &str, limit: usize) -> Vec<SearchHit> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut hits = walk(catalog)
        .into_iter()
        .filter_map(|entry| {
            let name = catalog.name_of(&entry.entity)?.to_lowercase();
            let score = fuzzy_score(&needle, &name)?;
            Some(SearchHit {
                entity: entry.entity,
                score,
            })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);
    hits
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack == needle {
        score += 5000;
    } else if haystack.contains(needle) {
        score += 2000;
    } else {
        score += 500;
    }

    Some(score)
}

#[derive(Debug, Clone, Copy)]
struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last: usize = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive: usize = 0;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();

            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }

            if let Some(prev) = prev_match {
                if idx == prev + 1 {
                    consecutive += 1;
                }
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | '.' | '-' | '_' | ' ')
}

#[cfg(test)]
mod tests {
    use super::{find_by_name, fuzzy_find};
    use crate::model::fixtures::sample_catalog;
    use crate::model::{EntityId, FileKind, Meta};

    #[test]
    fn find_by_name_is_case_insensitive_substring() {
        let sample = sample_catalog();
        assert_eq!(
            find_by_name(&sample.catalog, "READ"),
            vec![EntityId::File(sample.readme.clone())]
        );
        assert_eq!(
            find_by_name(&sample.catalog, "o"),
            vec![
                EntityId::Location(sample.root.clone()),
                EntityId::Location(sample.docs.clone()),
                EntityId::Location(sample.photos.clone()),
            ]
        );
        assert!(find_by_name(&sample.catalog, "  ").is_empty());
        assert!(find_by_name(&sample.catalog, "zzz").is_empty());
    }

    #[test]
    fn fuzzy_find_ranks_exact_and_contiguous_matches_first() {
        let mut sample = sample_catalog();
        sample
            .catalog
            .create_file("b-e-a-c-h.png", &sample.photos, FileKind::default(), Meta::new())
            .expect("file");

        let hits = fuzzy_find(&sample.catalog, "beach", 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity, EntityId::File(sample.beach.clone()));
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn fuzzy_find_requires_a_subsequence_and_honors_limit() {
        let sample = sample_catalog();
        assert!(fuzzy_find(&sample.catalog, "xyz", 10).is_empty());
        assert_eq!(fuzzy_find(&sample.catalog, "o", 2).len(), 2);
        assert!(fuzzy_find(&sample.catalog, "docs", 0).is_empty());
    }
}
