//! Collection filtering and sorting
//!
//! Stateless pipeline deriving the display-ready subset and order of a bean
//! collection. The input is never mutated; the output is always a freshly
//! constructed sequence. The underlying sort is `slice::sort_by`, which is
//! stable, so equal keys keep their prior relative order.

use crate::models::CoffeeBean;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort key for the bean collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Roaster,
    Rank,
}

/// Sort direction, applied as a ±1 multiplier on the base comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Filter criteria; `None` (or the literal "all") means no constraint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BeanFilter {
    /// Exact roaster match, or "all"
    pub roaster: Option<String>,
    /// Exact rank match
    pub rank: Option<i64>,
    /// Case-insensitive substring over name, roaster, and tasting notes
    pub search: Option<String>,
}

impl BeanFilter {
    /// True when a bean passes every active criterion
    pub fn matches(&self, bean: &CoffeeBean) -> bool {
        if let Some(roaster) = &self.roaster {
            if roaster != "all" && bean.roaster != *roaster {
                return false;
            }
        }

        if let Some(rank) = self.rank {
            if bean.rank != rank {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() {
                let in_name = bean.name.to_lowercase().contains(&needle);
                let in_roaster = bean.roaster.to_lowercase().contains(&needle);
                let in_notes = bean
                    .notes
                    .iter()
                    .any(|note| note.to_lowercase().contains(&needle));
                if !in_name && !in_roaster && !in_notes {
                    return false;
                }
            }
        }

        true
    }
}

/// Filter a collection, returning a fresh sequence of the matching beans
pub fn filter_beans(beans: &[CoffeeBean], filter: &BeanFilter) -> Vec<CoffeeBean> {
    beans
        .iter()
        .filter(|bean| filter.matches(bean))
        .cloned()
        .collect()
}

/// Sort a collection in place.
///
/// Name and roaster compare lexicographically, case-folded. Rank keeps its
/// historical quirk: the base comparator is always `b.rank - a.rank`
/// (descending) before the direction multiplier is applied, so the direction
/// labels are effectively inverted on the rank field. Long-standing behavior;
/// do not "fix" without migrating saved view preferences.
pub fn sort_beans(beans: &mut [CoffeeBean], field: SortField, direction: SortDirection) {
    beans.sort_by(|a, b| {
        let base = match field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Roaster => a.roaster.to_lowercase().cmp(&b.roaster.to_lowercase()),
            SortField::Rank => b.rank.cmp(&a.rank),
        };
        apply_direction(base, direction)
    });
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Run the full pipeline: filter, then sort
pub fn run_query(
    beans: &[CoffeeBean],
    filter: &BeanFilter,
    field: SortField,
    direction: SortDirection,
) -> Vec<CoffeeBean> {
    let mut result = filter_beans(beans, filter);
    sort_beans(&mut result, field, direction);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn bean(name: &str, roaster: &str, rank: i64, notes: &[&str]) -> CoffeeBean {
        let now = Utc::now();
        CoffeeBean {
            id: Uuid::new_v4(),
            name: name.to_string(),
            roaster: roaster.to_string(),
            origin: String::new(),
            roast_level: "Medium".to_string(),
            notes: notes.iter().map(|n| n.to_string()).collect(),
            general_notes: String::new(),
            rank,
            grams_in: 18.0,
            ml_out: 36.0,
            brew_time: 28,
            temperature: 93.0,
            grind_size: 15.0,
            price: 18.0,
            weight: 283.0,
            order_again: false,
            purchase_count: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn collection() -> Vec<CoffeeBean> {
        vec![
            bean("Geometry", "Onyx Coffee Lab", 5, &["Dark Chocolate", "Cherry"]),
            bean("Bella Donovan", "Blue Bottle", 3, &["Raisin", "Molasses"]),
            bean("Hologram", "Blue Bottle", 3, &["Berry", "Cocoa"]),
            bean("Monarch", "Onyx Coffee Lab", 4, &["Red Wine", "Molasses"]),
        ]
    }

    #[test]
    fn test_filter_by_roaster() {
        let beans = collection();
        let filter = BeanFilter {
            roaster: Some("Blue Bottle".to_string()),
            ..Default::default()
        };
        let result = filter_beans(&beans, &filter);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|b| b.roaster == "Blue Bottle"));
    }

    #[test]
    fn test_filter_roaster_all_matches_everything() {
        let beans = collection();
        let filter = BeanFilter {
            roaster: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_beans(&beans, &filter).len(), beans.len());
    }

    #[test]
    fn test_filter_by_rank() {
        let beans = collection();
        let filter = BeanFilter {
            rank: Some(3),
            ..Default::default()
        };
        assert_eq!(filter_beans(&beans, &filter).len(), 2);
    }

    #[test]
    fn test_search_matches_notes_case_insensitive() {
        let beans = collection();
        let filter = BeanFilter {
            search: Some("choc".to_string()),
            ..Default::default()
        };
        let result = filter_beans(&beans, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Geometry");
    }

    #[test]
    fn test_search_matches_name_and_roaster() {
        let beans = collection();
        let filter = BeanFilter {
            search: Some("onyx".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_beans(&beans, &filter).len(), 2);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let beans = collection();
        let filter = BeanFilter {
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_beans(&beans, &filter).len(), beans.len());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let beans = collection();
        let filter = BeanFilter {
            roaster: Some("Blue Bottle".to_string()),
            search: Some("o".to_string()),
            ..Default::default()
        };
        let once = filter_beans(&beans, &filter);
        let twice = filter_beans(&once, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let beans = collection();
        let before = beans.clone();
        let filter = BeanFilter {
            rank: Some(5),
            ..Default::default()
        };
        let _ = filter_beans(&beans, &filter);
        assert_eq!(beans, before);
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let mut beans = collection();
        sort_beans(&mut beans, SortField::Name, SortDirection::Ascending);
        let names: Vec<&str> = beans.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Bella Donovan", "Geometry", "Hologram", "Monarch"]);
    }

    #[test]
    fn test_sort_by_name_descending() {
        let mut beans = collection();
        sort_beans(&mut beans, SortField::Name, SortDirection::Descending);
        let names: Vec<&str> = beans.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Monarch", "Hologram", "Geometry", "Bella Donovan"]);
    }

    #[test]
    fn test_rank_sort_base_order_is_descending() {
        // The rank comparator is b.rank - a.rank regardless of direction, so
        // "ascending" actually yields highest rank first.
        let mut beans = collection();
        sort_beans(&mut beans, SortField::Rank, SortDirection::Ascending);
        let ranks: Vec<i64> = beans.iter().map(|b| b.rank).collect();
        assert_eq!(ranks, vec![5, 4, 3, 3]);
    }

    #[test]
    fn test_rank_sort_descending_inverts_base_order() {
        let mut beans = collection();
        sort_beans(&mut beans, SortField::Rank, SortDirection::Descending);
        let ranks: Vec<i64> = beans.iter().map(|b| b.rank).collect();
        assert_eq!(ranks, vec![3, 3, 4, 5]);
    }

    #[test]
    fn test_sort_is_stable_on_equal_keys() {
        let mut beans = collection();
        // Bella Donovan appears before Hologram in the input; both rank 3
        sort_beans(&mut beans, SortField::Rank, SortDirection::Ascending);
        let equal_ranked: Vec<&str> = beans
            .iter()
            .filter(|b| b.rank == 3)
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(equal_ranked, vec!["Bella Donovan", "Hologram"]);
    }

    #[test]
    fn test_run_query_filters_then_sorts() {
        let beans = collection();
        let filter = BeanFilter {
            roaster: Some("Onyx Coffee Lab".to_string()),
            ..Default::default()
        };
        let result = run_query(&beans, &filter, SortField::Name, SortDirection::Ascending);
        let names: Vec<&str> = result.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Geometry", "Monarch"]);
    }
}
