//! Read-only projections over the curated state.
//!
//! Everything here is a pure function of its arguments: the same store
//! snapshot and search term always produce the same output.

use crate::models::{Category, Company};
use crate::profile::{CurationProfile, UserSpending};
use serde::Serialize;
use std::collections::HashSet;

/// Lowercased, trimmed search term, or `None` when it should match everything
fn normalize_term(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn company_matches(company: &Company, needle: &str) -> bool {
    company.name.to_lowercase().contains(needle)
        || company.description.to_lowercase().contains(needle)
}

/// Case-insensitive substring match on name or description; blank matches all
pub fn matches_term(company: &Company, term: &str) -> bool {
    match normalize_term(term) {
        Some(needle) => company_matches(company, &needle),
        None => true,
    }
}

/// Companies of a category matching `search_term`, best score first
///
/// Equal scores keep fixture order. The returned iterator can be cloned to
/// walk the ranking again.
pub fn ranked_companies<'a>(
    category: &'a Category,
    search_term: &str,
) -> impl Iterator<Item = &'a Company> + Clone + 'a {
    let needle = normalize_term(search_term);
    let mut companies: Vec<&Company> = category
        .companies
        .iter()
        .filter(|c| needle.as_deref().map_or(true, |n| company_matches(c, n)))
        .collect();

    // sort_by is stable, which is what keeps ties in fixture order
    companies.sort_by(|a, b| b.score.cmp(&a.score));
    companies.into_iter()
}

/// The user's picks for a category, best score first
///
/// Ids that no longer resolve to a member company are skipped.
pub fn user_top_list(category: &Category) -> Vec<&Company> {
    let mut picks: Vec<&Company> = category
        .user_stores
        .iter()
        .filter_map(|id| category.company(id))
        .collect();
    picks.sort_by(|a, b| b.score.cmp(&a.score));
    picks
}

/// Mean company score rounded to the nearest integer (halves round up)
///
/// An empty category scores 0.
pub fn category_average_score(category: &Category) -> u8 {
    let count = category.companies.len() as u32;
    if count == 0 {
        return 0;
    }
    let sum: u32 = category.companies.iter().map(|c| u32::from(c.score)).sum();
    ((2 * sum + count) / (2 * count)) as u8
}

/// All categories in profile order; ids the order doesn't know go last
fn ordered_categories<'a>(
    profile: &CurationProfile,
    categories: &'a [Category],
) -> Vec<&'a Category> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::with_capacity(categories.len());

    for id in &profile.category_order {
        if let Some(category) = categories.iter().find(|c| &c.id == id) {
            if seen.insert(category.id.as_str()) {
                ordered.push(category);
            }
        }
    }

    for category in categories {
        if seen.insert(category.id.as_str()) {
            ordered.push(category);
        }
    }

    ordered
}

/// Categories the user hasn't hidden, in their chosen order
pub fn visible_ordered_categories<'a>(
    profile: &CurationProfile,
    categories: &'a [Category],
) -> Vec<&'a Category> {
    ordered_categories(profile, categories)
        .into_iter()
        .filter(|c| profile.is_visible(&c.id))
        .collect()
}

/// Categories the user has hidden, in their chosen order
pub fn hidden_ordered_categories<'a>(
    profile: &CurationProfile,
    categories: &'a [Category],
) -> Vec<&'a Category> {
    ordered_categories(profile, categories)
        .into_iter()
        .filter(|c| !profile.is_visible(&c.id))
        .collect()
}

/// Categories whose name matches, or that contain a matching company
///
/// Input order is preserved, so this composes with the ordered views. Only
/// an all-blank term is special; otherwise surrounding spaces are part of
/// the needle.
pub fn global_search<'a, I>(categories: I, term: &str) -> Vec<&'a Category>
where
    I: IntoIterator<Item = &'a Category>,
{
    if term.trim().is_empty() {
        return categories.into_iter().collect();
    }
    let needle = term.to_lowercase();

    categories
        .into_iter()
        .filter(|category| {
            category.name.to_lowercase().contains(&needle)
                || category
                    .companies
                    .iter()
                    .any(|c| company_matches(c, &needle))
        })
        .collect()
}

/// Same-category companies that outscore `company`, best first
pub fn better_alternatives<'a>(
    company: &Company,
    categories: &'a [Category],
    limit: usize,
) -> Vec<&'a Company> {
    let Some(category) = categories.iter().find(|c| c.id == company.category) else {
        return Vec::new();
    };

    let mut better: Vec<&Company> = category
        .companies
        .iter()
        .filter(|c| c.id != company.id && c.score > company.score)
        .collect();
    better.sort_by(|a, b| b.score.cmp(&a.score));
    better.truncate(limit);
    better
}

/// Highest scoring companies across the whole catalog
pub fn top_companies(categories: &[Category], limit: usize) -> Vec<&Company> {
    let mut all: Vec<&Company> = categories.iter().flat_map(|c| c.companies.iter()).collect();
    all.sort_by(|a, b| b.score.cmp(&a.score));
    all.truncate(limit);
    all
}

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category_id: String,
    pub total: u64,
    pub unique_companies: usize,
}

/// Totals over a user's spending ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpendingSummary {
    /// In order of first purchase
    pub by_category: Vec<CategorySpending>,
    pub total_spent: u64,
    pub unique_companies: usize,
    /// Spend-weighted company score; `None` until something resolvable is spent
    pub overall_score: Option<u8>,
}

/// Roll a spending ledger up per category and overall
///
/// Entries whose company is not in `categories` still count towards the
/// totals but not towards the score.
pub fn spending_summary(spending: &[UserSpending], categories: &[Category]) -> SpendingSummary {
    let mut by_category: Vec<(CategorySpending, HashSet<&str>)> = Vec::new();
    let mut companies = HashSet::new();
    let mut total_spent = 0u64;
    let mut weighted = 0u64;
    let mut scored_spend = 0u64;

    for entry in spending {
        total_spent += entry.amount;
        companies.insert(entry.company_id.as_str());

        let index = match by_category
            .iter()
            .position(|(c, _)| c.category_id == entry.category_id)
        {
            Some(index) => index,
            None => {
                by_category.push((
                    CategorySpending {
                        category_id: entry.category_id.clone(),
                        total: 0,
                        unique_companies: 0,
                    },
                    HashSet::new(),
                ));
                by_category.len() - 1
            }
        };
        let (totals, seen) = &mut by_category[index];
        totals.total += entry.amount;
        seen.insert(entry.company_id.as_str());
        totals.unique_companies = seen.len();

        let score = categories
            .iter()
            .find(|c| c.id == entry.category_id)
            .and_then(|c| c.company(&entry.company_id))
            .map(|c| u64::from(c.score));
        if let Some(score) = score {
            weighted += score * entry.amount;
            scored_spend += entry.amount;
        }
    }

    let overall_score = if scored_spend == 0 {
        None
    } else {
        Some(((2 * weighted + scored_spend) / (2 * scored_spend)) as u8)
    };

    SpendingSummary {
        by_category: by_category.into_iter().map(|(totals, _)| totals).collect(),
        total_spent,
        unique_companies: companies.len(),
        overall_score,
    }
}
