use std::collections::{BTreeMap, HashMap};

use super::model::{Catalog, split_tokens};

// ---------------------------------------------------------------------------
// Chart-feeding aggregations over a filtered view
// ---------------------------------------------------------------------------
//
// Every function here is a stateless single pass over `(catalog, indices)`,
// where `indices` is the filtered view produced by `filter::filtered_indices`.
// An empty view yields empty aggregates, never an error.

/// Number of titles per `type` value.
pub fn count_by_type(catalog: &Catalog, indices: &[usize]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for &i in indices {
        *counts.entry(catalog.titles[i].kind.clone()).or_default() += 1;
    }
    counts
}

/// Titles per release year, ascending by year.
pub fn count_by_year(catalog: &Catalog, indices: &[usize]) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for &i in indices {
        *counts.entry(catalog.titles[i].release_year).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// The `k` most frequent country tokens, descending by count.
///
/// Each comma-separated token of each row's country cell counts as one
/// occurrence, so "United States, India" contributes to both countries.
/// Ties keep first-seen order.
pub fn top_countries(catalog: &Catalog, indices: &[usize], k: usize) -> Vec<(String, usize)> {
    let tokens = indices
        .iter()
        .filter_map(|&i| catalog.titles[i].country.as_deref())
        .flat_map(split_tokens);
    let mut counts = count_first_seen(tokens);
    counts.truncate(k);
    counts
}

/// Titles per rating, descending by count; rows without a rating are skipped.
/// Ties keep first-seen order.
pub fn rating_distribution(catalog: &Catalog, indices: &[usize]) -> Vec<(String, usize)> {
    let ratings = indices
        .iter()
        .filter_map(|&i| catalog.titles[i].rating.as_deref());
    count_first_seen(ratings)
}

/// Run lengths (minutes) of the movies in the view, in row order.
/// Feeds the duration histogram; the chart is skipped when this is empty.
pub fn movie_durations(catalog: &Catalog, indices: &[usize]) -> Vec<f64> {
    indices
        .iter()
        .map(|&i| &catalog.titles[i])
        .filter(|t| t.kind == "Movie")
        .filter_map(|t| t.duration_minutes)
        .map(f64::from)
        .collect()
}

/// Number of TV shows per season count.
/// Feeds the seasons chart; skipped when empty.
pub fn tv_season_counts(catalog: &Catalog, indices: &[usize]) -> BTreeMap<u32, usize> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for &i in indices {
        let t = &catalog.titles[i];
        if t.kind == "TV Show" {
            if let Some(n) = t.num_seasons {
                *counts.entry(n).or_default() += 1;
            }
        }
    }
    counts
}

/// Count occurrences keeping first-seen insertion order, then sort by count
/// descending. The sort is stable, so ties stay in first-seen order.
fn count_first_seen<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tok in tokens {
        match counts.get_mut(tok) {
            Some(c) => *c += 1,
            None => {
                counts.insert(tok, 1);
                order.push(tok);
            }
        }
    }
    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|tok| (tok.to_string(), counts[tok]))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

// ---------------------------------------------------------------------------
// Aggregates – everything the chart column needs, bundled
// ---------------------------------------------------------------------------

/// All chart inputs for the current view, recomputed whenever the selection
/// changes and cached by the app state.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub row_count: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_year: Vec<(i32, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub rating_distribution: Vec<(String, usize)>,
    pub movie_durations: Vec<f64>,
    pub tv_season_counts: BTreeMap<u32, usize>,
}

impl Aggregates {
    pub const TOP_COUNTRIES: usize = 10;

    pub fn compute(catalog: &Catalog, indices: &[usize]) -> Self {
        Aggregates {
            row_count: indices.len(),
            by_type: count_by_type(catalog, indices),
            by_year: count_by_year(catalog, indices),
            top_countries: top_countries(catalog, indices, Self::TOP_COUNTRIES),
            rating_distribution: rating_distribution(catalog, indices),
            movie_durations: movie_durations(catalog, indices),
            tv_season_counts: tv_season_counts(catalog, indices),
        }
    }
}
