use std::collections::BTreeSet;

use super::model::{Catalog, Facet, Title};

// ---------------------------------------------------------------------------
// Filter selection: which values are chosen per facet, plus the year range
// ---------------------------------------------------------------------------

/// The sidebar's selection state, passed into [`filtered_indices`] on every
/// recompute.
///
/// An empty set on any facet means "no constraint" (show all). This rule is
/// uniform across the four facets; the type facet simply starts out with the
/// full domain selected so the UI shows every checkbox ticked.
///
/// The year range is always applied, inclusive on both ends. A range with
/// `low > high` matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub types: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub genres: BTreeSet<String>,
    pub ratings: BTreeSet<String>,
    /// Inclusive `(low, high)` release-year bounds.
    pub year_range: (i32, i32),
}

impl FilterSelection {
    /// The mutable selected-value set for a facet.
    pub fn facet_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Type => &mut self.types,
            Facet::Country => &mut self.countries,
            Facet::Genre => &mut self.genres,
            Facet::Rating => &mut self.ratings,
        }
    }

    /// The selected-value set for a facet.
    pub fn facet(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Type => &self.types,
            Facet::Country => &self.countries,
            Facet::Genre => &self.genres,
            Facet::Rating => &self.ratings,
        }
    }
}

/// Initialise a [`FilterSelection`] for a freshly loaded catalog: every type
/// ticked, no country/genre/rating constraint, the full year span.
pub fn init_selection(catalog: &Catalog) -> FilterSelection {
    FilterSelection {
        types: catalog.types.iter().cloned().collect(),
        countries: BTreeSet::new(),
        genres: BTreeSet::new(),
        ratings: BTreeSet::new(),
        year_range: (catalog.year_min, catalog.year_max),
    }
}

// ---------------------------------------------------------------------------
// Predicate application
// ---------------------------------------------------------------------------

/// Return indices of titles that pass all active filters, in row order.
///
/// Pure and deterministic; the catalog is never mutated. All active facet
/// filters combine with logical AND.
pub fn filtered_indices(catalog: &Catalog, selection: &FilterSelection) -> Vec<usize> {
    catalog
        .titles
        .iter()
        .enumerate()
        .filter(|(_, t)| title_passes(t, selection))
        .map(|(i, _)| i)
        .collect()
}

fn title_passes(title: &Title, selection: &FilterSelection) -> bool {
    if !selection.types.is_empty() && !selection.types.contains(&title.kind) {
        return false;
    }

    // Country and genre match by raw substring containment against the
    // unsplit cell, not by exact token: a selected name that happens to be a
    // fragment of a longer name over-matches. Kept intentionally.
    if !selection.countries.is_empty() {
        let Some(country) = &title.country else {
            return false;
        };
        if !selection.countries.iter().any(|c| country.contains(c.as_str())) {
            return false;
        }
    }

    if !selection.genres.is_empty() {
        let Some(listed) = &title.listed_in else {
            return false;
        };
        if !selection.genres.iter().any(|g| listed.contains(g.as_str())) {
            return false;
        }
    }

    // Ratings match exactly; a row without a rating fails an active filter.
    if !selection.ratings.is_empty() {
        match &title.rating {
            Some(r) if selection.ratings.contains(r) => {}
            _ => return false,
        }
    }

    let (low, high) = selection.year_range;
    title.release_year >= low && title.release_year <= high
}
