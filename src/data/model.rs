use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Title – one row of the catalog
// ---------------------------------------------------------------------------

/// A single catalog entry (one row of the source table).
///
/// `duration_minutes` and `num_seasons` are derived once at load time from the
/// free-text `duration` column and never re-parsed afterwards. At most one of
/// them is set per row.
#[derive(Debug, Clone)]
pub struct Title {
    pub title: String,
    /// The source `type` column, e.g. "Movie" or "TV Show".
    pub kind: String,
    /// Raw country string; may hold several comma-separated names.
    pub country: Option<String>,
    pub date_added: Option<NaiveDate>,
    pub release_year: i32,
    pub rating: Option<String>,
    /// Free text such as "90 min" or "3 Seasons".
    pub duration: Option<String>,
    /// Comma-separated genre tags.
    pub listed_in: Option<String>,
    pub duration_minutes: Option<u32>,
    pub num_seasons: Option<u32>,
}

// ---------------------------------------------------------------------------
// Facet – the four set-valued filter dimensions
// ---------------------------------------------------------------------------

/// The categorical dimensions the sidebar can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Type,
    Country,
    Genre,
    Rating,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Type, Facet::Country, Facet::Genre, Facet::Rating];

    /// Section label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Facet::Type => "Type",
            Facet::Country => "Country",
            Facet::Genre => "Genre",
            Facet::Rating => "Rating",
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed catalog with pre-computed facet domains.
///
/// Built once by the loader and immutable afterwards; filtering and
/// aggregation only derive index views from it.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// All titles in file order.
    pub titles: Vec<Title>,
    /// Sorted unique `type` values.
    pub types: Vec<String>,
    /// Sorted unique country names, split out of the comma-separated column.
    pub countries: Vec<String>,
    /// Sorted unique genre tags, split out of `listed_in`.
    pub genres: Vec<String>,
    /// Sorted unique non-null ratings.
    pub ratings: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
}

/// Split a comma-separated cell into trimmed, non-empty tokens.
pub fn split_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

impl Catalog {
    /// Build the facet domains from the loaded titles.
    pub fn from_titles(titles: Vec<Title>) -> Self {
        use std::collections::BTreeSet;

        let mut types: BTreeSet<String> = BTreeSet::new();
        let mut countries: BTreeSet<String> = BTreeSet::new();
        let mut genres: BTreeSet<String> = BTreeSet::new();
        let mut ratings: BTreeSet<String> = BTreeSet::new();

        for t in &titles {
            types.insert(t.kind.clone());
            if let Some(raw) = &t.country {
                countries.extend(split_tokens(raw).map(str::to_string));
            }
            if let Some(raw) = &t.listed_in {
                genres.extend(split_tokens(raw).map(str::to_string));
            }
            if let Some(r) = &t.rating {
                ratings.insert(r.clone());
            }
        }

        let year_min = titles.iter().map(|t| t.release_year).min().unwrap_or(1900);
        let year_max = titles.iter().map(|t| t.release_year).max().unwrap_or(1900);

        Catalog {
            titles,
            types: types.into_iter().collect(),
            countries: countries.into_iter().collect(),
            genres: genres.into_iter().collect(),
            ratings: ratings.into_iter().collect(),
            year_min,
            year_max,
        }
    }

    /// The domain (all unique values) of a facet.
    pub fn domain(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Type => &self.types,
            Facet::Country => &self.countries,
            Facet::Genre => &self.genres,
            Facet::Rating => &self.ratings,
        }
    }

    /// Number of titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
