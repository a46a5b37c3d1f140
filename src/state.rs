use std::path::Path;
use std::sync::Arc;

use crate::color::CategoryColors;
use crate::data::aggregate::Aggregates;
use crate::data::filter::{FilterSelection, filtered_indices, init_selection};
use crate::data::loader::CatalogCache;
use crate::data::model::{Catalog, Facet};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Process-lifetime load cache; the catalog is parsed once per path.
    pub cache: CatalogCache,

    /// Loaded catalog (None until the user opens a file).
    pub catalog: Option<Arc<Catalog>>,

    /// Sidebar filter selections.
    pub selection: FilterSelection,

    /// Indices of titles passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Chart inputs for the current view (cached alongside the indices).
    pub aggregates: Aggregates,

    /// Per-type colours for the charts.
    pub type_colors: Option<CategoryColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cache: CatalogCache::new(),
            catalog: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            aggregates: Aggregates::default(),
            type_colors: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Load a catalog file (through the cache) and ingest it.
    pub fn open_path(&mut self, path: &Path) {
        self.loading = true;
        match self.cache.get_or_load(path) {
            Ok(catalog) => {
                log::info!(
                    "Loaded {} titles ({} countries, {} genres)",
                    catalog.len(),
                    catalog.countries.len(),
                    catalog.genres.len()
                );
                self.set_catalog(catalog);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
                self.loading = false;
            }
        }
    }

    /// Ingest a loaded catalog, initialise the selection and colours.
    pub fn set_catalog(&mut self, catalog: Arc<Catalog>) {
        self.selection = init_selection(&catalog);
        self.visible_indices = (0..catalog.len()).collect();
        self.aggregates = Aggregates::compute(&catalog, &self.visible_indices);
        self.type_colors = Some(CategoryColors::new(&catalog.types));

        self.catalog = Some(catalog);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute the cached view and aggregates after a selection change.
    pub fn refilter(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.visible_indices = filtered_indices(catalog, &self.selection);
            self.aggregates = Aggregates::compute(catalog, &self.visible_indices);
        }
    }

    /// Toggle a single value in a facet's selection.
    pub fn toggle_value(&mut self, facet: Facet, value: &str) {
        let selected = self.selection.facet_mut(facet);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every domain value of a facet.
    pub fn select_all(&mut self, facet: Facet) {
        if let Some(catalog) = &self.catalog {
            let all = catalog.domain(facet).iter().cloned().collect();
            *self.selection.facet_mut(facet) = all;
            self.refilter();
        }
    }

    /// Clear a facet's selection (no constraint).
    pub fn select_none(&mut self, facet: Facet) {
        self.selection.facet_mut(facet).clear();
        self.refilter();
    }

    /// Set the inclusive release-year range.
    pub fn set_year_range(&mut self, low: i32, high: i32) {
        self.selection.year_range = (low, high);
        self.refilter();
    }
}
