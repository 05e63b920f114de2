use std::collections::HashSet;

use tracing::{debug, warn};

use crate::api::{ApiResult, StoreApi};
use crate::fallback;
use crate::model::Product;

/// Category value that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Distinct non-empty categories in first-seen order.
pub fn derive_categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut categories = Vec::new();
    for product in products {
        if !product.category.is_empty() && seen.insert(product.category.as_str()) {
            categories.push(product.category.clone());
        }
    }
    categories
}

/// Case-insensitive substring match over name, brand and description.
/// `needle` must already be lowercased.
fn matches_query(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.name.to_lowercase().contains(needle)
        || product.brand.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}

fn matches_category(product: &Product, category: &str) -> bool {
    category == ALL_CATEGORIES || product.category == category
}

/// Indices into `products` that pass both the search and the category predicate.
pub fn filter_indices(products: &[Product], query: &str, category: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    products
        .iter()
        .enumerate()
        .filter(|(_, p)| matches_query(p, &needle) && matches_category(p, category))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter_products<'a>(products: &'a [Product], query: &str, category: &str) -> Vec<&'a Product> {
    filter_indices(products, query, category)
        .into_iter()
        .map(|i| &products[i])
        .collect()
}

/// State behind the catalog screen.
#[derive(Debug)]
pub struct CatalogController {
    products: Vec<Product>,
    categories: Vec<String>,
    filtered_indices: Vec<usize>,
    loading: bool,
    query: String,
    active_category: String,
    error: Option<String>,
    mount: u64,
}

impl Default for CatalogController {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogController {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            categories: Vec::new(),
            filtered_indices: Vec::new(),
            loading: true,
            query: String::new(),
            active_category: ALL_CATEGORIES.to_string(),
            error: None,
            mount: 0,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Products currently passing search and category filters, in server order.
    pub fn filtered(&self) -> impl ExactSizeIterator<Item = &Product> {
        self.filtered_indices.iter().map(|&i| &self.products[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn filtered_at(&self, index: usize) -> Option<&Product> {
        self.filtered_indices.get(index).map(|&i| &self.products[i])
    }

    /// Start a fetch. The returned mount id must be handed back to [`Self::finish_load`].
    pub fn begin_load(&mut self) -> u64 {
        self.mount += 1;
        self.loading = true;
        self.error = None;
        self.mount
    }

    /// Apply the settled fetch. Returns `false` if a newer load superseded it.
    pub fn finish_load(&mut self, mount: u64, result: ApiResult<Vec<Product>>) -> bool {
        if mount != self.mount {
            debug!(mount, current = self.mount, "Discarding stale catalog response");
            return false;
        }
        match result {
            Ok(products) => {
                self.products = products;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed, showing sample products");
                self.products = fallback::catalog();
                self.error = Some(fallback::CATALOG_NOTICE.to_string());
            }
        }
        self.categories = derive_categories(&self.products);
        self.loading = false;
        self.refilter();
        true
    }

    /// Fetch and apply inline.
    pub async fn load(&mut self, api: &dyn StoreApi) {
        let mount = self.begin_load();
        let result = api.list_products().await;
        self.finish_load(mount, result);
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.refilter();
    }

    pub fn set_category(&mut self, category: &str) {
        self.active_category = category.to_string();
        self.refilter();
    }

    /// Category choices in display order, sentinel first.
    pub fn category_choices(&self) -> impl Iterator<Item = &str> {
        std::iter::once(ALL_CATEGORIES).chain(self.categories.iter().map(String::as_str))
    }

    pub fn next_category(&mut self) {
        self.step_category(1);
    }

    pub fn prev_category(&mut self) {
        self.step_category(-1);
    }

    fn step_category(&mut self, delta: isize) {
        let choices: Vec<String> = self.category_choices().map(str::to_string).collect();
        let current = choices
            .iter()
            .position(|c| *c == self.active_category)
            .unwrap_or(0) as isize;
        let len = choices.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.set_category(&choices[next]);
    }

    /// e.g. `2 products found for "oil" in Oils`
    pub fn results_summary(&self) -> String {
        let n = self.filtered_len();
        let mut summary = format!("{} product{} found", n, if n == 1 { "" } else { "s" });
        if !self.query.is_empty() {
            summary.push_str(&format!(" for \"{}\"", self.query));
        }
        if self.active_category != ALL_CATEGORIES {
            summary.push_str(&format!(" in {}", self.active_category));
        }
        summary
    }

    fn refilter(&mut self) {
        self.filtered_indices = filter_indices(&self.products, &self.query, &self.active_category);
    }
}
