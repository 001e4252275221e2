pub const PRODUCTS: &str = "tempshop_products";
pub const CATEGORIES: &str = "tempshop_categories";
pub const PRODUCT_DETAIL_PREFIX: &str = "tempshop_product_";

/// Key for the product detail entry of `id`.
pub fn product_detail(id: impl std::fmt::Display) -> String {
    format!("{}{}", PRODUCT_DETAIL_PREFIX, id)
}

/// The set of keys one cache owns: exact keys plus key prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNamespace {
    pub fixed: Vec<String>,
    pub prefixes: Vec<String>,
}

impl CacheNamespace {
    pub fn new(fixed: Vec<String>, prefixes: Vec<String>) -> Self {
        Self { fixed, prefixes }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fixed.iter().any(|k| k == key) || self.prefixes.iter().any(|p| key.starts_with(p))
    }
}

impl Default for CacheNamespace {
    fn default() -> Self {
        Self::new(
            vec![PRODUCTS.to_string(), CATEGORIES.to_string()],
            vec![PRODUCT_DETAIL_PREFIX.to_string()],
        )
    }
}
