// Pricebook - core/catalog.rs
//
// The in-memory product catalogue and every operation over it.
// Core layer: pure logic over Read/Write trait objects, no filesystem
// or terminal dependencies.
//
// Order is insertion/load order unless sort_by_code is called. All
// mutations apply immediately and irreversibly; there is no undo.

use crate::core::codec;
use crate::core::model::Product;
use crate::util::error::{ParseError, PricebookError, Result};
use std::collections::HashSet;
use std::io::{Read, Write};

/// Ordered collection of products, sole owner of all records.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Read-only view of the current contents in current order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Replace the entire contents from a catalogue stream.
    ///
    /// All-or-nothing: the stream is decoded fully before anything is
    /// replaced, so a decode failure on any line leaves the catalogue in
    /// its pre-load state. Returns the number of records loaded.
    pub fn load<R: Read>(&mut self, reader: R) -> std::result::Result<usize, ParseError> {
        let loaded = codec::read_products(reader)?;
        let count = loaded.len();
        self.products = loaded;
        tracing::debug!(count, "Catalogue contents replaced");
        Ok(count)
    }

    /// Serialise the entire contents in current order.
    ///
    /// Returns the number of records written. The caller owns the
    /// destination and its truncation semantics.
    pub fn save<W: Write>(&self, writer: W) -> std::result::Result<usize, csv::Error> {
        codec::write_products(&self.products, writer)
    }

    /// Append a product. Always succeeds; no uniqueness or field checks.
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Remove and return the product at the 0-based `index`.
    ///
    /// Out-of-range indices fail with a `Range` error and leave the
    /// catalogue unchanged. Subsequent products shift left by one,
    /// preserving relative order.
    pub fn delete_at(&mut self, index: usize) -> Result<Product> {
        if index >= self.products.len() {
            return Err(PricebookError::Range {
                index,
                len: self.products.len(),
            });
        }
        Ok(self.products.remove(index))
    }

    /// Stable ascending sort by code. Equal codes keep their prior
    /// relative order, so index-based operations after sorting stay
    /// deterministic.
    pub fn sort_by_code(&mut self) {
        self.products.sort_by_key(|p| p.code);
    }

    /// Linear scan for the first product with the given code.
    /// A miss is a normal empty result, not an error; duplicates beyond
    /// the first are not reported.
    pub fn search_by_code(&self, code: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.code == code)
    }

    /// Every product whose base price (not sale price) lies in
    /// `min..=max`, inclusive on both bounds, in original order.
    pub fn select_by_price_range(&self, min: f64, max: f64) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.base_price >= min && p.base_price <= max)
            .collect()
    }

    /// Add `extra` percentage points to the discount of every product
    /// whose kind is in `kinds` (exact match). No clamping: the result
    /// may exceed 100 or go negative. Returns how many products were
    /// touched; an empty set touches nothing.
    pub fn apply_promo_discount(&mut self, kinds: &HashSet<String>, extra: f64) -> usize {
        let mut touched = 0;
        for product in &mut self.products {
            if kinds.contains(&product.kind) {
                product.discount += extra;
                touched += 1;
            }
        }
        tracing::debug!(touched, extra, "Promo discount applied");
        touched
    }

    /// Remove every product whose sale price is strictly below
    /// `threshold`; products selling exactly at the threshold are kept.
    /// Survivors keep their relative order. Returns how many were removed.
    pub fn remove_cheaper_than(&mut self, threshold: f64) -> usize {
        let before = self.products.len();
        self.products.retain(|p| p.sale_price() >= threshold);
        let removed = before - self.products.len();
        tracing::debug!(removed, threshold, "Cheap products removed");
        removed
    }
}
