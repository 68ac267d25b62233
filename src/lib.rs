//! # PartMarket
//!
//! Catalog and checkout core for a marketplace that sells assets in
//! shares: an apartment split into 1 000 parts, a vintage car into 100.
//!
//! The share bookkeeping lives in the [`inventory`] crate. This crate adds
//! what a storefront session needs around it:
//!
//! - [`query`]: search, category filter and sort over the catalog
//! - [`vendor`]: turning a listing form into a priced, fully available asset
//! - [`describe`]: marketing copy from an external text-generation service,
//!   written into a draft in the background and never allowed to fail
//! - [`Market`]: one session owning the catalog, basket, favorites,
//!   checkout state and the login flag
//!
//! ```rust,ignore
//! let mut market = Market::seeded(MarketConfig::from_env())?;
//! let id = market.browse(&CatalogQuery::new().sort(SortKey::PriceAsc))[0].id();
//! market.reserve(id, 10)?;
//! market.log_in();
//! let outcome = market.checkout()?;
//! ```

pub mod config;
pub mod describe;
pub mod error;
pub mod query;
pub mod seed;
pub mod vendor;

pub use inventory;
pub use inventory::{
    Asset, AssetId, Basket, BasketLine, Catalog, Checkout, CheckoutOutcome, CheckoutState,
    FavoriteSet, InventoryError, NewAsset, Receipt, Reservation, SharePool,
};

pub use crate::config::{DescribeConfig, MarketConfig, VendorLimits};
pub use crate::describe::{DescriptionDraft, DescriptionGenerator, GeminiDescriber};
pub use crate::error::{DescribeError, Error};
pub use crate::query::{CatalogQuery, CategoryFilter, SortKey, query};
pub use crate::vendor::VendorForm;

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// A single storefront session.
///
/// Owns every aggregate explicitly; there is no global state. The login flag
/// only changes through [`Market::log_in`] and [`Market::log_out`]; checkout
/// reads it and reports [`CheckoutOutcome::AuthenticationRequired`] instead
/// of logging anyone in.
pub struct Market {
    catalog: Catalog,
    basket: Basket,
    favorites: FavoriteSet,
    checkout: Checkout,
    authenticated: bool,
    config: MarketConfig,
    describer: Option<Arc<dyn DescriptionGenerator>>,
    draft: DescriptionDraft,
}

impl Market {
    pub fn new(catalog: Catalog, config: MarketConfig) -> Self {
        Self {
            catalog,
            basket: Basket::new(),
            favorites: FavoriteSet::new(),
            checkout: Checkout::new(),
            authenticated: false,
            config,
            describer: None,
            draft: DescriptionDraft::new(),
        }
    }

    /// Session over the bundled launch listings.
    pub fn seeded(config: MarketConfig) -> Result<Self, Error> {
        Ok(Self::new(seed::seeded_catalog()?, config))
    }

    /// Use `describer` for vendor description requests.
    pub fn with_describer(mut self, describer: Arc<dyn DescriptionGenerator>) -> Self {
        self.describer = Some(describer);
        self
    }

    /// Use the Gemini client built from this session's configuration.
    pub fn with_gemini(self) -> Self {
        let describer = GeminiDescriber::new(&self.config.describe);
        self.with_describer(Arc::new(describer))
    }

    // ==================== Catalog ====================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.catalog.get(id)
    }

    pub fn browse(&self, query: &CatalogQuery) -> Vec<&Asset> {
        query.apply(self.catalog.list_all())
    }

    pub fn pool(&self, id: AssetId) -> Option<SharePool> {
        SharePool::snapshot(&self.catalog, &self.basket, id)
    }

    // ==================== Basket ====================

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    pub fn reserve(&mut self, id: AssetId, quantity: u64) -> Result<u64, Error> {
        Ok(self.basket.reserve(&mut self.catalog, id, quantity)?)
    }

    pub fn release(&mut self, id: AssetId) -> Result<Option<u64>, Error> {
        Ok(self.basket.release(&mut self.catalog, id)?)
    }

    pub fn basket_value(&self) -> Result<Decimal, Error> {
        Ok(self.basket.total_value(&self.catalog)?)
    }

    pub fn basket_lines(&self) -> Result<Vec<BasketLine>, Error> {
        Ok(self.basket.lines(&self.catalog)?)
    }

    // ==================== Favorites ====================

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn toggle_favorite(&mut self, id: AssetId) -> bool {
        self.favorites.toggle(id)
    }

    pub fn is_favorite(&self, id: AssetId) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorite_assets(&self) -> Vec<&Asset> {
        self.catalog.favorites(&self.favorites)
    }

    // ==================== Session & checkout ====================

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn log_in(&mut self) {
        self.authenticated = true;
        info!("session logged in");
    }

    pub fn log_out(&mut self) {
        self.authenticated = false;
        info!("session logged out");
    }

    pub fn checkout_state(&self) -> CheckoutState {
        self.checkout.state()
    }

    pub fn checkout(&mut self) -> Result<CheckoutOutcome, Error> {
        Ok(self
            .checkout
            .attempt_checkout(&mut self.basket, &self.catalog, self.authenticated)?)
    }

    pub fn abort_checkout(&mut self) {
        self.checkout.abort();
    }

    // ==================== Vendor ====================

    pub fn submit_listing(&mut self, form: VendorForm) -> Result<AssetId, Error> {
        Ok(vendor::submit(form, &self.config.vendor, &mut self.catalog)?)
    }

    pub fn description_draft(&self) -> &DescriptionDraft {
        &self.draft
    }

    /// Generate a description for the listing being drafted. Returns `None`
    /// when no describer is configured, the title is blank, or no tokio
    /// runtime is running.
    pub fn request_description(&self, title: &str, category: &str) -> Option<JoinHandle<()>> {
        let describer = Arc::clone(self.describer.as_ref()?);
        self.draft
            .request(describer, title, category, self.config.describe.timeout)
    }
}
