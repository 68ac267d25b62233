// inventory/src/asset.rs
use crate::InventoryError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AssetId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Everything needed to list an asset. Share price and identity are derived
/// when the listing is turned into an [`Asset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    pub total_shares: u64,
    /// Shares still open for reservation. `None` lists the asset fully available.
    #[serde(default)]
    pub available_shares: Option<u64>,
    pub seller_name: String,
    pub rating: f64,
    #[serde(default)]
    pub badge: Option<String>,
}

/// A listed asset and its share pool.
///
/// Invariants:
/// - `total_shares >= 2` and never changes
/// - `total_price > 0` and never changes
/// - `share_price == total_price / total_shares`, fixed at listing time
/// - `0 <= available_shares <= total_shares`; only the catalog moves it
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    id: AssetId,
    total_shares: u64,
    available_shares: u64,
    #[serde(with = "rust_decimal::serde::str")]
    total_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    share_price: Decimal,

    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub seller_name: String,
    pub rating: f64,
    pub badge: Option<String>,
}

impl Asset {
    pub const MIN_SHARES: u64 = 2;

    /// Validate a listing and price its shares.
    pub fn list(listing: NewAsset) -> Result<Self, InventoryError> {
        Self::list_with_id(AssetId::new(), listing)
    }

    pub fn list_with_id(id: AssetId, listing: NewAsset) -> Result<Self, InventoryError> {
        validate_terms(&listing.title, listing.total_price, listing.total_shares)?;

        let available_shares = listing.available_shares.unwrap_or(listing.total_shares);
        if available_shares > listing.total_shares {
            return Err(InventoryError::validation(format!(
                "available shares ({}) exceed total shares ({})",
                available_shares, listing.total_shares
            )));
        }

        if !listing.rating.is_finite() || !(0.0..=5.0).contains(&listing.rating) {
            return Err(InventoryError::validation("rating must be between 0 and 5"));
        }

        Ok(Self {
            id,
            total_shares: listing.total_shares,
            available_shares,
            total_price: listing.total_price,
            share_price: listing.total_price / Decimal::from(listing.total_shares),
            title: listing.title,
            description: listing.description,
            category: listing.category,
            image_url: listing.image_url,
            seller_name: listing.seller_name,
            rating: listing.rating,
            badge: listing.badge.filter(|b| !b.trim().is_empty()),
        })
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn total_shares(&self) -> u64 {
        self.total_shares
    }

    pub fn available_shares(&self) -> u64 {
        self.available_shares
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn share_price(&self) -> Decimal {
        self.share_price
    }

    /// Shares either sitting in a basket or already sold.
    pub fn committed_shares(&self) -> u64 {
        self.total_shares - self.available_shares
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_shares == 0
    }

    /// Price of `quantity` shares at the fixed share price.
    pub fn quote(&self, quantity: u64) -> Result<Decimal, InventoryError> {
        self.share_price
            .checked_mul(Decimal::from(quantity))
            .ok_or(InventoryError::ValueOverflow { asset: self.id })
    }

    /// Fraction of the whole asset that `quantity` shares represent, in percent.
    pub fn ownership_percent(&self, quantity: u64) -> f64 {
        quantity as f64 / self.total_shares as f64 * 100.0
    }

    /// Re-check the listing terms. Only the mutable metadata can drift after
    /// construction, so this is mostly a guard on the title.
    pub fn validate(&self) -> Result<(), InventoryError> {
        validate_terms(&self.title, self.total_price, self.total_shares)
    }

    pub(crate) fn set_available(&mut self, available: u64) {
        debug_assert!(available <= self.total_shares);
        self.available_shares = available;
    }
}

fn validate_terms(title: &str, total_price: Decimal, total_shares: u64) -> Result<(), InventoryError> {
    if title.trim().is_empty() {
        return Err(InventoryError::validation("title is required"));
    }
    if total_price <= Decimal::ZERO {
        return Err(InventoryError::validation("total price must be positive"));
    }
    if total_shares < Asset::MIN_SHARES {
        return Err(InventoryError::validation(format!(
            "an asset must be split into at least {} shares",
            Asset::MIN_SHARES
        )));
    }
    Ok(())
}
