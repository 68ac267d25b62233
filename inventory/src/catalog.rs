// inventory/src/catalog.rs
use crate::{Asset, AssetId, FavoriteSet, InventoryError};
use tracing::{debug, info};

/// In-memory store of every listed asset.
///
/// Listing order is preserved: vendor submissions are prepended, so the
/// newest listing comes first. `adjust_availability` is the only place an
/// asset's share count changes.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    assets: Vec<Asset>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { assets: Vec::new() }
    }

    /// Build a catalog from assets in display order.
    pub fn from_assets(assets: Vec<Asset>) -> Result<Self, InventoryError> {
        let mut catalog = Self::new();
        for asset in assets {
            asset.validate()?;
            if catalog.get(asset.id()).is_some() {
                return Err(InventoryError::DuplicateAsset(asset.id()));
            }
            catalog.assets.push(asset);
        }
        Ok(catalog)
    }

    pub fn list_all(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id() == id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// List a new asset at the front of the catalog.
    pub fn insert(&mut self, asset: Asset) -> Result<(), InventoryError> {
        asset.validate()?;
        if self.get(asset.id()).is_some() {
            return Err(InventoryError::DuplicateAsset(asset.id()));
        }

        info!(
            asset = %asset.id(),
            title = %asset.title,
            total_shares = asset.total_shares(),
            "asset listed"
        );
        self.assets.insert(0, asset);
        Ok(())
    }

    /// Apply `available_shares += delta`. Returns the new available count.
    pub fn adjust_availability(&mut self, id: AssetId, delta: i64) -> Result<u64, InventoryError> {
        let asset = self
            .assets
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(InventoryError::AssetNotFound(id))?;

        let current = asset.available_shares();
        let total = asset.total_shares();
        let resulting = i128::from(current) + i128::from(delta);

        if resulting < 0 {
            return Err(InventoryError::InsufficientInventory {
                asset: id,
                requested: delta.unsigned_abs(),
                available: current,
            });
        }
        if resulting > i128::from(total) {
            return Err(InventoryError::OverAllocation {
                asset: id,
                resulting: u64::try_from(resulting).unwrap_or(u64::MAX),
                total,
            });
        }

        // 0 <= resulting <= total, so it fits.
        let resulting = resulting as u64;
        asset.set_available(resulting);
        debug!(asset = %id, delta, available = resulting, "availability adjusted");
        Ok(resulting)
    }

    /// Distinct categories, in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for asset in &self.assets {
            if !seen.contains(&asset.category.as_str()) {
                seen.push(asset.category.as_str());
            }
        }
        seen
    }

    /// Favorite assets in catalog order. Ids no longer listed are skipped.
    pub fn favorites<'a>(&'a self, favorites: &FavoriteSet) -> Vec<&'a Asset> {
        self.assets
            .iter()
            .filter(|a| favorites.contains(a.id()))
            .collect()
    }
}
