// inventory/src/pool.rs
use crate::{AssetId, Basket, Catalog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time split of one asset's shares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePool {
    pub asset: AssetId,
    pub available: u64,
    pub reserved: u64,
    pub sold: u64,
    pub total: u64,
    pub timestamp: DateTime<Utc>,
}

impl SharePool {
    /// Snapshot `asset` as seen by `catalog` and the session `basket`.
    /// Returns `None` if the asset is not listed.
    pub fn snapshot(catalog: &Catalog, basket: &Basket, asset: AssetId) -> Option<Self> {
        let listed = catalog.get(asset)?;
        let available = listed.available_shares();
        let reserved = basket.quantity_of(asset);
        let total = listed.total_shares();

        Some(Self {
            asset,
            available,
            reserved,
            sold: total.saturating_sub(available.saturating_add(reserved)),
            total,
            timestamp: Utc::now(),
        })
    }

    /// `available + reserved + sold == total` with nothing double counted.
    pub fn is_reconciled(&self) -> bool {
        self.available
            .checked_add(self.reserved)
            .and_then(|held| held.checked_add(self.sold))
            == Some(self.total)
    }
}
