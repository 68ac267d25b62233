// inventory/src/basket.rs
use crate::{AssetId, Catalog, InventoryError};
use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shares of one asset held in the basket pending checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub asset_id: AssetId,
    pub quantity: u64,
}

/// A reservation priced against the live catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketLine {
    pub asset_id: AssetId,
    pub title: String,
    pub category: String,
    pub quantity: u64,
    pub share_price: Decimal,
    pub subtotal: Decimal,
}

/// Reserved-but-unpaid shares, at most one entry per asset.
///
/// Every mutation that moves shares goes through the catalog in the same
/// call, so `available + reserved` for an asset is the same before and after
/// any `reserve` or `release`.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    reservations: Vec<Reservation>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `quantity` shares of `asset_id`, merging with an existing
    /// reservation. Returns the merged quantity.
    pub fn reserve(
        &mut self,
        catalog: &mut Catalog,
        asset_id: AssetId,
        quantity: u64,
    ) -> Result<u64, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        let delta = i64::try_from(quantity).map_err(|_| {
            let available = catalog.get(asset_id).map(|a| a.available_shares()).unwrap_or(0);
            InventoryError::InsufficientInventory {
                asset: asset_id,
                requested: quantity,
                available,
            }
        })?;

        // The catalog rejects the request before the basket is touched, and
        // merging below cannot fail, so a failed reserve changes nothing.
        let available = catalog.adjust_availability(asset_id, -delta)?;

        let merged = match self.reservations.iter_mut().find(|r| r.asset_id == asset_id) {
            Some(existing) => {
                existing.quantity += quantity;
                existing.quantity
            }
            None => {
                self.reservations.push(Reservation { asset_id, quantity });
                quantity
            }
        };

        counter!("inventory.reservations.total").increment(1);
        debug!(asset = %asset_id, quantity, merged, available, "shares reserved");
        Ok(merged)
    }

    /// Drop the whole reservation for `asset_id` and hand its shares back to
    /// the catalog. Returns the released quantity, or `None` if nothing was
    /// reserved.
    pub fn release(
        &mut self,
        catalog: &mut Catalog,
        asset_id: AssetId,
    ) -> Result<Option<u64>, InventoryError> {
        let Some(pos) = self.reservations.iter().position(|r| r.asset_id == asset_id) else {
            return Ok(None);
        };

        let quantity = self.reservations[pos].quantity;
        let delta = i64::try_from(quantity).map_err(|_| InventoryError::OverAllocation {
            asset: asset_id,
            resulting: u64::MAX,
            total: catalog.get(asset_id).map(|a| a.total_shares()).unwrap_or(0),
        })?;

        catalog.adjust_availability(asset_id, delta)?;
        self.reservations.remove(pos);

        counter!("inventory.releases.total").increment(1);
        debug!(asset = %asset_id, quantity, "reservation released");
        Ok(Some(quantity))
    }

    /// Sum of share price × quantity, priced from the catalog on every call.
    /// Fails with [`InventoryError::ValueOverflow`] instead of panicking.
    pub fn total_value(&self, catalog: &Catalog) -> Result<Decimal, InventoryError> {
        self.reservations.iter().try_fold(Decimal::ZERO, |total, r| {
            let Some(asset) = catalog.get(r.asset_id) else {
                return Ok(total);
            };
            total
                .checked_add(asset.quote(r.quantity)?)
                .ok_or(InventoryError::ValueOverflow { asset: r.asset_id })
        })
    }

    /// Forget every reservation without returning shares to the catalog.
    /// Only a committed checkout calls this: the shares are sold.
    pub fn clear(&mut self) {
        self.reservations.clear();
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn quantity_of(&self, asset_id: AssetId) -> u64 {
        self.reservations
            .iter()
            .find(|r| r.asset_id == asset_id)
            .map(|r| r.quantity)
            .unwrap_or(0)
    }

    /// Total reserved shares across all assets.
    pub fn share_count(&self) -> u64 {
        self.reservations.iter().map(|r| r.quantity).sum()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Priced rows in basket order.
    pub fn lines(&self, catalog: &Catalog) -> Result<Vec<BasketLine>, InventoryError> {
        self.reservations
            .iter()
            .filter_map(|r| catalog.get(r.asset_id).map(|asset| (r, asset)))
            .map(|(r, asset)| -> Result<BasketLine, InventoryError> {
                Ok(BasketLine {
                    asset_id: r.asset_id,
                    title: asset.title.clone(),
                    category: asset.category.clone(),
                    quantity: r.quantity,
                    share_price: asset.share_price(),
                    subtotal: asset.quote(r.quantity)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Asset, NewAsset};
    use rust_decimal_macros::dec;

    fn catalog_with(total_price: Decimal, total_shares: u64) -> (Catalog, AssetId) {
        let asset = Asset::list(NewAsset {
            title: "Porsche 911".to_string(),
            description: String::new(),
            category: "Транспорт".to_string(),
            image_url: String::new(),
            total_price,
            total_shares,
            available_shares: None,
            seller_name: "ClassicCars".to_string(),
            rating: 5.0,
            badge: None,
        })
        .unwrap();
        let id = asset.id();
        (Catalog::from_assets(vec![asset]).unwrap(), id)
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let (mut catalog, id) = catalog_with(dec!(1000), 10);
        let mut basket = Basket::new();
        assert_eq!(
            basket.reserve(&mut catalog, id, 0),
            Err(InventoryError::InvalidQuantity)
        );
        assert!(basket.is_empty());
        assert_eq!(catalog.get(id).unwrap().available_shares(), 10);
    }

    #[test]
    fn test_reserve_unknown_asset_leaves_basket_empty() {
        let (mut catalog, _) = catalog_with(dec!(1000), 10);
        let mut basket = Basket::new();
        let missing = AssetId::new();
        assert_eq!(
            basket.reserve(&mut catalog, missing, 1),
            Err(InventoryError::AssetNotFound(missing))
        );
        assert!(basket.is_empty());
    }

    #[test]
    fn test_lines_and_counts() {
        let (mut catalog, id) = catalog_with(dec!(1000), 10);
        let mut basket = Basket::new();
        basket.reserve(&mut catalog, id, 2).unwrap();
        basket.reserve(&mut catalog, id, 1).unwrap();

        assert_eq!(basket.len(), 1);
        assert_eq!(basket.share_count(), 3);
        assert_eq!(basket.quantity_of(id), 3);

        let lines = basket.lines(&catalog).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].share_price, dec!(100));
        assert_eq!(lines[0].subtotal, dec!(300));
        assert_eq!(basket.total_value(&catalog).unwrap(), dec!(300));
    }

    #[test]
    fn test_total_value_overflow_is_an_error() {
        let huge = Decimal::MAX / dec!(2) + dec!(1000);
        let (mut catalog, first) = catalog_with(huge, 2);
        let second = Asset::list(NewAsset {
            title: "Яхта".to_string(),
            description: String::new(),
            category: "Транспорт".to_string(),
            image_url: String::new(),
            total_price: huge,
            total_shares: 2,
            available_shares: None,
            seller_name: "Marine".to_string(),
            rating: 4.0,
            badge: None,
        })
        .unwrap();
        let second_id = second.id();
        catalog.insert(second).unwrap();

        let mut basket = Basket::new();
        basket.reserve(&mut catalog, first, 2).unwrap();
        basket.reserve(&mut catalog, second_id, 2).unwrap();

        assert!(matches!(
            basket.total_value(&catalog),
            Err(InventoryError::ValueOverflow { .. })
        ));
        assert!(basket.lines(&catalog).is_ok());
    }

    #[test]
    fn test_clear_keeps_catalog_counts() {
        let (mut catalog, id) = catalog_with(dec!(1000), 10);
        let mut basket = Basket::new();
        basket.reserve(&mut catalog, id, 4).unwrap();
        basket.clear();

        assert!(basket.is_empty());
        assert_eq!(catalog.get(id).unwrap().available_shares(), 6);
    }
}
