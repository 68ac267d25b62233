use crate::config::VendorLimits;
use crate::describe::DescriptionDraft;
use inventory::{Asset, AssetId, Catalog, InventoryError, NewAsset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Недвижимость";
pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/800/600";
pub const MISSING_DESCRIPTION: &str = "Описание отсутствует";
pub const VENDOR_SELLER_NAME: &str = "Текущий Пользователь";
pub const NEW_LISTING_RATING: f64 = 5.0;

/// Categories a vendor can pick from.
pub const VENDOR_CATEGORIES: [&str; 5] = ["Недвижимость", "Транспорт", "Искусство", "Бизнес", "Техника"];

/// What a vendor typed into the listing form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorForm {
    pub title: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    pub total_shares: u64,
    pub image_url: String,
    pub description: String,
    /// Empty means no badge
    pub badge: String,
}

impl Default for VendorForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            total_price: Decimal::from(1_000_000),
            total_shares: 100,
            image_url: DEFAULT_IMAGE_URL.to_string(),
            description: String::new(),
            badge: String::new(),
        }
    }
}

impl VendorForm {
    /// Price of one share as the form would list it, if the share count is usable.
    pub fn share_price_preview(&self) -> Option<Decimal> {
        (self.total_shares > 0).then(|| self.total_price / Decimal::from(self.total_shares))
    }

    /// Copy a finished draft into the description field. A draft still in
    /// flight or never started leaves the form as it is.
    pub fn apply_draft(&mut self, draft: &DescriptionDraft) -> bool {
        if draft.is_pending() {
            return false;
        }
        match draft.text() {
            Some(text) => {
                self.description = text;
                true
            }
            None => false,
        }
    }

    pub fn validate(&self, limits: &VendorLimits) -> Result<(), InventoryError> {
        if self.title.trim().is_empty() {
            return Err(InventoryError::Validation("title is required".to_string()));
        }
        if self.total_price < limits.min_total_price {
            return Err(InventoryError::Validation(format!(
                "total price must be at least {}",
                limits.min_total_price
            )));
        }
        if self.total_shares < Asset::MIN_SHARES || self.total_shares > limits.max_total_shares {
            return Err(InventoryError::Validation(format!(
                "share count must be between {} and {}",
                Asset::MIN_SHARES,
                limits.max_total_shares
            )));
        }
        Ok(())
    }

    fn into_listing(self) -> NewAsset {
        let description = if self.description.trim().is_empty() {
            MISSING_DESCRIPTION.to_string()
        } else {
            self.description
        };

        NewAsset {
            title: self.title.trim().to_string(),
            description,
            category: self.category,
            image_url: self.image_url,
            total_price: self.total_price,
            total_shares: self.total_shares,
            available_shares: None,
            seller_name: VENDOR_SELLER_NAME.to_string(),
            rating: NEW_LISTING_RATING,
            badge: Some(self.badge),
        }
    }
}

/// Validate the form, price the shares, and list the asset fully available
/// at the front of the catalog.
pub fn submit(
    form: VendorForm,
    limits: &VendorLimits,
    catalog: &mut Catalog,
) -> Result<AssetId, InventoryError> {
    form.validate(limits)?;
    let asset = Asset::list(form.into_listing())?;
    let id = asset.id();
    catalog.insert(asset)?;
    Ok(id)
}
