// inventory/src/error.rs
use crate::AssetId;
use thiserror::Error;

/// Every variant is local to one operation: the catalog and basket are left
/// exactly as they were before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Insufficient inventory for {asset}: requested {requested}, available {available}")]
    InsufficientInventory {
        asset: AssetId,
        requested: u64,
        available: u64,
    },

    #[error("Over-allocation for {asset}: {resulting} would exceed {total} total shares")]
    OverAllocation {
        asset: AssetId,
        resulting: u64,
        total: u64,
    },

    #[error("Asset not found: {0}")]
    AssetNotFound(AssetId),

    #[error("Asset already listed: {0}")]
    DuplicateAsset(AssetId),

    #[error("Quantity must be at least one share")]
    InvalidQuantity,

    #[error("Value of {asset} exceeds the representable range")]
    ValueOverflow { asset: AssetId },
}

impl InventoryError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
