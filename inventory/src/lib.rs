// inventory/src/lib.rs
//! Share pools for fractional-ownership listings.
//!
//! A [`Catalog`] owns every listed [`Asset`] and is the only thing that
//! moves an asset's available share count. A [`Basket`] holds the shares a
//! session has reserved; each reserve or release adjusts the catalog in the
//! same call, so for every asset
//!
//! ```text
//! available + reserved + sold == total
//! ```
//!
//! holds between calls. [`Checkout`] turns the reserved shares into sold
//! ones by forgetting the reservations.
//!
//! ```rust,ignore
//! let mut basket = Basket::new();
//! basket.reserve(&mut catalog, asset_id, 10)?;
//! let outcome = checkout.attempt_checkout(&mut basket, &catalog, true)?;
//! ```

pub mod asset;
pub mod basket;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod favorites;
pub mod pool;

pub use asset::{Asset, AssetId, NewAsset};
pub use basket::{Basket, BasketLine, Reservation};
pub use catalog::Catalog;
pub use checkout::{Checkout, CheckoutOutcome, CheckoutState, Receipt};
pub use error::InventoryError;
pub use favorites::FavoriteSet;
pub use pool::SharePool;
