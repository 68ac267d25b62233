use crate::Error;
use inventory::{Asset, Catalog, NewAsset};

const SEED_CATALOG: &str = include_str!("../data/seed_catalog.json");

/// Storefront category tabs, led by the "all" sentinel.
pub const STOREFRONT_CATEGORIES: [&str; 6] = [
    crate::query::ALL_CATEGORIES_LABEL,
    "Недвижимость",
    "Транспорт",
    "Техника",
    "Искусство",
    "Бизнес",
];

/// Parse a JSON array of listings into a catalog, keeping document order.
pub fn catalog_from_json(json: &str) -> Result<Catalog, Error> {
    let listings: Vec<NewAsset> = serde_json::from_str(json)?;
    let assets = listings
        .into_iter()
        .map(Asset::list)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Catalog::from_assets(assets)?)
}

/// The launch listings bundled with the crate.
pub fn seeded_catalog() -> Result<Catalog, Error> {
    catalog_from_json(SEED_CATALOG)
}
