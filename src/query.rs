use inventory::Asset;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Storefront label for "every category".
pub const ALL_CATEGORIES_LABEL: &str = "Все";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Rating, highest first
    #[default]
    Popular,
    /// Share price, cheapest first
    PriceAsc,
    /// Share price, most expensive first
    PriceDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Popular => "popular",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
        }
    }

    fn compare(&self, a: &Asset, b: &Asset) -> Ordering {
        match self {
            SortKey::Popular => b.rating.total_cmp(&a.rating),
            SortKey::PriceAsc => a.share_price().cmp(&b.share_price()),
            SortKey::PriceDesc => b.share_price().cmp(&a.share_price()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "popular" => Ok(SortKey::Popular),
            "price_asc" => Ok(SortKey::PriceAsc),
            "price_desc" => Ok(SortKey::PriceDesc),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    /// `"all"` (any case) and the storefront label map to [`CategoryFilter::All`];
    /// anything else is an exact category name.
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("all") || s == ALL_CATEGORIES_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CategoryFilter::from(s))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(name) => f.write_str(name),
        }
    }
}

/// Search, category and sort settings for a catalog view.
/// The default value is the "reset filters" state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn apply<'a>(&self, assets: &'a [Asset]) -> Vec<&'a Asset> {
        query(assets, &self.search, &self.category, self.sort)
    }
}

/// Filter and order `assets` without touching them.
///
/// Search is a case-insensitive substring match on title or description,
/// taken verbatim; only empty text matches everything. Sorting is stable, so equal keys keep
/// catalog order.
pub fn query<'a>(
    assets: &'a [Asset],
    search_text: &str,
    category: &CategoryFilter,
    sort_key: SortKey,
) -> Vec<&'a Asset> {
    let needle = search_text.to_lowercase();

    let mut result: Vec<&Asset> = assets
        .iter()
        .filter(|a| category.matches(&a.category))
        .filter(|a| {
            needle.is_empty()
                || a.title.to_lowercase().contains(&needle)
                || a.description.to_lowercase().contains(&needle)
        })
        .collect();

    // slice::sort_by is stable
    result.sort_by(|a, b| sort_key.compare(a, b));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory::NewAsset;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn asset(title: &str, description: &str, category: &str, price: Decimal, rating: f64) -> Asset {
        Asset::list(NewAsset {
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            image_url: String::new(),
            total_price: price,
            total_shares: 10,
            available_shares: None,
            seller_name: "seller".to_string(),
            rating,
            badge: None,
        })
        .unwrap()
    }

    fn titles(view: &[&Asset]) -> Vec<String> {
        view.iter().map(|a| a.title.clone()).collect()
    }

    fn sample() -> Vec<Asset> {
        vec![
            asset("Офис в ЦАО", "Арендный бизнес", "Недвижимость", dec!(1000), 4.8),
            asset("Porsche 911", "Винтажный автомобиль", "Транспорт", dec!(3000), 5.0),
            asset("Кластер H100", "Сервер для ИИ", "Техника", dec!(2000), 4.5),
            asset("Картина", "Оригинал, АРЕНДНЫЙ показ", "Искусство", dec!(500), 4.9),
        ]
    }

    #[test]
    fn test_default_is_popular_over_everything() {
        let assets = sample();
        let view = CatalogQuery::default().apply(&assets);
        assert_eq!(
            titles(&view),
            vec!["Porsche 911", "Картина", "Офис в ЦАО", "Кластер H100"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let assets = sample();
        let view = CatalogQuery::new()
            .search("арендн")
            .sort(SortKey::PriceAsc)
            .apply(&assets);
        assert_eq!(titles(&view), vec!["Картина", "Офис в ЦАО"]);

        let view = CatalogQuery::new().search("PORSCHE").apply(&assets);
        assert_eq!(titles(&view), vec!["Porsche 911"]);

        let view = CatalogQuery::new().search("").apply(&assets);
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_search_text_is_not_trimmed() {
        let assets = sample();
        let view = CatalogQuery::new().search(" ЦАО").apply(&assets);
        assert_eq!(titles(&view), vec!["Офис в ЦАО"]);

        let view = CatalogQuery::new().search(" Porsche").apply(&assets);
        assert!(view.is_empty());

        let view = CatalogQuery::new().search("   ").apply(&assets);
        assert!(view.is_empty());
    }

    #[test]
    fn test_category_filter() {
        let assets = sample();
        let view = CatalogQuery::new().category("Техника").apply(&assets);
        assert_eq!(titles(&view), vec!["Кластер H100"]);

        let view = CatalogQuery::new().category(ALL_CATEGORIES_LABEL).apply(&assets);
        assert_eq!(view.len(), 4);

        let view = CatalogQuery::new().category("Бизнес").apply(&assets);
        assert!(view.is_empty());
    }

    #[test]
    fn test_price_sorts() {
        let assets = sample();
        let asc = CatalogQuery::new().sort(SortKey::PriceAsc).apply(&assets);
        assert_eq!(
            titles(&asc),
            vec!["Картина", "Офис в ЦАО", "Кластер H100", "Porsche 911"]
        );

        let desc = CatalogQuery::new().sort(SortKey::PriceDesc).apply(&assets);
        assert_eq!(
            titles(&desc),
            vec!["Porsche 911", "Кластер H100", "Офис в ЦАО", "Картина"]
        );
    }

    #[test]
    fn test_equal_keys_keep_catalog_order() {
        let assets = vec![
            asset("b", "", "Art", dec!(100), 4.0),
            asset("a", "", "Art", dec!(100), 4.0),
            asset("c", "", "Art", dec!(50), 4.0),
            asset("d", "", "Art", dec!(100), 4.0),
        ];

        let asc = query(&assets, "", &CategoryFilter::All, SortKey::PriceAsc);
        assert_eq!(titles(&asc), vec!["c", "b", "a", "d"]);

        let desc = query(&assets, "", &CategoryFilter::All, SortKey::PriceDesc);
        assert_eq!(titles(&desc), vec!["b", "a", "d", "c"]);

        let popular = query(&assets, "", &CategoryFilter::All, SortKey::Popular);
        assert_eq!(titles(&popular), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_query_does_not_reorder_input() {
        let assets = sample();
        let before: Vec<_> = assets.iter().map(|a| a.id()).collect();
        let _ = CatalogQuery::new().sort(SortKey::PriceDesc).apply(&assets);
        let after: Vec<_> = assets.iter().map(|a| a.id()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sort_key_names() {
        assert_eq!("price_asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!(SortKey::PriceDesc.to_string(), "price_desc");
        assert!("cheapest".parse::<SortKey>().is_err());
        assert_eq!("ALL".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
    }
}
