// inventory/src/favorites.rs
use crate::AssetId;
use std::collections::HashSet;

/// Presentational bookmark set. Holds no inventory meaning.
#[derive(Debug, Clone, Default)]
pub struct FavoriteSet {
    ids: HashSet<AssetId>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership. Returns `true` if the asset is a favorite afterwards.
    pub fn toggle(&mut self, id: AssetId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.ids.iter()
    }
}
