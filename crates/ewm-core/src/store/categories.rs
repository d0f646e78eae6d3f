//! Category administration and lookup.

use ewm_types::Page;

use super::{next, EwmStore};
use crate::{validation::validate, Category, EwmError, NewCategory, Result};

impl EwmStore {
    // ==================== Categories ====================

    /// Creates a category; names are unique.
    pub fn create_category(&self, input: NewCategory) -> Result<Category> {
        validate(&input)?;

        let mut tables = self.tables.write();
        if tables.categories.values().any(|c| c.name == input.name) {
            return Err(EwmError::CategoryNameTaken { name: input.name });
        }

        let category = Category {
            id: next(&mut tables.seq.category),
            name: input.name,
        };
        tables.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Renames a category. Keeping the current name is allowed.
    pub fn update_category(&self, id: u64, input: NewCategory) -> Result<Category> {
        validate(&input)?;

        let mut tables = self.tables.write();
        tables.category(id)?;
        if tables
            .categories
            .values()
            .any(|c| c.id != id && c.name == input.name)
        {
            return Err(EwmError::CategoryNameTaken { name: input.name });
        }

        let category = Category {
            id,
            name: input.name,
        };
        tables.categories.insert(id, category.clone());

        tracing::info!(category_id = id, name = %category.name, "category renamed");
        Ok(category)
    }

    /// Deletes a category no event is filed under.
    pub fn delete_category(&self, id: u64) -> Result<()> {
        let mut tables = self.tables.write();
        tables.category(id)?;
        if tables.events.values().any(|e| e.category_id == id) {
            return Err(EwmError::CategoryInUse { id });
        }
        tables.categories.remove(&id);

        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }

    /// Gets a category by id.
    pub fn get_category(&self, id: u64) -> Result<Category> {
        self.tables.read().category(id).cloned()
    }

    /// Lists categories by id.
    pub fn list_categories(&self, page: Page) -> Vec<Category> {
        let tables = self.tables.read();
        page.apply(tables.categories.values().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::*;

    #[test]
    fn test_names_are_unique() {
        let store = EwmStore::new();
        let music = store.create_category(NewCategory::new("Music")).unwrap();
        store.create_category(NewCategory::new("Sport")).unwrap();

        assert!(matches!(
            store.create_category(NewCategory::new("Music")),
            Err(EwmError::CategoryNameTaken { .. })
        ));
        assert!(matches!(
            store.update_category(music.id, NewCategory::new("Sport")),
            Err(EwmError::CategoryNameTaken { .. })
        ));

        // renaming to itself is fine
        let same = store
            .update_category(music.id, NewCategory::new("Music"))
            .unwrap();
        assert_eq!(same, music);
    }

    #[test]
    fn test_blank_name_rejected() {
        let store = EwmStore::new();
        assert!(matches!(
            store.create_category(NewCategory::new("   ")),
            Err(EwmError::Validation(_))
        ));
    }

    #[test]
    fn test_update_unknown() {
        let store = EwmStore::new();
        assert!(matches!(
            store.update_category(7, NewCategory::new("Theatre")),
            Err(EwmError::CategoryNotFound { id: 7 })
        ));
    }

    #[test]
    fn test_delete_refuses_used_category() {
        let fx = Fixture::pending(0, true);
        assert!(matches!(
            fx.store.delete_category(fx.category),
            Err(EwmError::CategoryInUse { .. })
        ));

        let empty = fx
            .store
            .create_category(NewCategory::new("Empty"))
            .unwrap();
        fx.store.delete_category(empty.id).unwrap();
        assert!(fx.store.get_category(empty.id).is_err());
    }

    #[test]
    fn test_list_pages() {
        let store = EwmStore::new();
        for name in ["a", "b", "c"] {
            store.create_category(NewCategory::new(name)).unwrap();
        }
        let names: Vec<_> = store
            .list_categories(Page { from: 1, size: 5 })
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
