//! Category operations

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, CategoryEntry, CategoryFilter};
use crate::query;
use crate::store::Store;

impl Store {
    /// Categories in display order, after the synthetic "all" entry
    pub fn list_categories(&self) -> Vec<CategoryEntry> {
        query::category_entries(&self.categories)
    }

    /// Persisted categories in display order
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = self.categories.clone();
        query::sort_categories(&mut categories);
        categories
    }

    /// Look up a category in the snapshot
    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Create a category at the end of the list
    ///
    /// Names are trimmed and must be unique ignoring case.
    pub async fn create_category(&mut self, name: &str) -> Result<Category> {
        let name = validate_name(name)?;
        self.ensure_unique_name(&name, None)?;

        let mut category = Category::new(name, self.categories.len() as i64);
        category.id = self.db.add(&category).await?;
        debug!("Created category {} ({})", category.id, category.name);

        self.refresh().await?;
        Ok(category)
    }

    /// Rename a category
    ///
    /// Renaming to the current name is a no-op.
    pub async fn rename_category(&mut self, id: i64, new_name: &str) -> Result<Category> {
        let mut category = self
            .category(id)
            .cloned()
            .ok_or_else(|| Error::category_not_found(id))?;

        let name = validate_name(new_name)?;
        if name == category.name {
            return Ok(category);
        }
        self.ensure_unique_name(&name, Some(id))?;

        category.name = name;
        self.db.upsert(&category).await?;
        debug!("Renamed category {} to {}", id, category.name);

        self.refresh().await?;
        Ok(category)
    }

    /// Delete a category; its bookmarks become uncategorized
    ///
    /// Returns the number of bookmarks detached. Deleting an unknown id
    /// is a no-op. A selected category falls back to "all".
    pub async fn delete_category(&mut self, id: i64) -> Result<usize> {
        // Cascade even when the snapshot does not know the id; it may lag
        let detached = self.db.remove_category_cascade(id).await?;

        if self.selected == CategoryFilter::Id(id) {
            self.selected = CategoryFilter::All;
        }
        self.refresh().await?;
        Ok(detached)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<i64>) -> Result<()> {
        let lowered = name.to_lowercase();
        let taken = self
            .categories
            .iter()
            .filter(|c| Some(c.id) != except)
            .any(|c| c.name.to_lowercase() == lowered);

        if taken {
            return Err(Error::ConstraintViolation(format!(
                "A category named '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }
    Ok(name.to_string())
}
