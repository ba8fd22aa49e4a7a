//! `SeaORM` implementation of the `CategoryService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::constants::categories::NO_PARENT;
use crate::db::{CategoryWrite, Store};
use crate::domain::slug::{category_slug, normalize_name};
use crate::models::category::{Category, CategoryRecord, CategorySummary};
use crate::services::category_service::{CategoryError, CategoryInput, CategoryService};

const SLUG_TAKEN: &str = "Slug already exists. Please use a different name or slug.";
const NAME_TAKEN: &str = "Category name must be unique within this parent category.";

pub struct SeaOrmCategoryService {
    store: Store,
}

impl SeaOrmCategoryService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn resolve_parent(
        &self,
        parent: Option<&str>,
        self_id: Option<&str>,
    ) -> Result<Option<Category>, CategoryError> {
        let Some(parent_id) = parent
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != NO_PARENT)
        else {
            return Ok(None);
        };

        if self_id == Some(parent_id) {
            return Err(CategoryError::Validation(
                "A category cannot be its own parent.".to_string(),
            ));
        }

        self.store
            .get_category(parent_id)
            .await?
            .map(Some)
            .ok_or_else(|| {
                CategoryError::Validation("Selected parent category does not exist.".to_string())
            })
    }

    /// Shared create/update validation. `existing` supplies fallbacks for
    /// omitted description and keywords.
    async fn build_record(
        &self,
        input: CategoryInput,
        existing: Option<&Category>,
    ) -> Result<CategoryRecord, CategoryError> {
        let name = normalize_name(input.name.as_deref().unwrap_or_default());
        if name.is_empty() {
            return Err(CategoryError::Validation(
                "Category name is required.".to_string(),
            ));
        }

        let parent = self
            .resolve_parent(
                input.parent_category.as_deref(),
                existing.map(|c| c.id.as_str()),
            )
            .await?;

        let slug = category_slug(
            &name,
            input.slug.as_deref(),
            parent.as_ref().map(|p| p.name.as_str()),
        );

        let keep = |value: Option<String>, previous: Option<&String>| {
            value
                .filter(|v| !v.is_empty())
                .or_else(|| previous.cloned())
                .unwrap_or_default()
        };

        Ok(CategoryRecord {
            name,
            slug,
            parent_id: parent.map(|p| p.id),
            description: keep(input.description, existing.map(|c| &c.description)),
            keywords: keep(input.keywords, existing.map(|c| &c.keywords)),
        })
    }

    fn saved(write: CategoryWrite) -> Result<Category, CategoryError> {
        match write {
            CategoryWrite::Saved(category) => Ok(category),
            CategoryWrite::SlugTaken => Err(CategoryError::Conflict(SLUG_TAKEN.to_string())),
            CategoryWrite::NameTaken => Err(CategoryError::Conflict(NAME_TAKEN.to_string())),
        }
    }
}

#[async_trait]
impl CategoryService for SeaOrmCategoryService {
    async fn create(&self, input: CategoryInput) -> Result<Category, CategoryError> {
        let record = self.build_record(input, None).await?;
        let category = Self::saved(self.store.insert_category(&record).await?)?;

        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    async fn list(&self) -> Result<Vec<CategorySummary>, CategoryError> {
        let (categories, mut stats) = tokio::try_join!(
            self.store.list_categories(),
            self.store.category_post_stats()
        )?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let stats = stats.remove(&category.id).unwrap_or_default();
                CategorySummary::new(category, stats.post_count, stats.last_published)
            })
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Category, CategoryError> {
        self.store
            .get_category(id)
            .await?
            .ok_or(CategoryError::NotFound)
    }

    async fn update(&self, id: &str, input: CategoryInput) -> Result<Category, CategoryError> {
        let existing = self.get(id).await?;
        let record = self.build_record(input, Some(&existing)).await?;

        let write = self
            .store
            .update_category(id, &record)
            .await?
            .ok_or(CategoryError::NotFound)?;
        let category = Self::saved(write)?;

        info!(category_id = %category.id, "Category updated");
        Ok(category)
    }

    async fn delete(&self, id: &str) -> Result<(), CategoryError> {
        if !self.store.delete_category(id).await? {
            return Err(CategoryError::NotFound);
        }

        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    async fn refresh_last_updated(&self, id: &str) -> Result<Option<String>, CategoryError> {
        let latest = self.store.latest_category_publish(id).await?;

        if !self
            .store
            .set_category_last_updated(id, latest.clone())
            .await?
        {
            return Err(CategoryError::NotFound);
        }

        Ok(latest)
    }
}
