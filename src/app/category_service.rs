use crate::app::error::{ServiceError, ServiceResult};
use crate::domain::model::Category;
use crate::domain::slug::{slugify, SlugOptions};
use crate::storage::CategoryRepository;
use std::sync::Arc;
use uuid::Uuid;

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

fn trimmed_name(name: &str) -> ServiceResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("Name is required".to_string()));
    }
    Ok(name)
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// Creates a category with a lowercase, strict slug.
    ///
    /// The uniqueness check and the insert are separate round trips.
    pub async fn create(&self, name: &str) -> ServiceResult<Category> {
        let name = trimmed_name(name)?;
        if self.categories.find_by_name(name).await?.is_some() {
            return Err(ServiceError::Conflict("Category Already Exists".to_string()));
        }
        let category = Category::new(
            name.to_string(),
            slugify(name, SlugOptions::STRICT_LOWER),
        );
        let created = self.categories.insert(&category).await?;
        tracing::info!(category_id = %created.id, slug = %created.slug, "category created");
        Ok(created)
    }

    /// Renames a category. Uniqueness is not re-checked and the slug uses the default
    /// options, so a renamed category's slug keeps the name's case.
    pub async fn update(&self, id: Uuid, name: &str) -> ServiceResult<Option<Category>> {
        let name = trimmed_name(name)?;
        let slug = slugify(name, SlugOptions::default());
        let updated = self.categories.update(id, name, &slug).await?;
        tracing::info!(category_id = %id, found = updated.is_some(), "category updated");
        Ok(updated)
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.categories.list_all().await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> ServiceResult<Option<Category>> {
        Ok(self.categories.find_by_slug(slug).await?)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> ServiceResult<()> {
        self.categories.delete(id).await?;
        tracing::info!(category_id = %id, "category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> (CategoryService, MemoryStore) {
        let store = MemoryStore::new();
        (CategoryService::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn blank_names_fail_without_writing() {
        let (service, store) = service();
        for name in ["", "   ", "\t\n"] {
            assert!(matches!(service.create(name).await, Err(ServiceError::Validation(_))));
        }
        let existing = service.create("Books").await.unwrap();
        assert!(matches!(
            service.update(existing.id, "  ").await,
            Err(ServiceError::Validation(_))
        ));
        let all = CategoryRepository::list_all(&store).await.unwrap();
        assert_eq!(all, vec![existing]);
    }

    #[tokio::test]
    async fn duplicate_trimmed_name_conflicts() {
        let (service, _) = service();
        let created = service.create("  Garden Tools ").await.unwrap();
        assert_eq!(created.name, "Garden Tools");
        assert_eq!(created.slug, "garden-tools");
        assert!(matches!(
            service.create("Garden Tools").await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn rename_uses_default_slug_options_and_skips_uniqueness() {
        let (service, _) = service();
        let a = service.create("Lamps").await.unwrap();
        service.create("Rugs").await.unwrap();
        let renamed = service.update(a.id, "Rugs").await.unwrap().unwrap();
        assert_eq!(renamed.slug, "Rugs");
    }

    #[tokio::test]
    async fn absent_targets_are_not_errors() {
        let (service, _) = service();
        assert_eq!(service.update(Uuid::new_v4(), "Ghost").await.unwrap(), None);
        assert_eq!(service.get_by_slug("ghost").await.unwrap(), None);
        service.delete_by_id(Uuid::new_v4()).await.unwrap();
    }
}
