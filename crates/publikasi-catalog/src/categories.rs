//! Category store: CRUD over the two-level hierarchy.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use publikasi_core::{
    Category, CategoryInput, CategoryNode, CategoryRepository, Error, NewCategory,
    PublicationRepository, Result, ROOT_LEVEL, SUB_LEVEL,
};

/// Category operations with hierarchy invariants enforced before storage.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    publications: Arc<dyn PublicationRepository>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        publications: Arc<dyn PublicationRepository>,
    ) -> Self {
        Self {
            categories,
            publications,
        }
    }

    async fn require(&self, id: Uuid) -> Result<Category> {
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Category {} not found", id)))
    }

    /// Parent must exist and be a root.
    async fn check_parent(&self, parent_id: Uuid) -> Result<()> {
        let parent = self
            .categories
            .get(parent_id)
            .await?
            .ok_or(Error::ParentNotFound(parent_id))?;
        if parent.level != ROOT_LEVEL {
            return Err(Error::DepthExceeded(parent_id));
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Category> {
        self.require(id).await
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category> {
        let name = input.validated_name()?;

        if self.categories.get_by_name(&name).await?.is_some() {
            return Err(Error::DuplicateName(name));
        }
        if let Some(parent_id) = input.parent_id {
            self.check_parent(parent_id).await?;
        }

        let category = self
            .categories
            .insert(NewCategory {
                name,
                description: input.description,
                parent_id: input.parent_id,
                level: if input.parent_id.is_some() {
                    SUB_LEVEL
                } else {
                    ROOT_LEVEL
                },
                display_order: input.display_order.unwrap_or(0),
            })
            .await?;

        info!(
            subsystem = "catalog",
            component = "categories",
            op = "create",
            category_id = %category.id,
            level = category.level,
            "Category created"
        );
        Ok(category)
    }

    /// Replace name, description, parent and display order.
    ///
    /// Clearing the parent demotes the category to a root unconditionally.
    pub async fn update(&self, id: Uuid, input: CategoryInput) -> Result<Category> {
        if input.parent_id == Some(id) {
            return Err(Error::SelfParent(id));
        }

        let mut category = self.require(id).await?;
        let name = input.validated_name()?;

        if let Some(existing) = self.categories.get_by_name(&name).await? {
            if existing.id != id {
                return Err(Error::DuplicateName(name));
            }
        }

        if let Some(parent_id) = input.parent_id {
            self.check_parent(parent_id).await?;
            if self.categories.count_children(id).await? > 0 {
                return Err(Error::HasChildren(id));
            }
        }

        category.name = name;
        category.description = input.description;
        category.parent_id = input.parent_id;
        category.level = if input.parent_id.is_some() {
            SUB_LEVEL
        } else {
            ROOT_LEVEL
        };
        if let Some(order) = input.display_order {
            category.display_order = order;
        }

        self.categories.update(&category).await?;
        info!(
            subsystem = "catalog",
            component = "categories",
            op = "update",
            category_id = %id,
            level = category.level,
            "Category updated"
        );

        self.require(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.require(id).await?;

        let count = self.publications.count_by_category(id).await?;
        if count > 0 {
            return Err(Error::HasPublications { id, count });
        }
        if self.categories.count_children(id).await? > 0 {
            return Err(Error::HasChildren(id));
        }

        self.categories.delete(id).await?;
        info!(
            subsystem = "catalog",
            component = "categories",
            op = "delete",
            category_id = %id,
            "Category deleted"
        );
        Ok(())
    }

    /// Roots by display order, each with its ordered sub-categories.
    pub async fn list_tree(&self) -> Result<Vec<CategoryNode>> {
        let (roots, all) = futures::future::try_join(
            self.categories.list_children(None),
            self.categories.list_all(),
        )
        .await?;

        let mut children: HashMap<Uuid, Vec<Category>> = HashMap::new();
        for category in all {
            if let Some(parent_id) = category.parent_id {
                children.entry(parent_id).or_default().push(category);
            }
        }

        let tree: Vec<CategoryNode> = roots
            .into_iter()
            .map(|root| {
                let mut sub_categories = children.remove(&root.id).unwrap_or_default();
                sub_categories.sort_by(|a, b| {
                    a.display_order
                        .cmp(&b.display_order)
                        .then_with(|| a.name.cmp(&b.name))
                });
                CategoryNode {
                    category: root,
                    sub_categories,
                }
            })
            .collect();

        debug!(
            subsystem = "catalog",
            component = "categories",
            op = "list_tree",
            result_count = tree.len(),
            "Category tree assembled"
        );
        Ok(tree)
    }

    pub async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Category>> {
        self.require(parent_id).await?;
        self.categories.list_children(Some(parent_id)).await
    }

    pub async fn list_all(&self) -> Result<Vec<Category>> {
        self.categories.list_all().await
    }
}
