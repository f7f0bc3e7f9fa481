//! Read access to saved order templates.

use std::collections::HashMap;

use async_trait::async_trait;
use framing_core::OrderTemplate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ServiceResult;

/// Template lookups. Creating and editing templates belongs to the
/// persistence layer.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All templates ordered by name.
    async fn list_templates(&self) -> ServiceResult<Vec<OrderTemplate>>;

    async fn get_template(&self, id: Uuid) -> ServiceResult<Option<OrderTemplate>>;
}

#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<Uuid, OrderTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, template: OrderTemplate) {
        self.templates.write().await.insert(template.id, template);
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn list_templates(&self) -> ServiceResult<Vec<OrderTemplate>> {
        let mut templates: Vec<OrderTemplate> =
            self.templates.read().await.values().cloned().collect();
        templates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(templates)
    }

    async fn get_template(&self, id: Uuid) -> ServiceResult<Option<OrderTemplate>> {
        Ok(self.templates.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let store = InMemoryTemplateStore::new();
        store.insert(OrderTemplate::new("Standard poster")).await;
        store.insert(OrderTemplate::new("akvarell")).await;
        store.insert(OrderTemplate::new("Museum")).await;

        let names: Vec<String> = store
            .list_templates()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["akvarell", "Museum", "Standard poster"]);
    }

    #[tokio::test]
    async fn test_get_template() {
        let store = InMemoryTemplateStore::new();
        let template = OrderTemplate::new("Museum");
        let id = template.id;
        store.insert(template).await;

        assert_eq!(store.get_template(id).await.unwrap().unwrap().name, "Museum");
        assert!(store.get_template(Uuid::new_v4()).await.unwrap().is_none());
    }
}
