//! In-process company store

use super::traits::{CompanyStore, StoreError};
use crate::companies::{Company, CompanyFilter, NewCompany};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    companies: BTreeMap<i64, Company>,
    next_id: i64,
}

/// Company store held in memory, ids ascending from 1
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .companies
            .values()
            .find(|c| c.matches_name(name))
            .cloned())
    }

    async fn get(&self, id: i64) -> Result<Option<Company>, StoreError> {
        Ok(self.inner.read().await.companies.get(&id).cloned())
    }

    async fn insert(&self, company: NewCompany) -> Result<Company, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let company = company.into_company(inner.next_id);
        inner.companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn update(&self, company: &Company) -> Result<Company, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.companies.get_mut(&company.id) {
            Some(existing) => {
                *existing = company.clone();
                Ok(company.clone())
            }
            None => Err(StoreError::NotFound(company.id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.companies.remove(&id).is_some())
    }

    async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>, StoreError> {
        let inner = self.inner.read().await;
        Ok(filter.apply(inner.companies.values().cloned()))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().await.companies.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_company(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            economic_sector: "Technology".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = MemoryStore::new();
        let a = store.insert(new_company("Alpha")).await.unwrap();
        let b = store.insert(new_company("Beta")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_by_name_first_match() {
        let store = MemoryStore::new();
        store.insert(new_company("Acme Corp")).await.unwrap();
        store.insert(new_company("ACME CORP")).await.unwrap();

        let found = store.find_by_name("acme corp").await.unwrap().unwrap();
        assert_eq!(found.id, 1);
        assert!(store.find_by_name("Acme").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let mut company = store.insert(new_company("Alpha")).await.unwrap();
        company.country_of_origin = "Sweden".to_string();
        store.update(&company).await.unwrap();
        assert_eq!(
            store.get(company.id).await.unwrap().unwrap().country_of_origin,
            "Sweden"
        );

        assert!(store.delete(company.id).await.unwrap());
        assert!(!store.delete(company.id).await.unwrap());
        assert!(matches!(
            store.update(&company).await,
            Err(StoreError::NotFound(1))
        ));
    }
}
