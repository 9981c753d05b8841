use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewProduct, NewUser, Product, ProductChanges, User, UserChanges};
use crate::database::repository::{ProductRepository, UserRepository};
use crate::filter::{ProductQuery, SortDirection, SortField};

/// Rows keyed by id, plus the next id to hand out.
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Process-local user store used by tests and `serve --memory`.
#[derive(Default)]
pub struct MemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("Email is already registered".to_string()));
        }

        let now = Utc::now();
        let id = table.allocate_id();
        let created = User {
            id,
            name: user.name,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, DatabaseError> {
        let mut table = self.table.write().await;
        if let Some(email) = &changes.email {
            if table.rows.values().any(|u| u.id != id && &u.email == email) {
                return Err(DatabaseError::Conflict("Email is already registered".to_string()));
            }
        }

        let user = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))?;
        if changes.is_empty() {
            return Ok(user.clone());
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<User, DatabaseError> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }
}

#[derive(Default)]
pub struct MemoryProductRepository {
    table: RwLock<Table<Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(product: &Product, query: &ProductQuery) -> bool {
    if let Some(category) = &query.category {
        if &product.category != category {
            return false;
        }
    }
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        if !product.name.to_lowercase().contains(&needle) && !product.description.to_lowercase().contains(&needle) {
            return false;
        }
    }
    true
}

fn compare(a: &Product, b: &Product, field: SortField) -> Ordering {
    let primary = match field {
        SortField::Id => Ordering::Equal,
        SortField::Name => a.name.cmp(&b.name),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::Category => a.category.cmp(&b.category),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, DatabaseError> {
        let mut table = self.table.write().await;
        let now = Utc::now();
        let id = table.allocate_id();
        let created = Product {
            id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, query: &ProductQuery) -> Result<(Vec<Product>, i64), DatabaseError> {
        let table = self.table.read().await;
        let mut hits: Vec<&Product> = table.rows.values().filter(|p| matches(p, query)).collect();

        hits.sort_by(|a, b| {
            let ordering = compare(a, b, query.order.field);
            match query.order.sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = hits.len() as i64;
        let offset = usize::try_from(query.pagination.offset()).unwrap_or(usize::MAX);
        let items = hits
            .into_iter()
            .skip(offset)
            .take(query.pagination.limit as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> Result<Product, DatabaseError> {
        let mut table = self.table.write().await;
        let product = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Product {} not found", id)))?;
        if changes.is_empty() {
            return Ok(product.clone());
        }
        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(category) = changes.category {
            product.category = category;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> Result<Product, DatabaseError> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Product {} not found", id)))
    }
}
