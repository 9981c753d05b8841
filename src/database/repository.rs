use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewProduct, NewUser, Product, ProductChanges, User, UserChanges};
use crate::filter::ProductQuery;

/// Storage for user accounts and their credentials.
///
/// `update` and `delete` fail with [`DatabaseError::NotFound`] for unknown
/// ids; writes that collide on email fail with [`DatabaseError::Conflict`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    /// All users, oldest first.
    async fn list(&self) -> Result<Vec<User>, DatabaseError>;

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, DatabaseError>;

    /// Remove a user and return the removed row.
    async fn delete(&self, id: i64) -> Result<User, DatabaseError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> Result<Product, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DatabaseError>;

    /// One page of matching products plus the total match count.
    async fn list(&self, query: &ProductQuery) -> Result<(Vec<Product>, i64), DatabaseError>;

    async fn update(&self, id: i64, changes: ProductChanges) -> Result<Product, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<Product, DatabaseError>;
}
