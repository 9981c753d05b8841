use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::manager::DatabaseError;
use crate::database::models::{NewProduct, NewUser, Product, ProductChanges, User, UserChanges};
use crate::database::repository::{ProductRepository, UserRepository};
use crate::filter::{ProductFilter, ProductQuery};

const USER_COLUMNS: &str =
    "\"id\", \"name\", \"email\", \"role\", \"password_hash\", \"created_at\", \"updated_at\"";
const PRODUCT_COLUMNS: &str =
    "\"id\", \"name\", \"description\", \"price\", \"category\", \"created_at\", \"updated_at\"";

const EMAIL_TAKEN: &str = "Email is already registered";

/// Reads surface undecodable rows as `Corrupt` instead of a bare sqlx error.
fn read_error(err: sqlx::Error) -> DatabaseError {
    match err {
        sqlx::Error::ColumnDecode { index, source } => DatabaseError::Corrupt(format!("{}: {}", index, source)),
        other => DatabaseError::Sqlx(other),
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM \"users\" WHERE \"email\" = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM \"users\" WHERE \"id\" = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM \"users\" ORDER BY \"id\" ASC", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(read_error)
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO \"users\" (\"name\", \"email\", \"role\", \"password_hash\") VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.name)
            .bind(user.email)
            .bind(user.role.as_str())
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, EMAIL_TAKEN))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, DatabaseError> {
        if changes.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)));
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE \"users\" SET \"updated_at\" = now()");
        if let Some(name) = changes.name {
            qb.push(", \"name\" = ").push_bind(name);
        }
        if let Some(email) = changes.email {
            qb.push(", \"email\" = ").push_bind(email);
        }
        if let Some(role) = changes.role {
            qb.push(", \"role\" = ").push_bind(role.as_str());
        }
        if let Some(password_hash) = changes.password_hash {
            qb.push(", \"password_hash\" = ").push_bind(password_hash);
        }
        qb.push(" WHERE \"id\" = ").push_bind(id);
        qb.push(" RETURNING ").push(USER_COLUMNS);

        qb.build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, EMAIL_TAKEN))?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }

    async fn delete(&self, id: i64) -> Result<User, DatabaseError> {
        let sql = format!("DELETE FROM \"users\" WHERE \"id\" = $1 RETURNING {}", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, DatabaseError> {
        let sql = format!(
            "INSERT INTO \"products\" (\"name\", \"description\", \"price\", \"category\") VALUES ($1, $2, $3, $4) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(product.name)
            .bind(product.description)
            .bind(product.price)
            .bind(product.category)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        let sql = format!("SELECT {} FROM \"products\" WHERE \"id\" = $1", PRODUCT_COLUMNS);
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)
    }

    async fn list(&self, query: &ProductQuery) -> Result<(Vec<Product>, i64), DatabaseError> {
        let filter = ProductFilter::new(query);

        let select = filter.to_sql();
        let mut rows = sqlx::query_as::<_, Product>(&select.query);
        for param in &select.params {
            rows = rows.bind(param);
        }
        let items = rows.fetch_all(&self.pool).await.map_err(read_error)?;

        let count = filter.to_count_sql();
        let mut total = sqlx::query_scalar::<_, i64>(&count.query);
        for param in &count.params {
            total = total.bind(param);
        }
        let total = total.fetch_one(&self.pool).await?;

        Ok((items, total))
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> Result<Product, DatabaseError> {
        if changes.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| DatabaseError::NotFound(format!("Product {} not found", id)));
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE \"products\" SET \"updated_at\" = now()");
        if let Some(name) = changes.name {
            qb.push(", \"name\" = ").push_bind(name);
        }
        if let Some(description) = changes.description {
            qb.push(", \"description\" = ").push_bind(description);
        }
        if let Some(price) = changes.price {
            qb.push(", \"price\" = ").push_bind(price);
        }
        if let Some(category) = changes.category {
            qb.push(", \"category\" = ").push_bind(category);
        }
        qb.push(" WHERE \"id\" = ").push_bind(id);
        qb.push(" RETURNING ").push(PRODUCT_COLUMNS);

        qb.build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)?
            .ok_or_else(|| DatabaseError::NotFound(format!("Product {} not found", id)))
    }

    async fn delete(&self, id: i64) -> Result<Product, DatabaseError> {
        let sql = format!("DELETE FROM \"products\" WHERE \"id\" = $1 RETURNING {}", PRODUCT_COLUMNS);
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error)?
            .ok_or_else(|| DatabaseError::NotFound(format!("Product {} not found", id)))
    }
}
