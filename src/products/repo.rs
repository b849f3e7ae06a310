use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewProduct, Product, ProductChanges};
use crate::error::AppError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError>;
    async fn list(&self) -> Result<Vec<Product>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgProductRepo {
    db: PgPool,
}

impl PgProductRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepo {
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, category, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, category, quantity, price
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.quantity)
        .bind(product.price)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"SELECT id, name, category, quantity, price FROM products ORDER BY name"#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, Product>(
            r#"SELECT id, name, category, quantity, price FROM products WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET name     = COALESCE($2, name),
                   category = COALESCE($3, category),
                   quantity = COALESCE($4, quantity),
                   price    = COALESCE($5, price)
             WHERE id = $1
            RETURNING id, name, category, quantity, price
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.category)
        .bind(changes.quantity)
        .bind(changes.price)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query(r#"DELETE FROM products WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
