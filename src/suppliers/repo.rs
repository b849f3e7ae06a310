use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewSupplier, Supplier, SupplierChanges};
use crate::error::AppError;

#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn insert(&self, supplier: NewSupplier) -> Result<Supplier, AppError>;
    async fn list(&self) -> Result<Vec<Supplier>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Supplier>, AppError>;
    async fn update(&self, id: Uuid, changes: SupplierChanges)
        -> Result<Option<Supplier>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgSupplierRepo {
    db: PgPool,
}

impl PgSupplierRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SupplierRepository for PgSupplierRepo {
    async fn insert(&self, supplier: NewSupplier) -> Result<Supplier, AppError> {
        let row = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (id, name, contact, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, contact, email, phone
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Supplier>, AppError> {
        let rows = sqlx::query_as::<_, Supplier>(
            r#"SELECT id, name, contact, email, phone FROM suppliers ORDER BY name"#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        let row = sqlx::query_as::<_, Supplier>(
            r#"SELECT id, name, contact, email, phone FROM suppliers WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: SupplierChanges,
    ) -> Result<Option<Supplier>, AppError> {
        let row = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
               SET name    = COALESCE($2, name),
                   contact = COALESCE($3, contact),
                   email   = COALESCE($4, email),
                   phone   = COALESCE($5, phone)
             WHERE id = $1
            RETURNING id, name, contact, email, phone
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.contact)
        .bind(changes.email)
        .bind(changes.phone)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query(r#"DELETE FROM suppliers WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
