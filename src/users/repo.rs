use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, User, UserChanges};
use crate::error::AppError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError>;
    /// Returns `None` when no row has `id`.
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;
    /// Returns `false` when no row has `id`.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepo {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, login, password, profile)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, login, password, profile
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.password)
        .bind(&user.profile)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, login, password, profile FROM users ORDER BY name"#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, login, password, profile FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, login, password, profile FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, login, password, profile FROM users WHERE login = $1"#,
        )
        .bind(login)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name     = COALESCE($2, name),
                   email    = COALESCE($3, email),
                   login    = COALESCE($4, login),
                   password = COALESCE($5, password),
                   profile  = COALESCE($6, profile)
             WHERE id = $1
            RETURNING id, name, email, login, password, profile
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.login)
        .bind(changes.password)
        .bind(changes.profile)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
