//! Entity lookups against the MySQL schema:
//!
//! ```sql
//! buyers      (id BIGINT UNSIGNED PK, name, email, password)
//! influencers (id BIGINT UNSIGNED PK, name, email, password, handle NULL)
//! admins      (id BIGINT UNSIGNED PK, name, email, password)
//! ```

use async_trait::async_trait;
use sqlx::{MySql, Pool};

use crate::error::Error;
use crate::model::{Admin, Buyer, Influencer};

/// Read access to password-bearing entities. `Ok(None)` means the row does not exist.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn find_buyer(&self, id: u64) -> Result<Option<Buyer>, Error>;

    async fn find_influencer(&self, id: u64) -> Result<Option<Influencer>, Error>;

    async fn find_admin(&self, id: u64) -> Result<Option<Admin>, Error>;
}

pub struct MySqlStore {
    db: Pool<MySql>,
}

impl MySqlStore {
    pub fn new(db: Pool<MySql>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityStore for MySqlStore {
    async fn find_buyer(&self, id: u64) -> Result<Option<Buyer>, Error> {
        let buyer = sqlx::query_as::<_, Buyer>(
            r#"SELECT id, name, email, password FROM buyers WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(buyer)
    }

    async fn find_influencer(&self, id: u64) -> Result<Option<Influencer>, Error> {
        let influencer = sqlx::query_as::<_, Influencer>(
            r#"SELECT id, name, email, password, handle FROM influencers WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(influencer)
    }

    async fn find_admin(&self, id: u64) -> Result<Option<Admin>, Error> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"SELECT id, name, email, password FROM admins WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(admin)
    }
}

/// Session ids are strings; table keys are unsigned integers.
pub fn parse_id(id: &str) -> Result<u64, Error> {
    id.parse::<u64>()
        .map_err(|e| Error::ParseError(format!("entity id {:?}: {}", id, e)))
}
