//! Account repository for users and clients.
//!
//! Both account tables share the same shape, so one repository serves either,
//! chosen by [`AccountKind`] at construction.

use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::{clients, users};
use mazerp_shared::AccountKind;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Row id.
    pub id: i32,
    /// Unique login name.
    pub name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Which table the account lives in.
    pub kind: AccountKind,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    kind: AccountKind,
}

impl AccountRepository {
    /// Creates a repository over the given account table.
    #[must_use]
    pub const fn new(db: DatabaseConnection, kind: AccountKind) -> Self {
        Self { db, kind }
    }

    /// Repository over the `users` table.
    #[must_use]
    pub const fn users(db: DatabaseConnection) -> Self {
        Self::new(db, AccountKind::User)
    }

    /// Repository over the `clients` table.
    #[must_use]
    pub const fn clients(db: DatabaseConnection) -> Self {
        Self::new(db, AccountKind::Client)
    }

    /// The account table this repository serves.
    #[must_use]
    pub const fn kind(&self) -> AccountKind {
        self.kind
    }

    /// Finds an account by its exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Account>, DbErr> {
        let found = match self.kind {
            AccountKind::User => users::Entity::find()
                .filter(users::Column::Name.eq(name))
                .one(&self.db)
                .await?
                .map(|m| (m.id, m.name, m.password_hash)),
            AccountKind::Client => clients::Entity::find()
                .filter(clients::Column::Name.eq(name))
                .one(&self.db)
                .await?
                .map(|m| (m.id, m.name, m.password_hash)),
        };

        Ok(found.map(|(id, name, password_hash)| Account {
            id,
            name,
            password_hash,
            kind: self.kind,
        }))
    }

    /// Returns true if the name is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn name_exists(&self, name: &str) -> Result<bool, DbErr> {
        let count = match self.kind {
            AccountKind::User => {
                users::Entity::find()
                    .filter(users::Column::Name.eq(name))
                    .count(&self.db)
                    .await?
            }
            AccountKind::Client => {
                clients::Entity::find()
                    .filter(clients::Column::Name.eq(name))
                    .count(&self.db)
                    .await?
            }
        };
        Ok(count > 0)
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including on a duplicate name.
    pub async fn create(&self, name: &str, password_hash: &str) -> Result<Account, DbErr> {
        let id = match self.kind {
            AccountKind::User => {
                users::Entity::insert(users::ActiveModel {
                    id: NotSet,
                    name: Set(name.to_string()),
                    password_hash: Set(password_hash.to_string()),
                })
                .exec(&self.db)
                .await?
                .last_insert_id
            }
            AccountKind::Client => {
                clients::Entity::insert(clients::ActiveModel {
                    id: NotSet,
                    name: Set(name.to_string()),
                    password_hash: Set(password_hash.to_string()),
                })
                .exec(&self.db)
                .await?
                .last_insert_id
            }
        };

        Ok(Account {
            id,
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            kind: self.kind,
        })
    }
}
