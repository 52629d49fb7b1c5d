//! Warehouse repository. Warehouses are keyed by their owning client.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use super::product::repo_err;
use crate::entities::{clients, inventories, warehouses};
use mazerp_core::catalog::{CatalogError, Warehouse, WarehouseInput, validate_warehouse};
use mazerp_shared::types::ClientId;

/// Warehouse repository.
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    db: DatabaseConnection,
}

impl WarehouseRepository {
    /// Create a new warehouse repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all warehouses.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<Warehouse>, CatalogError> {
        let models = warehouses::Entity::find()
            .order_by_asc(warehouses::Column::ClientId)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    /// Finds the warehouse owned by a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_client(&self, client_id: ClientId) -> Result<Option<Warehouse>, CatalogError> {
        let model = warehouses::Entity::find_by_id(client_id.into_inner())
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.map(to_domain))
    }

    /// Creates the warehouse for a client.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown client, `Duplicate` if the client already has one.
    pub async fn create(
        &self,
        client_id: ClientId,
        input: WarehouseInput,
    ) -> Result<Warehouse, CatalogError> {
        let input = validate_warehouse(input)?;
        let key = client_id.into_inner();

        let clients = clients::Entity::find_by_id(key)
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        if clients == 0 {
            return Err(CatalogError::not_found("client", key));
        }
        if self.find_by_client(client_id).await?.is_some() {
            return Err(CatalogError::Duplicate(format!(
                "client {client_id} already has a warehouse"
            )));
        }

        warehouses::Entity::insert(warehouses::ActiveModel {
            client_id: Set(key),
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
        })
        .exec_without_returning(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(Warehouse {
            client_id,
            name: input.name,
            description: input.description,
        })
    }

    /// Replaces a warehouse's fields.
    ///
    /// # Errors
    ///
    /// `Invalid` on bad input, `NotFound` if the warehouse does not exist.
    pub async fn update(
        &self,
        client_id: ClientId,
        input: WarehouseInput,
    ) -> Result<Warehouse, CatalogError> {
        let input = validate_warehouse(input)?;
        let updated = warehouses::Entity::update_many()
            .col_expr(warehouses::Column::Name, Expr::value(input.name.clone()))
            .col_expr(
                warehouses::Column::Description,
                Expr::value(input.description.clone()),
            )
            .filter(warehouses::Column::ClientId.eq(client_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(repo_err)?
            .rows_affected;

        if updated == 0 {
            return Err(CatalogError::not_found("warehouse", client_id.into_inner()));
        }
        Ok(Warehouse {
            client_id,
            name: input.name,
            description: input.description,
        })
    }

    /// Deletes a warehouse with no inventory lines.
    ///
    /// # Errors
    ///
    /// `InUse` while inventory lines remain, `NotFound` if it does not exist.
    pub async fn delete(&self, client_id: ClientId) -> Result<(), CatalogError> {
        let key = client_id.into_inner();
        let lines = inventories::Entity::find()
            .filter(inventories::Column::WarehouseId.eq(key))
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        if lines > 0 {
            return Err(CatalogError::InUse(format!(
                "warehouse {client_id} still holds {lines} inventory line(s)"
            )));
        }

        let deleted = warehouses::Entity::delete_by_id(key)
            .exec(&self.db)
            .await
            .map_err(repo_err)?
            .rows_affected;
        if deleted == 0 {
            return Err(CatalogError::not_found("warehouse", key));
        }
        Ok(())
    }
}

fn to_domain(model: warehouses::Model) -> Warehouse {
    Warehouse {
        client_id: ClientId::new(model.client_id),
        name: model.name,
        description: model.description,
    }
}
