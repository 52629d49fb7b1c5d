//! Inventory repository for database operations.

use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};

use super::product::repo_err;
use crate::entities::{inventories, movements, products, warehouses};
use mazerp_core::catalog::{CatalogError, Inventory, InventoryInput, validate_inventory};
use mazerp_shared::types::{InventoryId, ProductId, WarehouseId};

/// Inventory repository.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists inventory lines, optionally for one warehouse.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, warehouse_id: Option<WarehouseId>) -> Result<Vec<Inventory>, CatalogError> {
        let mut query = inventories::Entity::find();
        if let Some(warehouse_id) = warehouse_id {
            query = query.filter(inventories::Column::WarehouseId.eq(warehouse_id.into_inner()));
        }

        let models = query
            .order_by_asc(inventories::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    /// Finds an inventory line.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: InventoryId) -> Result<Option<Inventory>, CatalogError> {
        let model = inventories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.map(to_domain))
    }

    /// Creates an inventory line.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown warehouse or product, `Duplicate` if the pair
    /// already has a line.
    pub async fn create(&self, input: InventoryInput) -> Result<Inventory, CatalogError> {
        validate_inventory(&input)?;
        self.check_references(&input, None).await?;

        let id = inventories::Entity::insert(inventories::ActiveModel {
            id: NotSet,
            warehouse_id: Set(input.warehouse_id.into_inner()),
            product_id: Set(input.product_id.into_inner()),
            stock: Set(input.stock),
            alert_stock: Set(input.alert_stock),
            warning_stock: Set(input.warning_stock),
        })
        .exec(&self.db)
        .await
        .map_err(repo_err)?
        .last_insert_id;

        Ok(from_input(InventoryId::new(id), input))
    }

    /// Replaces an inventory line's fields.
    ///
    /// # Errors
    ///
    /// As [`Self::create`], plus `NotFound` if the line does not exist.
    pub async fn update(
        &self,
        id: InventoryId,
        input: InventoryInput,
    ) -> Result<Inventory, CatalogError> {
        validate_inventory(&input)?;
        self.check_references(&input, Some(id)).await?;

        let updated = inventories::Entity::update_many()
            .col_expr(
                inventories::Column::WarehouseId,
                Expr::value(input.warehouse_id.into_inner()),
            )
            .col_expr(
                inventories::Column::ProductId,
                Expr::value(input.product_id.into_inner()),
            )
            .col_expr(inventories::Column::Stock, Expr::value(input.stock))
            .col_expr(inventories::Column::AlertStock, Expr::value(input.alert_stock))
            .col_expr(
                inventories::Column::WarningStock,
                Expr::value(input.warning_stock),
            )
            .filter(inventories::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(repo_err)?
            .rows_affected;

        if updated == 0 {
            return Err(CatalogError::not_found("inventory", id.into_inner()));
        }
        Ok(from_input(id, input))
    }

    /// Deletes an inventory line no movement references.
    ///
    /// # Errors
    ///
    /// `InUse` while movements reference it, `NotFound` if it does not exist.
    pub async fn delete(&self, id: InventoryId) -> Result<(), CatalogError> {
        let key = id.into_inner();
        let references = movements::Entity::find()
            .filter(movements::Column::InventoryId.eq(key))
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        if references > 0 {
            return Err(CatalogError::InUse(format!(
                "inventory {id} is referenced by {references} movement(s)"
            )));
        }

        let deleted = inventories::Entity::delete_by_id(key)
            .exec(&self.db)
            .await
            .map_err(repo_err)?
            .rows_affected;
        if deleted == 0 {
            return Err(CatalogError::not_found("inventory", key));
        }
        Ok(())
    }

    async fn check_references(
        &self,
        input: &InventoryInput,
        current: Option<InventoryId>,
    ) -> Result<(), CatalogError> {
        let warehouse_id = input.warehouse_id.into_inner();
        let product_id = input.product_id.into_inner();

        let warehouses = warehouses::Entity::find_by_id(warehouse_id)
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        if warehouses == 0 {
            return Err(CatalogError::not_found("warehouse", warehouse_id));
        }
        let products = products::Entity::find_by_id(product_id)
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        if products == 0 {
            return Err(CatalogError::not_found("product", product_id));
        }

        let mut same_pair = inventories::Entity::find()
            .filter(inventories::Column::WarehouseId.eq(warehouse_id))
            .filter(inventories::Column::ProductId.eq(product_id));
        if let Some(current) = current {
            same_pair = same_pair.filter(inventories::Column::Id.ne(current.into_inner()));
        }
        if same_pair.count(&self.db).await.map_err(repo_err)? > 0 {
            return Err(CatalogError::Duplicate(format!(
                "warehouse {warehouse_id} already stocks product {product_id}"
            )));
        }
        Ok(())
    }
}

fn from_input(id: InventoryId, input: InventoryInput) -> Inventory {
    Inventory {
        id,
        warehouse_id: input.warehouse_id,
        product_id: input.product_id,
        stock: input.stock,
        alert_stock: input.alert_stock,
        warning_stock: input.warning_stock,
    }
}

fn to_domain(model: inventories::Model) -> Inventory {
    Inventory {
        id: InventoryId::new(model.id),
        warehouse_id: WarehouseId::new(model.warehouse_id),
        product_id: ProductId::new(model.product_id),
        stock: model.stock,
        alert_stock: model.alert_stock,
        warning_stock: model.warning_stock,
    }
}
