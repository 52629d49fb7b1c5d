//! Product repository for database operations.

use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};

use crate::entities::{inventories, products};
use mazerp_core::catalog::{CatalogError, Product, ProductInput, validate_product};
use mazerp_shared::types::ProductId;

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

#[allow(clippy::needless_pass_by_value)]
pub(crate) fn repo_err(e: DbErr) -> CatalogError {
    CatalogError::repository(e.to_string())
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all products by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let models = products::Entity::find()
            .order_by_asc(products::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    /// Finds a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let model = products::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.map(to_domain))
    }

    /// Validates and stores a new product.
    ///
    /// # Errors
    ///
    /// `Invalid` on bad input, `Repository` if the insert fails.
    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let input = validate_product(input)?;
        let id = products::Entity::insert(products::ActiveModel {
            id: NotSet,
            name: Set(input.name.clone()),
            sell_price: Set(input.sell_price),
        })
        .exec(&self.db)
        .await
        .map_err(repo_err)?
        .last_insert_id;

        Ok(Product {
            id: ProductId::new(id),
            name: input.name,
            sell_price: input.sell_price,
        })
    }

    /// Replaces a product's fields.
    ///
    /// # Errors
    ///
    /// `Invalid` on bad input, `NotFound` if the product does not exist.
    pub async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, CatalogError> {
        let input = validate_product(input)?;
        let updated = products::Entity::update_many()
            .col_expr(products::Column::Name, Expr::value(input.name.clone()))
            .col_expr(products::Column::SellPrice, Expr::value(input.sell_price))
            .filter(products::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(repo_err)?
            .rows_affected;

        if updated == 0 {
            return Err(CatalogError::not_found("product", id.into_inner()));
        }
        Ok(Product {
            id,
            name: input.name,
            sell_price: input.sell_price,
        })
    }

    /// Deletes a product that no inventory line references.
    ///
    /// # Errors
    ///
    /// `InUse` while referenced, `NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let references = inventories::Entity::find()
            .filter(inventories::Column::ProductId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        if references > 0 {
            return Err(CatalogError::InUse(format!(
                "product {id} is stocked by {references} inventory line(s)"
            )));
        }

        let deleted = products::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(repo_err)?
            .rows_affected;
        if deleted == 0 {
            return Err(CatalogError::not_found("product", id.into_inner()));
        }
        Ok(())
    }
}

fn to_domain(model: products::Model) -> Product {
    Product {
        id: ProductId::new(model.id),
        name: model.name,
        sell_price: model.sell_price,
    }
}
