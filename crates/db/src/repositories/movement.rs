//! Movement repository for database operations.
//!
//! Implements the movement storage port. Composite writes run inside one transaction;
//! returning early drops the transaction, which rolls back everything written so far.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait, sea_query::Expr,
};

use crate::entities::{
    buys, expenses, inventories, movements, products, sea_orm_active_enums::ExpenseType as DbExpenseType,
    sells, warehouses,
};
use mazerp_core::movement::{
    BuyDetails, ChildKind, ExpenseDetails, FullMovementRecord, FullMovementView,
    InventorySnapshot, Movement, MovementChild, MovementDraft, MovementError, MovementFilter,
    MovementRecord, MovementRepository as MovementRepoTrait, MovementView, SellDetails,
};
use mazerp_shared::types::{InventoryId, MovementId, ProductId, WarehouseId};

/// Movement repository implementation.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Create a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn repo_err(e: DbErr) -> MovementError {
    MovementError::repository(e.to_string())
}

impl MovementRepoTrait for MovementRepository {
    async fn create_with_child(
        &self,
        draft: MovementDraft,
        child: MovementChild,
    ) -> Result<MovementRecord, MovementError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        if !inventory_exists(&txn, draft.inventory_id)
            .await
            .map_err(repo_err)?
        {
            return Err(MovementError::InventoryNotFound(draft.inventory_id));
        }

        let active_model = movements::ActiveModel {
            id: NotSet,
            inventory_id: Set(draft.inventory_id.into_inner()),
            description: Set(draft.description.clone()),
            quantity: Set(draft.quantity),
            movement_date: Set(draft.movement_date.fixed_offset()),
        };
        let id = movements::Entity::insert(active_model)
            .exec(&txn)
            .await
            .map_err(repo_err)?
            .last_insert_id;

        insert_child(&txn, id, child).await.map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;

        Ok(MovementRecord {
            movement: draft.into_movement(MovementId::new(id)),
            child,
        })
    }

    async fn update_with_child(
        &self,
        id: MovementId,
        draft: MovementDraft,
        child: MovementChild,
    ) -> Result<Option<MovementRecord>, MovementError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        if child_kind(&txn, id).await.map_err(repo_err)? != Some(child.kind()) {
            txn.rollback().await.map_err(repo_err)?;
            return Ok(None);
        }
        if !inventory_exists(&txn, draft.inventory_id)
            .await
            .map_err(repo_err)?
        {
            return Err(MovementError::InventoryNotFound(draft.inventory_id));
        }

        update_movement_row(&txn, id, &draft)
            .await
            .map_err(repo_err)?;
        update_child_row(&txn, id, child).await.map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;

        Ok(Some(MovementRecord {
            movement: draft.into_movement(id),
            child,
        }))
    }

    async fn delete_with_child(&self, id: MovementId, kind: ChildKind) -> Result<bool, MovementError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let key = id.into_inner();

        let deleted = match kind {
            ChildKind::Buy => buys::Entity::delete_by_id(key).exec(&txn).await,
            ChildKind::Sell => sells::Entity::delete_by_id(key).exec(&txn).await,
            ChildKind::Expense => expenses::Entity::delete_by_id(key).exec(&txn).await,
        }
        .map_err(repo_err)?
        .rows_affected;

        if deleted == 0 {
            txn.rollback().await.map_err(repo_err)?;
            return Ok(false);
        }

        movements::Entity::delete_by_id(key)
            .exec(&txn)
            .await
            .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;
        Ok(true)
    }

    async fn has_related_records(&self, id: MovementId) -> Result<bool, MovementError> {
        Ok(child_kind(&self.db, id).await.map_err(repo_err)?.is_some())
    }

    async fn update_movement(
        &self,
        id: MovementId,
        draft: MovementDraft,
    ) -> Result<Option<Movement>, MovementError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        // Re-checked here so a child inserted after the service's guard still blocks.
        if child_kind(&txn, id).await.map_err(repo_err)?.is_some() {
            return Err(MovementError::HasRelatedRecords(id));
        }
        if !inventory_exists(&txn, draft.inventory_id)
            .await
            .map_err(repo_err)?
        {
            return Err(MovementError::InventoryNotFound(draft.inventory_id));
        }

        let updated = update_movement_row(&txn, id, &draft)
            .await
            .map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        Ok((updated > 0).then(|| draft.into_movement(id)))
    }

    async fn delete_movement(&self, id: MovementId) -> Result<bool, MovementError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        if child_kind(&txn, id).await.map_err(repo_err)?.is_some() {
            return Err(MovementError::HasRelatedRecords(id));
        }

        let deleted = movements::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await
            .map_err(repo_err)?
            .rows_affected;
        txn.commit().await.map_err(repo_err)?;

        Ok(deleted > 0)
    }

    async fn find_movement(&self, id: MovementId) -> Result<Option<MovementView>, MovementError> {
        let Some(model) = movements::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };

        let mut children = load_children(&self.db, &[model.id])
            .await
            .map_err(repo_err)?;

        Ok(Some(MovementView {
            child: children.remove(&model.id),
            movement: to_domain(model),
        }))
    }

    async fn find_full_movement(
        &self,
        id: MovementId,
    ) -> Result<Option<FullMovementView>, MovementError> {
        let Some(view) = self.find_movement(id).await? else {
            return Ok(None);
        };

        let inventory = snapshot(&self.db, view.movement.inventory_id).await?;
        Ok(Some(FullMovementView { view, inventory }))
    }

    async fn list_movements(
        &self,
        filter: MovementFilter,
    ) -> Result<Vec<MovementView>, MovementError> {
        let models = filtered(None, &filter)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut children = load_children(&self.db, &ids).await.map_err(repo_err)?;

        Ok(models
            .into_iter()
            .map(|model| MovementView {
                child: children.remove(&model.id),
                movement: to_domain(model),
            })
            .collect())
    }

    async fn find_record(
        &self,
        id: MovementId,
        kind: ChildKind,
    ) -> Result<Option<MovementRecord>, MovementError> {
        let Some(child) = find_child(&self.db, id, kind).await.map_err(repo_err)? else {
            return Ok(None);
        };

        let movement = movements::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| MovementError::repository(format!("{kind} {id} has no movement row")))?;

        Ok(Some(MovementRecord {
            movement: to_domain(movement),
            child,
        }))
    }

    async fn find_full_record(
        &self,
        id: MovementId,
        kind: ChildKind,
    ) -> Result<Option<FullMovementRecord>, MovementError> {
        let Some(record) = self.find_record(id, kind).await? else {
            return Ok(None);
        };

        let inventory = snapshot(&self.db, record.movement.inventory_id).await?;
        Ok(Some(FullMovementRecord { record, inventory }))
    }

    async fn list_records(
        &self,
        kind: ChildKind,
        filter: MovementFilter,
    ) -> Result<Vec<MovementRecord>, MovementError> {
        let models = filtered(Some(kind), &filter)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut children = load_children(&self.db, &ids).await.map_err(repo_err)?;

        Ok(models
            .into_iter()
            .filter_map(|model| {
                let child = children.remove(&model.id).filter(|c| c.kind() == kind)?;
                Some(MovementRecord {
                    movement: to_domain(model),
                    child,
                })
            })
            .collect())
    }
}

/// Builds the movement query for a filter, newest first.
fn filtered(kind: Option<ChildKind>, filter: &MovementFilter) -> Select<movements::Entity> {
    let mut query = movements::Entity::find();

    match kind {
        Some(ChildKind::Buy) => {
            query = query.join(JoinType::InnerJoin, movements::Relation::Buys.def());
        }
        Some(ChildKind::Sell) => {
            query = query.join(JoinType::InnerJoin, movements::Relation::Sells.def());
        }
        Some(ChildKind::Expense) | None => {}
    }

    if kind == Some(ChildKind::Expense) || filter.expense_type.is_some() {
        query = query.join(JoinType::InnerJoin, movements::Relation::Expenses.def());
    }
    if let Some(expense_type) = filter.expense_type {
        query = query.filter(expenses::Column::ExpenseType.eq(DbExpenseType::from(expense_type)));
    }
    if let Some(product_id) = filter.product_id {
        query = query
            .join(JoinType::InnerJoin, movements::Relation::Inventories.def())
            .filter(inventories::Column::ProductId.eq(product_id.into_inner()));
    }
    if let Some(range) = filter.date_range {
        query = query.filter(
            movements::Column::MovementDate
                .between(range.start().fixed_offset(), range.end().fixed_offset()),
        );
    }

    query
        .order_by_desc(movements::Column::MovementDate)
        .order_by_desc(movements::Column::Id)
}

async fn inventory_exists<C: ConnectionTrait>(conn: &C, id: InventoryId) -> Result<bool, DbErr> {
    let count = inventories::Entity::find_by_id(id.into_inner())
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// The integrity guard: which child table, if any, references the movement.
async fn child_kind<C: ConnectionTrait>(conn: &C, id: MovementId) -> Result<Option<ChildKind>, DbErr> {
    let key = id.into_inner();
    if buys::Entity::find_by_id(key).count(conn).await? > 0 {
        return Ok(Some(ChildKind::Buy));
    }
    if sells::Entity::find_by_id(key).count(conn).await? > 0 {
        return Ok(Some(ChildKind::Sell));
    }
    if expenses::Entity::find_by_id(key).count(conn).await? > 0 {
        return Ok(Some(ChildKind::Expense));
    }
    Ok(None)
}

async fn insert_child<C: ConnectionTrait>(conn: &C, id: i32, child: MovementChild) -> Result<(), DbErr> {
    match child {
        MovementChild::Buy(buy) => {
            buys::Entity::insert(buys::ActiveModel {
                movement_id: Set(id),
                unit_price: Set(buy.unit_price),
            })
            .exec_without_returning(conn)
            .await?;
        }
        MovementChild::Sell(sell) => {
            sells::Entity::insert(sells::ActiveModel {
                movement_id: Set(id),
                sale_price: Set(sell.sale_price),
                discount_percentage: Set(sell.discount_percentage),
            })
            .exec_without_returning(conn)
            .await?;
        }
        MovementChild::Expense(expense) => {
            expenses::Entity::insert(expenses::ActiveModel {
                movement_id: Set(id),
                expense_type: Set(expense.expense_type.into()),
                total_price: Set(expense.total_price),
            })
            .exec_without_returning(conn)
            .await?;
        }
    }
    Ok(())
}

async fn update_movement_row<C: ConnectionTrait>(
    conn: &C,
    id: MovementId,
    draft: &MovementDraft,
) -> Result<u64, DbErr> {
    let result = movements::Entity::update_many()
        .col_expr(
            movements::Column::InventoryId,
            Expr::value(draft.inventory_id.into_inner()),
        )
        .col_expr(
            movements::Column::Description,
            Expr::value(draft.description.clone()),
        )
        .col_expr(movements::Column::Quantity, Expr::value(draft.quantity))
        .col_expr(
            movements::Column::MovementDate,
            Expr::value(draft.movement_date.fixed_offset()),
        )
        .filter(movements::Column::Id.eq(id.into_inner()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

async fn update_child_row<C: ConnectionTrait>(
    conn: &C,
    id: MovementId,
    child: MovementChild,
) -> Result<u64, DbErr> {
    let key = id.into_inner();
    let result = match child {
        MovementChild::Buy(buy) => {
            buys::Entity::update_many()
                .col_expr(buys::Column::UnitPrice, Expr::value(buy.unit_price))
                .filter(buys::Column::MovementId.eq(key))
                .exec(conn)
                .await?
        }
        MovementChild::Sell(sell) => {
            sells::Entity::update_many()
                .col_expr(sells::Column::SalePrice, Expr::value(sell.sale_price))
                .col_expr(
                    sells::Column::DiscountPercentage,
                    Expr::value(sell.discount_percentage),
                )
                .filter(sells::Column::MovementId.eq(key))
                .exec(conn)
                .await?
        }
        MovementChild::Expense(expense) => {
            expenses::Entity::update_many()
                .col_expr(
                    expenses::Column::ExpenseType,
                    Expr::value(DbExpenseType::from(expense.expense_type)),
                )
                .col_expr(expenses::Column::TotalPrice, Expr::value(expense.total_price))
                .filter(expenses::Column::MovementId.eq(key))
                .exec(conn)
                .await?
        }
    };
    Ok(result.rows_affected)
}

async fn find_child<C: ConnectionTrait>(
    conn: &C,
    id: MovementId,
    kind: ChildKind,
) -> Result<Option<MovementChild>, DbErr> {
    let key = id.into_inner();
    Ok(match kind {
        ChildKind::Buy => buys::Entity::find_by_id(key).one(conn).await?.map(buy_to_domain),
        ChildKind::Sell => sells::Entity::find_by_id(key).one(conn).await?.map(sell_to_domain),
        ChildKind::Expense => expenses::Entity::find_by_id(key)
            .one(conn)
            .await?
            .map(expense_to_domain),
    })
}

/// Loads whichever child owns each movement.
async fn load_children<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<HashMap<i32, MovementChild>, DbErr> {
    let mut children = HashMap::with_capacity(ids.len());
    if ids.is_empty() {
        return Ok(children);
    }

    for buy in buys::Entity::find()
        .filter(buys::Column::MovementId.is_in(ids.iter().copied()))
        .all(conn)
        .await?
    {
        children.insert(buy.movement_id, buy_to_domain(buy));
    }
    for sell in sells::Entity::find()
        .filter(sells::Column::MovementId.is_in(ids.iter().copied()))
        .all(conn)
        .await?
    {
        children.insert(sell.movement_id, sell_to_domain(sell));
    }
    for expense in expenses::Entity::find()
        .filter(expenses::Column::MovementId.is_in(ids.iter().copied()))
        .all(conn)
        .await?
    {
        children.insert(expense.movement_id, expense_to_domain(expense));
    }

    Ok(children)
}

async fn snapshot<C: ConnectionTrait>(
    conn: &C,
    inventory_id: InventoryId,
) -> Result<InventorySnapshot, MovementError> {
    let dangling = || MovementError::repository(format!("inventory {inventory_id} is incomplete"));

    let (inventory, product) = inventories::Entity::find_by_id(inventory_id.into_inner())
        .find_also_related(products::Entity)
        .one(conn)
        .await
        .map_err(repo_err)?
        .ok_or_else(dangling)?;
    let product = product.ok_or_else(dangling)?;
    let warehouse = warehouses::Entity::find_by_id(inventory.warehouse_id)
        .one(conn)
        .await
        .map_err(repo_err)?
        .ok_or_else(dangling)?;

    Ok(InventorySnapshot {
        inventory_id,
        stock: inventory.stock,
        product_id: ProductId::new(product.id),
        product_name: product.name,
        warehouse_id: WarehouseId::new(warehouse.client_id),
        warehouse_name: warehouse.name,
    })
}

fn to_domain(model: movements::Model) -> Movement {
    Movement {
        id: MovementId::new(model.id),
        inventory_id: InventoryId::new(model.inventory_id),
        description: model.description,
        quantity: model.quantity,
        movement_date: model.movement_date.with_timezone(&Utc),
    }
}

#[allow(clippy::needless_pass_by_value)]
fn buy_to_domain(model: buys::Model) -> MovementChild {
    MovementChild::Buy(BuyDetails {
        unit_price: model.unit_price,
    })
}

#[allow(clippy::needless_pass_by_value)]
fn sell_to_domain(model: sells::Model) -> MovementChild {
    MovementChild::Sell(SellDetails {
        sale_price: model.sale_price,
        discount_percentage: model.discount_percentage,
    })
}

#[allow(clippy::needless_pass_by_value)]
fn expense_to_domain(model: expenses::Model) -> MovementChild {
    MovementChild::Expense(ExpenseDetails {
        expense_type: model.expense_type.into(),
        total_price: model.total_price,
    })
}
