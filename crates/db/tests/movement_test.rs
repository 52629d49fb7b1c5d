//! Integration tests for the movement repository against SQLite.

mod common;

use std::sync::Arc;

use chrono::Utc;
use common::{Fixture, jan, setup_fixture};
use mazerp_core::movement::{
    BuyDetails, ChildKind, ExpenseDetails, ExpenseType, MovementChild, MovementDraft,
    MovementError, MovementFilter, MovementRepository as _, MovementService, SellDetails,
};
use mazerp_db::MovementRepository;
use mazerp_db::entities::{buys, movements};
use mazerp_shared::types::{InventoryId, MovementId};
use rust_decimal_macros::dec;
use sea_orm::{ActiveValue::NotSet, EntityTrait, PaginatorTrait, Set};

fn service(fx: &Fixture) -> MovementService<MovementRepository> {
    MovementService::new(Arc::new(MovementRepository::new(fx.db.clone())))
}

fn draft(inventory_id: InventoryId, quantity: i32, day: u32) -> MovementDraft {
    MovementDraft {
        inventory_id,
        description: Some(format!("movement on day {day}")),
        quantity,
        movement_date: jan(day),
    }
}

fn buy(unit_price: rust_decimal::Decimal) -> MovementChild {
    MovementChild::Buy(BuyDetails { unit_price })
}

async fn count_movements(fx: &Fixture) -> u64 {
    movements::Entity::find().count(&fx.db).await.unwrap()
}

#[tokio::test]
async fn test_create_buy_persists_both_rows() {
    let fx = setup_fixture().await;
    let svc = service(&fx);

    let record = svc
        .create(draft(fx.inventory.id, 10, 5), buy(dec!(50)))
        .await
        .expect("Failed to create buy");

    assert_eq!(record.kind(), ChildKind::Buy);
    assert_eq!(record.movement.quantity, 10);

    let found = svc.get(record.movement_id(), ChildKind::Buy).await.unwrap();
    assert_eq!(found.movement.movement_date, jan(5));
    assert_eq!(found.movement.inventory_id, fx.inventory.id);
    match found.child {
        MovementChild::Buy(details) => assert_eq!(details.unit_price, dec!(50)),
        other => panic!("expected a buy, got {other:?}"),
    }

    let view = svc.get_movement(record.movement_id()).await.unwrap();
    assert_eq!(view.child.map(|c| c.kind()), Some(ChildKind::Buy));
}

#[tokio::test]
async fn test_invalid_sell_writes_nothing() {
    let fx = setup_fixture().await;
    let svc = service(&fx);

    let result = svc
        .create(
            draft(fx.inventory.id, -1, 5),
            MovementChild::Sell(SellDetails {
                sale_price: dec!(30),
                discount_percentage: dec!(150),
            }),
        )
        .await;

    assert!(matches!(result, Err(MovementError::DiscountOutOfRange(_))));
    assert_eq!(count_movements(&fx).await, 0);
}

#[tokio::test]
async fn test_unknown_inventory_rolls_back() {
    let fx = setup_fixture().await;
    let svc = service(&fx);

    let result = svc
        .create(draft(InventoryId::new(999), 1, 5), buy(dec!(10)))
        .await;

    assert!(matches!(result, Err(MovementError::InventoryNotFound(_))));
    assert_eq!(count_movements(&fx).await, 0);
}

#[tokio::test]
async fn test_failed_child_insert_rolls_back_movement() {
    let fx = setup_fixture().await;
    let repo = MovementRepository::new(fx.db.clone());

    // Skips service validation so the buy CHECK fails after the movement row is written.
    let result = repo
        .create_with_child(draft(fx.inventory.id, 3, 5), buy(dec!(0)))
        .await;

    assert!(matches!(result, Err(MovementError::Repository(_))));
    assert_eq!(count_movements(&fx).await, 0);
    assert_eq!(buys::Entity::find().count(&fx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_buy_cascades_movement_fields() {
    let fx = setup_fixture().await;
    let svc = service(&fx);
    let created = svc
        .create(draft(fx.inventory.id, 10, 5), buy(dec!(50)))
        .await
        .unwrap();
    let id = created.movement_id();

    let mut changed = draft(fx.other_inventory.id, 4, 7);
    changed.description = None;
    svc.update(id, changed, buy(dec!(42.5))).await.unwrap();

    let found = svc.get(id, ChildKind::Buy).await.unwrap();
    assert_eq!(found.movement.quantity, 4);
    assert_eq!(found.movement.inventory_id, fx.other_inventory.id);
    assert_eq!(found.movement.movement_date, jan(7));
    assert_eq!(found.movement.description, None);
    match found.child {
        MovementChild::Buy(details) => assert_eq!(details.unit_price, dec!(42.5)),
        other => panic!("expected a buy, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_with_wrong_kind_is_not_found() {
    let fx = setup_fixture().await;
    let svc = service(&fx);
    let created = svc
        .create(draft(fx.inventory.id, 10, 5), buy(dec!(50)))
        .await
        .unwrap();

    let result = svc
        .update(
            created.movement_id(),
            draft(fx.inventory.id, 1, 5),
            MovementChild::Sell(SellDetails {
                sale_price: dec!(10),
                discount_percentage: dec!(0),
            }),
        )
        .await;

    assert!(matches!(
        result,
        Err(MovementError::ChildNotFound {
            kind: ChildKind::Sell,
            ..
        })
    ));
}

#[tokio::test]
async fn test_delete_buy_removes_movement() {
    let fx = setup_fixture().await;
    let svc = service(&fx);
    let created = svc
        .create(draft(fx.inventory.id, 10, 5), buy(dec!(50)))
        .await
        .unwrap();
    let id = created.movement_id();

    svc.delete(id, ChildKind::Buy).await.unwrap();

    assert!(matches!(
        svc.get(id, ChildKind::Buy).await,
        Err(MovementError::ChildNotFound { .. })
    ));
    assert!(matches!(
        svc.get_movement(id).await,
        Err(MovementError::NotFound(_))
    ));
    assert!(matches!(
        svc.delete(id, ChildKind::Buy).await,
        Err(MovementError::ChildNotFound { .. })
    ));
}

#[tokio::test]
async fn test_guard_blocks_direct_delete_and_update() {
    let fx = setup_fixture().await;
    let svc = service(&fx);
    let created = svc
        .create(
            draft(fx.inventory.id, 1, 5),
            MovementChild::Expense(ExpenseDetails {
                expense_type: ExpenseType::Transport,
                total_price: dec!(120),
            }),
        )
        .await
        .unwrap();
    let id = created.movement_id();

    assert!(svc.has_related_records(id).await.unwrap());
    assert!(matches!(
        svc.delete_movement(id).await,
        Err(MovementError::HasRelatedRecords(_))
    ));
    assert!(matches!(
        svc.update_movement(id, draft(fx.inventory.id, 99, 9)).await,
        Err(MovementError::HasRelatedRecords(_))
    ));

    let view = svc.get_movement(id).await.unwrap();
    assert_eq!(view.movement.quantity, 1);
    assert_eq!(view.child.map(|c| c.kind()), Some(ChildKind::Expense));
}

#[tokio::test]
async fn test_repository_guard_rechecks_inside_transaction() {
    let fx = setup_fixture().await;
    let repo = MovementRepository::new(fx.db.clone());
    let created = service(&fx)
        .create(draft(fx.inventory.id, 1, 5), buy(dec!(5)))
        .await
        .unwrap();

    let result = repo.delete_movement(created.movement_id()).await;
    assert!(matches!(result, Err(MovementError::HasRelatedRecords(_))));
    assert_eq!(count_movements(&fx).await, 1);
}

#[tokio::test]
async fn test_bare_movement_can_be_updated_and_deleted() {
    let fx = setup_fixture().await;
    let svc = service(&fx);
    let id = movements::Entity::insert(movements::ActiveModel {
        id: NotSet,
        inventory_id: Set(fx.inventory.id.into_inner()),
        description: Set(None),
        quantity: Set(2),
        movement_date: Set(jan(3).fixed_offset()),
    })
    .exec(&fx.db)
    .await
    .unwrap()
    .last_insert_id;
    let id = MovementId::new(id);

    assert!(!svc.has_related_records(id).await.unwrap());
    let updated = svc
        .update_movement(id, draft(fx.inventory.id, 6, 4))
        .await
        .unwrap();
    assert_eq!(updated.quantity, 6);

    let view = svc.get_movement(id).await.unwrap();
    assert_eq!(view.movement.quantity, 6);
    assert!(view.child.is_none());

    svc.delete_movement(id).await.unwrap();
    assert!(matches!(
        svc.delete_movement(id).await,
        Err(MovementError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_listing_filters() {
    let fx = setup_fixture().await;
    let svc = service(&fx);

    svc.create(draft(fx.inventory.id, 10, 2), buy(dec!(50)))
        .await
        .unwrap();
    svc.create(draft(fx.other_inventory.id, 3, 6), buy(dec!(8)))
        .await
        .unwrap();
    svc.create(
        draft(fx.inventory.id, -2, 4),
        MovementChild::Sell(SellDetails {
            sale_price: dec!(70),
            discount_percentage: dec!(10),
        }),
    )
    .await
    .unwrap();
    svc.create(
        draft(fx.inventory.id, 1, 8),
        MovementChild::Expense(ExpenseDetails {
            expense_type: ExpenseType::Rent,
            total_price: dec!(300),
        }),
    )
    .await
    .unwrap();

    let buys = svc.list(ChildKind::Buy, MovementFilter::default()).await.unwrap();
    assert_eq!(buys.len(), 2);
    // Newest first.
    assert_eq!(buys[0].movement.movement_date, jan(6));

    let yerba_buys = svc
        .list_by_product(ChildKind::Buy, fx.inventory.product_id)
        .await
        .unwrap();
    assert_eq!(yerba_buys.len(), 1);
    assert_eq!(yerba_buys[0].movement.quantity, 10);

    let early = svc
        .list_movements_by_date_range(jan(2), jan(4))
        .await
        .unwrap();
    assert_eq!(early.len(), 2);

    let rent = svc.list_expenses_by_type(ExpenseType::Rent).await.unwrap();
    assert_eq!(rent.len(), 1);
    assert!(svc
        .list_expenses_by_type(ExpenseType::Salary)
        .await
        .unwrap()
        .is_empty());

    let all = svc.list_movements(MovementFilter::default()).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|v| v.child.is_some()));

    assert!(matches!(
        svc.list_by_date_range(ChildKind::Sell, jan(9), jan(1)).await,
        Err(MovementError::InvalidDateRange { .. })
    ));
}

#[tokio::test]
async fn test_full_view_includes_inventory_snapshot() {
    let fx = setup_fixture().await;
    let svc = service(&fx);
    let created = svc
        .create(
            MovementDraft {
                inventory_id: fx.inventory.id,
                description: None,
                quantity: 1,
                movement_date: Utc::now(),
            },
            buy(dec!(50)),
        )
        .await
        .unwrap();

    let full = svc
        .get_full(created.movement_id(), ChildKind::Buy)
        .await
        .unwrap();
    assert_eq!(full.inventory.inventory_id, fx.inventory.id);
    assert_eq!(full.inventory.product_name, "Yerba");
    assert_eq!(full.inventory.warehouse_name, "Central");
    assert_eq!(full.inventory.warehouse_id.into_inner(), fx.client_id.into_inner());
    assert_eq!(full.inventory.stock, 10);

    let full_view = svc
        .get_full_movement(created.movement_id())
        .await
        .unwrap();
    assert_eq!(full_view.inventory.product_id, fx.inventory.product_id);
}

#[tokio::test]
async fn test_delete_buy_leaves_other_rows() {
    let fx = setup_fixture().await;
    let svc = service(&fx);
    let first = svc
        .create(draft(fx.inventory.id, 1, 1), buy(dec!(1)))
        .await
        .unwrap();
    svc.create(draft(fx.inventory.id, 2, 2), buy(dec!(2)))
        .await
        .unwrap();

    svc.delete(first.movement_id(), ChildKind::Buy).await.unwrap();

    assert_eq!(count_movements(&fx).await, 1);
    assert_eq!(buys::Entity::find().count(&fx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_creates_all_commit() {
    let fx = setup_fixture().await;
    let svc = service(&fx);

    let creates = (1..=5).map(|day| svc.create(draft(fx.inventory.id, 1, day), buy(dec!(2))));
    let results = futures::future::join_all(creates).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(count_movements(&fx).await, 5);
    assert_eq!(buys::Entity::find().count(&fx.db).await.unwrap(), 5);
}
