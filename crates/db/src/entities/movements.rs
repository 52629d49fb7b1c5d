//! `SeaORM` Entity for movements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub inventory_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(225))", nullable)]
    pub description: Option<String>,
    pub quantity: i32,
    pub movement_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventories::Entity",
        from = "Column::InventoryId",
        to = "super::inventories::Column::Id",
        on_delete = "Restrict"
    )]
    Inventories,
    #[sea_orm(has_one = "super::buys::Entity")]
    Buys,
    #[sea_orm(has_one = "super::sells::Entity")]
    Sells,
    #[sea_orm(has_one = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::inventories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventories.def()
    }
}

impl Related<super::buys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buys.def()
    }
}

impl Related<super::sells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sells.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
