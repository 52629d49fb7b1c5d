//! `SeaORM` Entity for sells table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sells")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub movement_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub sale_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub discount_percentage: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movements::Entity",
        from = "Column::MovementId",
        to = "super::movements::Column::Id",
        on_delete = "Restrict"
    )]
    Movements,
}

impl Related<super::movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
