use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl Related<crate::order::Entity> for Entity {
    fn to() -> RelationDef {
        crate::order_item::Relation::Order.def()
    }

    fn via() -> Option<RelationDef> {
        Some(crate::order_item::Relation::Item.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
