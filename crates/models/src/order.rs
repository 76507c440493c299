use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_information: String,
    pub order_date: DateTimeWithTimeZone,
    pub customer_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
    OrderItem,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(crate::customer::Entity)
                .from(Column::CustomerId)
                .to(crate::customer::Column::Id)
                .into(),
            Relation::OrderItem => Entity::has_many(crate::order_item::Entity).into(),
        }
    }
}

impl Related<crate::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<crate::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl Related<crate::item::Entity> for Entity {
    fn to() -> RelationDef {
        crate::order_item::Relation::Item.def()
    }

    fn via() -> Option<RelationDef> {
        Some(crate::order_item::Relation::Order.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// All orders for a customer, newest first.
pub async fn find_by_customer_id(
    db: &DatabaseConnection,
    customer_id: i32,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::CustomerId.eq(customer_id))
        .order_by_desc(Column::OrderDate)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}
