//! Create `order_item` join table (orders/items many-to-many).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderItem::Table)
                    .if_not_exists()
                    .col(integer(OrderItem::OrderId).not_null())
                    .col(integer(OrderItem::ItemId).not_null())
                    .primary_key(
                        Index::create()
                            .col(OrderItem::OrderId)
                            .col(OrderItem::ItemId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item_order")
                            .from(OrderItem::Table, OrderItem::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item_item")
                            .from(OrderItem::Table, OrderItem::ItemId)
                            .to(Item::Table, Item::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderItem { Table, OrderId, ItemId }

#[derive(DeriveIden)]
enum Order { Table, Id }

#[derive(DeriveIden)]
enum Item { Table, Id }
