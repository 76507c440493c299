use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Order: index on customer_id for the by-customer lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_order_customer")
                    .table(Order::Table)
                    .col(Order::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Order: index on order_date for the paginated listing sort
        manager
            .create_index(
                Index::create()
                    .name("idx_order_date")
                    .table(Order::Table)
                    .col(Order::OrderDate)
                    .to_owned(),
            )
            .await?;

        // Customer: index on name for the exact-name lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_name")
                    .table(Customer::Table)
                    .col(Customer::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_order_customer").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_date").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_customer_name").table(Customer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Order { Table, CustomerId, OrderDate }

#[derive(DeriveIden)]
enum Customer { Table, Name }
