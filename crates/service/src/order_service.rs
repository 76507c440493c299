use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{customer, item, order, order_item};

use crate::errors::ServiceError;
use crate::pagination::PageParams;

/// Write-side shape for order create/update requests. Ids, the order date
/// and the denormalized customer are server-assigned.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    #[serde(default)]
    pub order_information: String,
    #[serde(default)]
    pub customer_id: i32,
    #[serde(default)]
    pub items: Vec<ItemInput>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemInput {
    #[serde(default)]
    pub name: String,
}

/// Read-side shape: an order with its customer and items populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i32,
    pub order_information: String,
    pub order_date: sea_orm::prelude::DateTimeWithTimeZone,
    pub customer_id: i32,
    pub customer: customer::Model,
    pub items: Vec<item::Model>,
}

impl OrderView {
    fn assemble(order: order::Model, customer: customer::Model, items: Vec<item::Model>) -> Self {
        Self {
            id: order.id,
            order_information: order.order_information,
            order_date: order.order_date,
            customer_id: order.customer_id,
            customer,
            items,
        }
    }
}

/// Field checks shared by create and update, in the order the API
/// contract fixes them.
fn validate_input(input: &OrderInput) -> Result<(), ServiceError> {
    if input.order_information.is_empty() {
        return Err(ServiceError::Validation("Order information is required.".to_string()));
    }
    if input.customer_id <= 0 {
        return Err(ServiceError::Validation("Invalid customer ID.".to_string()));
    }
    if input.items.is_empty() {
        return Err(ServiceError::Validation(
            "At least one item is required for the order.".to_string(),
        ));
    }
    for entry in &input.items {
        if entry.name.is_empty() {
            return Err(ServiceError::Validation("Item name is required.".to_string()));
        }
    }
    Ok(())
}

/// Eagerly load each order's customer and items and zip into views.
async fn load_views(
    db: &DatabaseConnection,
    orders: Vec<order::Model>,
) -> Result<Vec<OrderView>, ServiceError> {
    let customers = orders
        .load_one(customer::Entity, db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = orders
        .load_many_to_many(item::Entity, order_item::Entity, db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    orders
        .into_iter()
        .zip(customers)
        .zip(items)
        .map(|((o, c), its)| {
            let customer =
                c.ok_or_else(|| ServiceError::Db(format!("order {} has no customer row", o.id)))?;
            Ok(OrderView::assemble(o, customer, its))
        })
        .collect()
}

/// Paginated listing, newest order first.
pub async fn list_orders(
    db: &DatabaseConnection,
    params: PageParams,
) -> Result<Vec<OrderView>, ServiceError> {
    let (offset, limit) = params.resolve()?;
    let orders = order::Entity::find()
        .order_by_desc(order::Column::OrderDate)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    load_views(db, orders).await
}

/// Get an order by id with relations populated.
pub async fn get_order(db: &DatabaseConnection, id: i32) -> Result<Option<OrderView>, ServiceError> {
    let Some(found) = order::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
    else {
        return Ok(None);
    };
    let mut views = load_views(db, vec![found]).await?;
    Ok(views.pop())
}

/// All orders for a customer id. An empty result is reported as not found,
/// whether the customer is unknown or simply has no orders.
pub async fn get_orders_by_customer_id(
    db: &DatabaseConnection,
    customer_id: i32,
) -> Result<Vec<OrderView>, ServiceError> {
    let orders = order::find_by_customer_id(db, customer_id).await?;
    if orders.is_empty() {
        return Err(ServiceError::NotFound(
            "No orders found for the specified customer.".to_string(),
        ));
    }
    load_views(db, orders).await
}

/// Resolve a customer by exact name, then list their orders.
pub async fn get_orders_by_customer_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Vec<OrderView>, ServiceError> {
    let found = customer::find_by_name(db, name)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Customer not found.".to_string()))?;
    get_orders_by_customer_id(db, found.id).await
}

/// Create an order: validate, resolve the customer, then persist the order,
/// its items and the join rows in one transaction.
pub async fn create_order(
    db: &DatabaseConnection,
    input: &OrderInput,
) -> Result<OrderView, ServiceError> {
    validate_input(input)?;

    let customer = customer::Entity::find_by_id(input.customer_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| {
            ServiceError::NotFound("Customer with the provided ID not found.".to_string())
        })?;

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let created = order::ActiveModel {
        order_information: Set(input.order_information.clone()),
        order_date: Set(Utc::now().into()),
        customer_id: Set(customer.id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut items = Vec::with_capacity(input.items.len());
    for entry in &input.items {
        let persisted = item::ActiveModel { name: Set(entry.name.clone()), ..Default::default() }
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        order_item::ActiveModel { order_id: Set(created.id), item_id: Set(persisted.id) }
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        items.push(persisted);
    }

    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = created.id, customer_id = customer.id, items = items.len(), "created order");
    Ok(OrderView::assemble(created, customer, items))
}

/// Update an order in place: same validation sequence as create, then
/// overwrite the fields, reset the order date and replace the item links.
pub async fn update_order(
    db: &DatabaseConnection,
    id: i32,
    input: &OrderInput,
) -> Result<OrderView, ServiceError> {
    let existing = order::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("Order not found.".to_string()))?;

    validate_input(input)?;

    let customer = customer::Entity::find_by_id(input.customer_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| {
            ServiceError::NotFound("Customer with the provided ID not found.".to_string())
        })?;

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut am: order::ActiveModel = existing.into();
    am.order_information = Set(input.order_information.clone());
    am.customer_id = Set(customer.id);
    am.order_date = Set(Utc::now().into());
    let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    // The supplied items replace the previous set.
    order_item::Entity::delete_many()
        .filter(order_item::Column::OrderId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut items = Vec::with_capacity(input.items.len());
    for entry in &input.items {
        let persisted = item::ActiveModel { name: Set(entry.name.clone()), ..Default::default() }
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        order_item::ActiveModel { order_id: Set(updated.id), item_id: Set(persisted.id) }
            .insert(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        items.push(persisted);
    }

    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = updated.id, customer_id = customer.id, items = items.len(), "updated order");
    Ok(OrderView::assemble(updated, customer, items))
}

/// Remove an order and its item links.
pub async fn delete_order(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let existing = order::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_none() {
        return Err(ServiceError::not_found("order"));
    }

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    order_item::Entity::delete_many()
        .filter(order_item::Column::OrderId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    order::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id, "deleted order");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_service::{create_customer, CustomerInput};
    use crate::test_support::get_db;
    use chrono::{Duration, Utc};

    fn order_input(info: &str, customer_id: i32, item_names: &[&str]) -> OrderInput {
        OrderInput {
            order_information: info.to_string(),
            customer_id,
            items: item_names.iter().map(|n| ItemInput { name: n.to_string() }).collect(),
        }
    }

    async fn seed_customer(db: &DatabaseConnection, name: &str, email: &str) -> customer::Model {
        create_customer(db, &CustomerInput { name: name.to_string(), email: email.to_string() })
            .await
            .unwrap()
    }

    fn assert_validation(err: ServiceError, expected: &str) {
        match err {
            ServiceError::Validation(msg) => assert_eq!(msg, expected),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn create_validates_in_contract_order() -> anyhow::Result<()> {
        let db = get_db().await?;

        let err = create_order(&db, &order_input("", 1, &["chair"])).await.unwrap_err();
        assert_validation(err, "Order information is required.");

        let err = create_order(&db, &order_input("x", 0, &["chair"])).await.unwrap_err();
        assert_validation(err, "Invalid customer ID.");

        let err = create_order(&db, &order_input("x", 1, &[])).await.unwrap_err();
        assert_validation(err, "At least one item is required for the order.");

        let err = create_order(&db, &order_input("x", 1, &["chair", ""])).await.unwrap_err();
        assert_validation(err, "Item name is required.");
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_existing_customer() -> anyhow::Result<()> {
        let db = get_db().await?;
        let err = create_order(&db, &order_input("x", 41, &["chair"])).await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => {
                assert_eq!(msg, "Customer with the provided ID not found.")
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn create_populates_customer_and_items() -> anyhow::Result<()> {
        let db = get_db().await?;
        let john = seed_customer(&db, "John Doe", "john@example.com").await;

        let created =
            create_order(&db, &order_input("two chairs", john.id, &["chair", "chair"])).await?;
        assert!(created.id > 0);
        assert_eq!(created.customer_id, john.id);
        assert_eq!(created.customer.email, "john@example.com");
        assert_eq!(created.items.len(), 2);

        let fetched = get_order(&db, created.id).await?.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.customer.id, john.id);
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_order_is_none() -> anyhow::Result<()> {
        let db = get_db().await?;
        assert!(get_order(&db, 7).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn list_rejects_non_positive_paging() -> anyhow::Result<()> {
        let db = get_db().await?;

        let params = PageParams { page_index: Some(-1), page_size: Some(1) };
        let err = list_orders(&db, params).await.unwrap_err();
        assert_validation(err, "Invalid page index or page size.");

        let params = PageParams { page_index: Some(1), page_size: Some(0) };
        let err = list_orders(&db, params).await.unwrap_err();
        assert_validation(err, "Invalid page index or page size.");
        Ok(())
    }

    #[tokio::test]
    async fn list_pages_newest_first_and_disjoint() -> anyhow::Result<()> {
        let db = get_db().await?;
        let john = seed_customer(&db, "John Doe", "john@example.com").await;

        // Insert with explicit dates so the ordering is unambiguous.
        let base = Utc::now();
        let mut ids = Vec::new();
        for day in 1..=3 {
            let inserted = order::ActiveModel {
                order_information: Set(format!("order {day}")),
                order_date: Set((base + Duration::days(day)).into()),
                customer_id: Set(john.id),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            ids.push(inserted.id);
        }

        let page1 = list_orders(&db, PageParams { page_index: Some(1), page_size: Some(2) }).await?;
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].id, ids[2]);
        assert_eq!(page1[1].id, ids[1]);

        let page2 = list_orders(&db, PageParams { page_index: Some(2), page_size: Some(2) }).await?;
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].id, ids[0]);

        // Defaults: page 1, size 10.
        let all = list_orders(&db, PageParams::default()).await?;
        assert_eq!(all.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn orders_by_customer_id() -> anyhow::Result<()> {
        let db = get_db().await?;
        let john = seed_customer(&db, "John Doe", "john@example.com").await;
        let jane = seed_customer(&db, "Jane Smith", "jane@example.com").await;

        create_order(&db, &order_input("for john", john.id, &["chair"])).await?;
        create_order(&db, &order_input("for jane", jane.id, &["table"])).await?;

        let johns = get_orders_by_customer_id(&db, john.id).await?;
        assert_eq!(johns.len(), 1);
        assert_eq!(johns[0].customer_id, john.id);

        let err = get_orders_by_customer_id(&db, 999).await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => {
                assert_eq!(msg, "No orders found for the specified customer.")
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn orders_by_customer_name() -> anyhow::Result<()> {
        let db = get_db().await?;
        let john = seed_customer(&db, "John Doe", "john@example.com").await;
        seed_customer(&db, "Jane Smith", "jane@example.com").await;
        create_order(&db, &order_input("for john", john.id, &["chair"])).await?;

        let found = get_orders_by_customer_name(&db, "John Doe").await?;
        assert_eq!(found.len(), 1);

        let err = get_orders_by_customer_name(&db, "Nobody").await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => assert_eq!(msg, "Customer not found."),
            other => panic!("unexpected error: {other}"),
        }

        // Known customer, zero orders.
        let err = get_orders_by_customer_name(&db, "Jane Smith").await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => {
                assert_eq!(msg, "No orders found for the specified customer.")
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_and_replaces_items() -> anyhow::Result<()> {
        let db = get_db().await?;
        let john = seed_customer(&db, "John Doe", "john@example.com").await;
        let jane = seed_customer(&db, "Jane Smith", "jane@example.com").await;

        let created = create_order(&db, &order_input("original", john.id, &["chair"])).await?;
        let updated = update_order(
            &db,
            created.id,
            &order_input("revised", jane.id, &["table", "lamp"]),
        )
        .await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.order_information, "revised");
        assert_eq!(updated.customer_id, jane.id);
        assert_eq!(updated.customer.email, "jane@example.com");
        assert!(updated.order_date >= created.order_date);
        assert_eq!(updated.items.len(), 2);

        // The previous item set is no longer linked.
        let links = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(created.id))
            .all(&db)
            .await?;
        assert_eq!(links.len(), 2);
        let names: Vec<_> = get_order(&db, created.id)
            .await?
            .unwrap()
            .items
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert!(!names.contains(&"chair".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_like_create() -> anyhow::Result<()> {
        let db = get_db().await?;
        let john = seed_customer(&db, "John Doe", "john@example.com").await;
        let created = create_order(&db, &order_input("original", john.id, &["chair"])).await?;

        let err = update_order(&db, created.id, &order_input("", john.id, &["chair"]))
            .await
            .unwrap_err();
        assert_validation(err, "Order information is required.");

        let err = update_order(&db, created.id, &order_input("x", john.id, &[]))
            .await
            .unwrap_err();
        assert_validation(err, "At least one item is required for the order.");

        let err = update_order(&db, 999, &order_input("x", john.id, &["chair"]))
            .await
            .unwrap_err();
        match err {
            ServiceError::NotFound(msg) => assert_eq!(msg, "Order not found."),
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_order_and_links() -> anyhow::Result<()> {
        let db = get_db().await?;
        let john = seed_customer(&db, "John Doe", "john@example.com").await;
        let created = create_order(&db, &order_input("to delete", john.id, &["chair"])).await?;

        delete_order(&db, created.id).await?;
        assert!(get_order(&db, created.id).await?.is_none());

        let links = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(created.id))
            .all(&db)
            .await?;
        assert!(links.is_empty());

        let err = delete_order(&db, created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
