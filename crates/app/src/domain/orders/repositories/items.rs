//! Order Items Repository

use rustc_hash::FxHashMap;
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{column_error, from_bigint, to_bigint},
    domain::{
        orders::records::{OrderItemRecord, OrderUuid},
        products::records::ProductUuid,
    },
};

const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("../sql/create_order_items.sql");
const GET_PRODUCTS_FOR_ORDER_SQL: &str = include_str!("../sql/get_products_for_order.sql");

/// Name and current price of a product being ordered.
#[derive(Debug, Clone)]
pub(crate) struct PricedProduct {
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Items of each requested order, keyed by order, in line order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<FxHashMap<OrderUuid, Vec<OrderItemRecord>>, sqlx::Error> {
        if orders.is_empty() {
            return Ok(FxHashMap::default());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        let rows: Vec<(OrderUuid, OrderItemRecord)> = query(GET_ORDER_ITEMS_SQL)
            .bind(&uuids)
            .try_map(|row: PgRow| order_item(&row))
            .fetch_all(&mut **tx)
            .await?;

        let mut items: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for (order, item) in rows {
            items.entry(order).or_default().push(item);
        }

        Ok(items)
    }

    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[OrderItemRecord],
    ) -> Result<(), sqlx::Error> {
        let mut positions = Vec::with_capacity(items.len());
        let mut product_uuids: Vec<Uuid> = Vec::with_capacity(items.len());
        let mut names = Vec::with_capacity(items.len());
        let mut quantities = Vec::with_capacity(items.len());
        let mut prices = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            positions
                .push(i32::try_from(position).map_err(|error| column_error("position", error))?);
            product_uuids.push(item.product_uuid.into_uuid());
            names.push(item.name.as_str());
            quantities.push(
                i32::try_from(item.quantity).map_err(|error| column_error("quantity", error))?,
            );
            prices.push(to_bigint("price", item.price)?);
        }

        query(CREATE_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .bind(&positions)
            .bind(&product_uuids)
            .bind(&names)
            .bind(&quantities)
            .bind(&prices)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Orderable products among `products`, keyed by uuid.
    pub(crate) async fn get_products_for_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<FxHashMap<ProductUuid, PricedProduct>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        let rows: Vec<(Uuid, String, i64)> = query_as(GET_PRODUCTS_FOR_ORDER_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        rows.into_iter()
            .map(|(uuid, name, price)| {
                Ok((
                    ProductUuid::from_uuid(uuid),
                    PricedProduct {
                        name,
                        price: from_bigint("price", price)?,
                    },
                ))
            })
            .collect()
    }
}

fn order_item(row: &PgRow) -> sqlx::Result<(OrderUuid, OrderItemRecord)> {
    let quantity: i32 = row.try_get("quantity")?;

    Ok((
        OrderUuid::from_uuid(row.try_get("order_uuid")?),
        OrderItemRecord {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            quantity: u32::try_from(quantity).map_err(|error| column_error("quantity", error))?,
            price: from_bigint("price", row.try_get("price")?)?,
        },
    ))
}
