//! Cart Items Repository

use gennessence::cart::{CartItem, CartKey};
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};
use uuid::Uuid;

use crate::{
    database::{column_error, from_bigint, to_bigint},
    domain::carts::records::CartUuid,
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const CREATE_CART_ITEMS_SQL: &str = include_str!("../sql/create_cart_items.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("../sql/delete_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .try_map(|row: PgRow| cart_item(&row))
            .fetch_all(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "carts.repository.create_cart_items",
        skip(self, tx, items),
        fields(item_count = items.len()),
        err
    )]
    pub(crate) async fn create_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        items: &[CartItem],
    ) -> Result<(), sqlx::Error> {
        if items.is_empty() {
            return Ok(());
        }

        let mut keys = Vec::with_capacity(items.len());
        let mut positions = Vec::with_capacity(items.len());
        let mut product_uuids: Vec<Uuid> = Vec::with_capacity(items.len());
        let mut names = Vec::with_capacity(items.len());
        let mut sizes = Vec::with_capacity(items.len());
        let mut prices = Vec::with_capacity(items.len());
        let mut quantities = Vec::with_capacity(items.len());
        let mut images = Vec::with_capacity(items.len());
        let mut colors = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            keys.push(item.id.as_str());
            positions.push(i32::try_from(position).map_err(|error| column_error("position", error))?);
            product_uuids.push(item.product_uuid);
            names.push(item.name.as_str());
            sizes.push(item.size.as_str());
            prices.push(to_bigint("price", item.price)?);
            quantities.push(i32::try_from(item.qty).map_err(|error| column_error("qty", error))?);
            images.push(item.image.as_str());
            colors.push(item.color.as_str());
        }

        query(CREATE_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .bind(&keys)
            .bind(&positions)
            .bind(&product_uuids)
            .bind(&names)
            .bind(&sizes)
            .bind(&prices)
            .bind(&quantities)
            .bind(&images)
            .bind(&colors)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn cart_item(row: &PgRow) -> sqlx::Result<CartItem> {
    let key: String = row.try_get("key")?;
    let qty: i32 = row.try_get("qty")?;

    Ok(CartItem {
        id: CartKey::from(key.as_str()),
        product_uuid: row.try_get("product_uuid")?,
        name: row.try_get("name")?,
        size: row.try_get("size")?,
        price: from_bigint("price", row.try_get("price")?)?,
        qty: u32::try_from(qty).map_err(|error| column_error("qty", error))?,
        image: row.try_get("image")?,
        color: row.try_get("color")?,
    })
}
