//! Orders Repository

use gennessence::checkout::ShippingAddress;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{column_error, from_bigint, to_bigint},
    domain::{
        orders::{
            data::{OrderFilter, OrderSort, PaymentUpdate, StatusUpdate},
            records::{OrderRecord, OrderUuid},
        },
        users::records::UserUuid,
    },
};

const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const UPDATE_ORDER_PAYMENT_SQL: &str = include_str!("../sql/update_order_payment.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "orders.repository.list_orders",
        skip(self, tx),
        fields(order_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let (start, end) = filter
            .created_between
            .map_or((None, None), |(start, end)| {
                (Some(SqlxTimestamp::from(start)), Some(SqlxTimestamp::from(end)))
            });

        let orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.status.map(|status| status.as_str()))
            .bind(filter.payment_status.map(|status| status.as_str()))
            .bind(start)
            .bind(end)
            .bind(filter.sort.map(OrderSort::as_str))
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("order_count", orders.len());

        Ok(orders)
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Read an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        user: UserUuid,
        total: u64,
        address: &ShippingAddress,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .bind(to_bigint("total", total)?)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.postal_code)
            .bind(&address.country)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &StatusUpdate,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(update.status.as_str())
            .bind(update.tracking_number.as_deref())
            .bind(update.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_order_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &PaymentUpdate,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_PAYMENT_SQL)
            .bind(order.into_uuid())
            .bind(update.payment_status.as_str())
            .bind(update.payment_id.as_deref())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let payment_status: String = row.try_get("payment_status")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            items: Vec::new(),
            total: from_bigint("total", row.try_get("total")?)?,
            status: status
                .parse()
                .map_err(|error| column_error("status", error))?,
            payment_status: payment_status
                .parse()
                .map_err(|error| column_error("payment_status", error))?,
            payment_id: row.try_get("payment_id")?,
            shipping_address: ShippingAddress {
                street: row.try_get("shipping_street")?,
                city: row.try_get("shipping_city")?,
                state: row.try_get("shipping_state")?,
                postal_code: row.try_get("shipping_postal_code")?,
                country: row.try_get("shipping_country")?,
            },
            tracking_number: row.try_get("tracking_number")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
