//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{column_error, from_bigint, to_bigint},
    domain::products::{
        data::{ProductDetails, ProductFilter, ProductSort},
        records::{ProductRecord, ProductStatus, ProductUuid},
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "products.repository.list_products",
        skip(self, tx),
        fields(product_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let products = query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(filter.search.as_deref())
            .bind(filter.status.map(ProductStatus::as_str))
            .bind(filter.sort.map(ProductSort::as_str))
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("product_count", products.len());

        Ok(products)
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        details: &ProductDetails,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&details.name)
            .bind(&details.description)
            .bind(details.ph)
            .bind(&details.size)
            .bind(to_bigint("price", details.price)?)
            .bind(&details.image)
            .bind(details.benefits.as_slice())
            .bind(to_integer("stock", details.stock)?)
            .bind(details.status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        details: &ProductDetails,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&details.name)
            .bind(&details.description)
            .bind(details.ph)
            .bind(&details.size)
            .bind(to_bigint("price", details.price)?)
            .bind(&details.image)
            .bind(details.benefits.as_slice())
            .bind(to_integer("stock", details.stock)?)
            .bind(details.status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn to_integer(column: &str, value: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|error| column_error(column, error))
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let benefits: Vec<String> = row.try_get("benefits")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            ph: row.try_get("ph")?,
            size: row.try_get("size")?,
            price: from_bigint("price", row.try_get("price")?)?,
            image: row.try_get("image")?,
            benefits: benefits.into(),
            stock: u32::try_from(row.try_get::<i32, _>("stock")?)
                .map_err(|error| column_error("stock", error))?,
            status: status
                .parse()
                .map_err(|error| column_error("status", error))?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
