//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{column_error, from_bigint, to_bigint},
    domain::users::{
        data::UserFilter,
        records::{UserRecord, UserRole, UserStatus, UserUuid},
    },
};

const LIST_USERS_SQL: &str = include_str!("sql/list_users.sql");
const COUNT_USERS_SQL: &str = include_str!("sql/count_users.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const FIND_USER_BY_EMAIL_SQL: &str = include_str!("sql/find_user_by_email.sql");
const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const UPDATE_USER_SQL: &str = include_str!("sql/update_user.sql");
const UPDATE_USER_ROLE_SQL: &str = include_str!("sql/update_user_role.sql");
const UPDATE_USER_STATUS_SQL: &str = include_str!("sql/update_user_status.sql");
const UPDATE_USER_PASSWORD_SQL: &str = include_str!("sql/update_user_password.sql");
const DELETE_USER_SQL: &str = include_str!("sql/delete_user.sql");

/// Row values for a new user; the password is already hashed.
pub(crate) struct UserInsert<'a> {
    pub uuid: UserUuid,
    pub email: &'a str,
    pub name: &'a str,
    pub role: UserRole,
    pub status: UserStatus,
    pub avatar: Option<&'a str>,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "users.repository.list_users",
        skip(self, tx),
        fields(user_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &UserFilter,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        let users = query_as::<Postgres, UserRecord>(LIST_USERS_SQL)
            .bind(filter.search.as_deref())
            .bind(filter.role.map(UserRole::as_str))
            .bind(filter.status.map(UserStatus::as_str))
            .bind(i64::from(filter.effective_limit()))
            .bind(to_bigint("offset", filter.offset())?)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("user_count", users.len());

        Ok(users)
    }

    pub(crate) async fn count_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &UserFilter,
    ) -> Result<u64, sqlx::Error> {
        let total: i64 = query_scalar(COUNT_USERS_SQL)
            .bind(filter.search.as_deref())
            .bind(filter.role.map(UserRole::as_str))
            .bind(filter.status.map(UserStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        from_bigint("count", total)
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_user_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(FIND_USER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserInsert<'_>,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.email)
            .bind(user.name)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(user.avatar)
            .bind(user.password_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        email: &str,
        name: &str,
        avatar: Option<&str>,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_USER_SQL)
            .bind(user.into_uuid())
            .bind(email)
            .bind(name)
            .bind(avatar)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_user_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        role: UserRole,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_USER_ROLE_SQL)
            .bind(user.into_uuid())
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_user_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        status: UserStatus,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_USER_STATUS_SQL)
            .bind(user.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_user_password(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_USER_PASSWORD_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_USER_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role: role.parse().map_err(|error| column_error("role", error))?,
            status: status
                .parse()
                .map_err(|error| column_error("status", error))?,
            avatar: row.try_get("avatar")?,
            last_login_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_login_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
