//! Unified SQL CartStore implementation.
//!
//! Quantity writes are single guarded statements: the stock check is part of
//! the `UPDATE`'s `WHERE` clause, so two concurrent adds of the same product
//! both land (or the second is refused) instead of one overwriting the other.

use sea_query::{Expr, Query, SelectStatement, SimpleExpr, SubQueryStatement};

use super::{SqlDatabase, SqlProductStore};
use crate::storage::schema::{CartItems, Products};

/// Add attempts before giving up on a racing insert.
const ADD_ATTEMPTS: usize = 2;

/// SQL-based implementation of CartStore.
pub struct SqlCartStore<DB: SqlDatabase> {
    pool: DB::Pool,
    products: SqlProductStore<DB>,
}

impl<DB: SqlDatabase> SqlCartStore<DB> {
    /// Create a new SQL cart store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            products: SqlProductStore::new(pool.clone()),
            pool,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// `(SELECT stock_quantity FROM products WHERE products.id = cart_items.product_id)`
fn stock_of_line_product() -> SimpleExpr {
    let select: SelectStatement = Query::select()
        .column(Products::StockQuantity)
        .from(Products::Table)
        .and_where(Expr::col((Products::Table, Products::Id)).equals((CartItems::Table, CartItems::ProductId)))
        .to_owned();

    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(select)))
}

/// Macro to implement CartStore for a specific SQL backend.
macro_rules! impl_cart_store {
    ($db_type:ty, $row_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlCartStore<$db_type> {
            fn line_from_row(row: &$row_type) -> Result<crate::model::CartLine, sqlx::Error> {
                use sqlx::Row;

                Ok(crate::model::CartLine {
                    id: row.try_get("id")?,
                    product_id: row.try_get("product_id")?,
                    quantity: row.try_get("quantity")?,
                    user_session: row.try_get("user_session")?,
                    created_at: row.try_get("created_at")?,
                    updated_at: row.try_get("updated_at")?,
                })
            }

            fn item_from_row(row: &$row_type) -> Result<crate::model::CartItem, sqlx::Error> {
                use sqlx::Row;

                Ok(crate::model::CartItem {
                    id: row.try_get("id")?,
                    product_id: row.try_get("product_id")?,
                    quantity: row.try_get("quantity")?,
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                    price: crate::model::price_from_cents(row.try_get("price_cents")?),
                    image_url: row.try_get("image_url")?,
                    sustainability_index: row.try_get("sustainability_index")?,
                    stock_quantity: row.try_get("stock_quantity")?,
                })
            }

            async fn find_line(
                &self,
                session: &str,
                product_id: i64,
            ) -> crate::storage::Result<Option<crate::model::CartLine>> {
                use crate::storage::schema::CART_LINE_COLUMNS;

                let stmt = Query::select()
                    .columns(CART_LINE_COLUMNS)
                    .from(CartItems::Table)
                    .and_where(Expr::col(CartItems::ProductId).eq(product_id))
                    .and_where(Expr::col(CartItems::UserSession).eq(session))
                    .to_owned();

                let (sql, values) = <$db_type>::build_select(&stmt);
                let row = sqlx::query_with(&sql, values)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(row.as_ref().map(Self::line_from_row).transpose()?)
            }

            async fn get_line(&self, id: i64) -> crate::storage::Result<Option<crate::model::CartLine>> {
                use crate::storage::schema::CART_LINE_COLUMNS;

                let stmt = Query::select()
                    .columns(CART_LINE_COLUMNS)
                    .from(CartItems::Table)
                    .and_where(Expr::col(CartItems::Id).eq(id))
                    .to_owned();

                let (sql, values) = <$db_type>::build_select(&stmt);
                let row = sqlx::query_with(&sql, values)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(row.as_ref().map(Self::line_from_row).transpose()?)
            }

            /// Bump an existing line by `quantity` if the new total fits in stock.
            async fn try_increment(
                &self,
                session: &str,
                product_id: i64,
                quantity: i64,
            ) -> crate::storage::Result<Option<crate::model::CartLine>> {
                use crate::storage::schema::CART_LINE_COLUMNS;

                let stmt = Query::update()
                    .table(CartItems::Table)
                    .value(CartItems::Quantity, Expr::col(CartItems::Quantity).add(quantity))
                    .value(CartItems::UpdatedAt, super::timestamp_now())
                    .and_where(Expr::col(CartItems::ProductId).eq(product_id))
                    .and_where(Expr::col(CartItems::UserSession).eq(session))
                    .and_where(Expr::expr(Expr::col(CartItems::Quantity).add(quantity)).lte(stock_of_line_product()))
                    .returning(Query::returning().columns(CART_LINE_COLUMNS))
                    .to_owned();

                let (sql, values) = <$db_type>::build_update(&stmt);
                let row = sqlx::query_with(&sql, values)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(row.as_ref().map(Self::line_from_row).transpose()?)
            }

            /// Insert a new line unless one already exists for the pair.
            async fn try_insert(
                &self,
                session: &str,
                product_id: i64,
                quantity: i64,
            ) -> crate::storage::Result<Option<crate::model::CartLine>> {
                use sea_query::OnConflict;

                use crate::storage::schema::CART_LINE_COLUMNS;

                let now = super::timestamp_now();
                let stmt = Query::insert()
                    .into_table(CartItems::Table)
                    .columns([
                        CartItems::ProductId,
                        CartItems::Quantity,
                        CartItems::UserSession,
                        CartItems::CreatedAt,
                        CartItems::UpdatedAt,
                    ])
                    .values_panic([
                        product_id.into(),
                        quantity.into(),
                        session.into(),
                        now.clone().into(),
                        now.into(),
                    ])
                    .on_conflict(
                        OnConflict::columns([CartItems::ProductId, CartItems::UserSession])
                            .do_nothing()
                            .to_owned(),
                    )
                    .returning(Query::returning().columns(CART_LINE_COLUMNS))
                    .to_owned();

                let (sql, values) = <$db_type>::build_insert(&stmt);
                let row = sqlx::query_with(&sql, values)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(row.as_ref().map(Self::line_from_row).transpose()?)
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::CartStore for SqlCartStore<$db_type> {
            async fn list(&self, session: &str) -> crate::storage::Result<Vec<crate::model::CartItem>> {
                use sea_query::Order;

                let stmt = Query::select()
                    .columns([
                        (CartItems::Table, CartItems::Id),
                        (CartItems::Table, CartItems::ProductId),
                        (CartItems::Table, CartItems::Quantity),
                    ])
                    .columns([
                        (Products::Table, Products::Name),
                        (Products::Table, Products::Description),
                        (Products::Table, Products::PriceCents),
                        (Products::Table, Products::ImageUrl),
                        (Products::Table, Products::SustainabilityIndex),
                        (Products::Table, Products::StockQuantity),
                    ])
                    .from(CartItems::Table)
                    .inner_join(
                        Products::Table,
                        Expr::col((CartItems::Table, CartItems::ProductId)).equals((Products::Table, Products::Id)),
                    )
                    .and_where(Expr::col((CartItems::Table, CartItems::UserSession)).eq(session))
                    .order_by((CartItems::Table, CartItems::CreatedAt), Order::Desc)
                    .order_by((CartItems::Table, CartItems::Id), Order::Desc)
                    .to_owned();

                let (sql, values) = <$db_type>::build_select(&stmt);
                let rows = sqlx::query_with(&sql, values).fetch_all(&self.pool).await?;

                let items = rows
                    .iter()
                    .map(Self::item_from_row)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(items)
            }

            async fn add(
                &self,
                session: &str,
                product_id: i64,
                quantity: i64,
            ) -> crate::storage::Result<crate::model::AddOutcome> {
                use tracing::debug;

                use crate::model::AddOutcome;
                use crate::storage::{ProductStore, StorageError};

                let product = self.products.ensure_stock(product_id, quantity).await?;

                for _ in 0..ADD_ATTEMPTS {
                    if let Some(line) = self.try_increment(session, product_id, quantity).await? {
                        debug!(session, product_id, quantity = line.quantity, "cart line incremented");
                        return Ok(AddOutcome { line, created: false });
                    }

                    if let Some(existing) = self.find_line(session, product_id).await? {
                        let requested = existing.quantity + quantity;
                        let available = self.products.get(product_id).await?.stock_quantity;
                        if requested > available {
                            return Err(StorageError::InsufficientStock { requested, available });
                        }
                        // Line appeared after the increment attempt.
                        continue;
                    }

                    if let Some(line) = self.try_insert(session, product_id, quantity).await? {
                        debug!(session, product_id, quantity, "cart line created");
                        return Ok(AddOutcome { line, created: true });
                    }
                }

                Err(StorageError::Conflict(format!(
                    "cart line for product {} in session '{}' kept changing",
                    product.id, session
                )))
            }

            async fn update_quantity(&self, id: i64, quantity: i64) -> crate::storage::Result<crate::model::CartLine> {
                use crate::storage::schema::CART_LINE_COLUMNS;
                use crate::storage::{ProductStore, StorageError};

                if quantity < 1 {
                    return Err(StorageError::InvalidQuantity(quantity));
                }

                let stmt = Query::update()
                    .table(CartItems::Table)
                    .value(CartItems::Quantity, quantity)
                    .value(CartItems::UpdatedAt, super::timestamp_now())
                    .and_where(Expr::col(CartItems::Id).eq(id))
                    .and_where(Expr::val(quantity).lte(stock_of_line_product()))
                    .returning(Query::returning().columns(CART_LINE_COLUMNS))
                    .to_owned();

                let (sql, values) = <$db_type>::build_update(&stmt);
                let row = sqlx::query_with(&sql, values)
                    .fetch_optional(&self.pool)
                    .await?;

                if let Some(row) = row {
                    return Ok(Self::line_from_row(&row)?);
                }

                let line = self
                    .get_line(id)
                    .await?
                    .ok_or(StorageError::CartItemNotFound(id))?;
                let available = self.products.get(line.product_id).await?.stock_quantity;

                Err(StorageError::InsufficientStock {
                    requested: quantity,
                    available,
                })
            }

            async fn remove(&self, id: i64) -> crate::storage::Result<crate::model::CartLine> {
                use crate::storage::schema::CART_LINE_COLUMNS;
                use crate::storage::StorageError;

                let stmt = Query::delete()
                    .from_table(CartItems::Table)
                    .and_where(Expr::col(CartItems::Id).eq(id))
                    .returning(Query::returning().columns(CART_LINE_COLUMNS))
                    .to_owned();

                let (sql, values) = <$db_type>::build_delete(&stmt);
                let row = sqlx::query_with(&sql, values)
                    .fetch_optional(&self.pool)
                    .await?;

                match row {
                    Some(row) => Ok(Self::line_from_row(&row)?),
                    None => Err(StorageError::CartItemNotFound(id)),
                }
            }

            async fn clear(&self, session: &str) -> crate::storage::Result<u64> {
                let stmt = Query::delete()
                    .from_table(CartItems::Table)
                    .and_where(Expr::col(CartItems::UserSession).eq(session))
                    .to_owned();

                let (sql, values) = <$db_type>::build_delete(&stmt);
                let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

                Ok(result.rows_affected())
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_cart_store!(super::postgres::Postgres, sqlx::postgres::PgRow, "postgres");
impl_cart_store!(super::sqlite::Sqlite, sqlx::sqlite::SqliteRow, "sqlite");
