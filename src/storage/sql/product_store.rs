//! Unified SQL ProductStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend,
//! eliminating code duplication while maintaining type safety.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of ProductStore.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite).
pub struct SqlProductStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlProductStore<DB> {
    /// Create a new SQL product store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Macro to implement ProductStore for a specific SQL backend.
macro_rules! impl_product_store {
    ($db_type:ty, $row_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlProductStore<$db_type> {
            fn product_from_row(row: &$row_type) -> Result<crate::model::Product, sqlx::Error> {
                use sqlx::Row;

                Ok(crate::model::Product {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                    price: crate::model::price_from_cents(row.try_get("price_cents")?),
                    image_url: row.try_get("image_url")?,
                    sustainability_index: row.try_get("sustainability_index")?,
                    stock_quantity: row.try_get("stock_quantity")?,
                })
            }

            async fn select_products(
                &self,
                stmt: &sea_query::SelectStatement,
            ) -> crate::storage::Result<Vec<crate::model::Product>> {
                let (sql, values) = <$db_type>::build_select(stmt);
                let rows = sqlx::query_with(&sql, values).fetch_all(&self.pool).await?;

                let products = rows
                    .iter()
                    .map(Self::product_from_row)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(products)
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::ProductStore for SqlProductStore<$db_type> {
            async fn list(&self) -> crate::storage::Result<Vec<crate::model::Product>> {
                use sea_query::{Order, Query};

                use crate::storage::schema::{Products, PRODUCT_COLUMNS};

                let stmt = Query::select()
                    .columns(PRODUCT_COLUMNS)
                    .from(Products::Table)
                    .order_by(Products::Id, Order::Asc)
                    .to_owned();

                self.select_products(&stmt).await
            }

            async fn get(&self, id: i64) -> crate::storage::Result<crate::model::Product> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{Products, PRODUCT_COLUMNS};
                use crate::storage::StorageError;

                let stmt = Query::select()
                    .columns(PRODUCT_COLUMNS)
                    .from(Products::Table)
                    .and_where(Expr::col(Products::Id).eq(id))
                    .to_owned();

                let (sql, values) = <$db_type>::build_select(&stmt);
                let row = sqlx::query_with(&sql, values)
                    .fetch_optional(&self.pool)
                    .await?;

                match row {
                    Some(row) => Ok(Self::product_from_row(&row)?),
                    None => Err(StorageError::ProductNotFound(id)),
                }
            }

            async fn ensure_stock(
                &self,
                id: i64,
                quantity: i64,
            ) -> crate::storage::Result<crate::model::Product> {
                use crate::storage::StorageError;

                if quantity < 1 {
                    return Err(StorageError::InvalidQuantity(quantity));
                }

                let product = self.get(id).await?;
                if quantity > product.stock_quantity {
                    return Err(StorageError::InsufficientStock {
                        requested: quantity,
                        available: product.stock_quantity,
                    });
                }

                Ok(product)
            }

            async fn list_unscored(&self) -> crate::storage::Result<Vec<crate::model::Product>> {
                use sea_query::{Expr, Order, Query};

                use crate::storage::schema::{Products, PRODUCT_COLUMNS};

                let stmt = Query::select()
                    .columns(PRODUCT_COLUMNS)
                    .from(Products::Table)
                    .and_where(Expr::col(Products::SustainabilityIndex).is_null())
                    .order_by(Products::Id, Order::Asc)
                    .to_owned();

                self.select_products(&stmt).await
            }

            async fn list_by_score(&self) -> crate::storage::Result<Vec<crate::model::Product>> {
                use sea_query::{Expr, Order, Query};

                use crate::storage::schema::{Products, PRODUCT_COLUMNS};

                // (index IS NULL) sorts false before true on both backends,
                // which puts unscored rows last.
                let stmt = Query::select()
                    .columns(PRODUCT_COLUMNS)
                    .from(Products::Table)
                    .order_by_expr(Expr::col(Products::SustainabilityIndex).is_null(), Order::Asc)
                    .order_by(Products::SustainabilityIndex, Order::Desc)
                    .order_by(Products::Id, Order::Asc)
                    .to_owned();

                self.select_products(&stmt).await
            }

            async fn update_score(&self, id: i64, score: f64) -> crate::storage::Result<()> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Products;
                use crate::storage::StorageError;
                use crate::sustainability::is_storable;

                if !is_storable(score) {
                    return Err(StorageError::InvalidScore(score));
                }

                let stmt = Query::update()
                    .table(Products::Table)
                    .value(Products::SustainabilityIndex, score)
                    .and_where(Expr::col(Products::Id).eq(id))
                    .to_owned();

                let (sql, values) = <$db_type>::build_update(&stmt);
                let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

                if result.rows_affected() == 0 {
                    return Err(StorageError::ProductNotFound(id));
                }

                Ok(())
            }

            async fn create(
                &self,
                product: crate::model::NewProduct,
            ) -> crate::storage::Result<crate::model::Product> {
                use sea_query::Query;
                use sqlx::Row;

                use crate::storage::schema::Products;
                use crate::storage::StorageError;
                use crate::sustainability::is_storable;

                let price_cents = crate::model::price_to_cents(product.price)
                    .ok_or(StorageError::InvalidPrice(product.price))?;
                if product.stock_quantity < 0 {
                    return Err(StorageError::InvalidQuantity(product.stock_quantity));
                }
                if let Some(score) = product.sustainability_index {
                    if !is_storable(score) {
                        return Err(StorageError::InvalidScore(score));
                    }
                }

                let stmt = Query::insert()
                    .into_table(Products::Table)
                    .columns([
                        Products::Name,
                        Products::Description,
                        Products::PriceCents,
                        Products::ImageUrl,
                        Products::SustainabilityIndex,
                        Products::StockQuantity,
                    ])
                    .values_panic([
                        product.name.into(),
                        product.description.into(),
                        price_cents.into(),
                        product.image_url.into(),
                        product.sustainability_index.into(),
                        product.stock_quantity.into(),
                    ])
                    .returning_col(Products::Id)
                    .to_owned();

                let (sql, values) = <$db_type>::build_insert(&stmt);
                let row = sqlx::query_with(&sql, values).fetch_one(&self.pool).await?;
                let id: i64 = row.try_get("id")?;

                self.get(id).await
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_product_store!(super::postgres::Postgres, sqlx::postgres::PgRow, "postgres");
impl_product_store!(super::sqlite::Sqlite, sqlx::sqlite::SqliteRow, "sqlite");
