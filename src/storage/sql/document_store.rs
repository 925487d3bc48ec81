//! Unified SQL DocumentStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend. Documents
//! are stored as JSON text in one table keyed by `(collection, id)`;
//! filtering and ordering of listings happen after the collection scan.
//! Updates read, merge and write inside one transaction, with the row
//! locked on PostgreSQL.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of DocumentStore.
pub struct SqlDocumentStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlDocumentStore<DB> {
    /// Create a new SQL document store with the given pool.
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

macro_rules! impl_document_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlDocumentStore<$db_type> {
            /// Create the documents table if it does not exist.
            pub async fn init(&self) -> crate::storage::Result<()> {
                sqlx::query(crate::storage::schema::CREATE_DOCUMENTS_TABLE)
                    .execute(&self.pool)
                    .await?;
                tracing::debug!("documents table ready");
                Ok(())
            }

            async fn fetch_body(
                &self,
                collection: &str,
                id: &str,
            ) -> crate::storage::Result<Option<crate::storage::Document>> {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::storage::schema::Documents;

                let stmt = Query::select()
                    .column(Documents::Body)
                    .from(Documents::Table)
                    .and_where(Expr::col(Documents::Collection).eq(collection))
                    .and_where(Expr::col(Documents::Id).eq(id))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                match row {
                    Some(row) => {
                        let body: String = row.get("body");
                        Ok(Some(serde_json::from_str(&body)?))
                    }
                    None => Ok(None),
                }
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::DocumentStore for SqlDocumentStore<$db_type> {
            async fn list(
                &self,
                collection: &str,
                query: &crate::storage::ListQuery,
            ) -> crate::storage::Result<Vec<crate::storage::Document>> {
                use sea_query::{Expr, Order, Query};
                use sqlx::Row;

                use crate::storage::schema::Documents;

                let stmt = Query::select()
                    .column(Documents::Body)
                    .from(Documents::Table)
                    .and_where(Expr::col(Documents::Collection).eq(collection))
                    .order_by(Documents::Id, Order::Asc)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let docs = rows
                    .iter()
                    .map(|row| {
                        let body: String = row.get("body");
                        serde_json::from_str::<crate::storage::Document>(&body)
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(crate::storage::helpers::apply_list_query(docs, query))
            }

            async fn get(
                &self,
                collection: &str,
                id: &str,
            ) -> crate::storage::Result<Option<crate::storage::Document>> {
                self.fetch_body(collection, id).await
            }

            async fn create(
                &self,
                collection: &str,
                mut doc: crate::storage::Document,
            ) -> crate::storage::Result<String> {
                use sea_query::Query;

                use crate::storage::schema::Documents;
                use crate::storage::StorageError;

                let id = crate::storage::helpers::assign_id(collection, &mut doc)?;
                let body = serde_json::to_string(&doc)?;
                let now = chrono::Utc::now().to_rfc3339();

                let stmt = Query::insert()
                    .into_table(Documents::Table)
                    .columns([
                        Documents::Collection,
                        Documents::Id,
                        Documents::Body,
                        Documents::CreatedAt,
                        Documents::UpdatedAt,
                    ])
                    .values_panic([
                        collection.into(),
                        id.clone().into(),
                        body.into(),
                        now.clone().into(),
                        now.into(),
                    ])
                    .to_owned();

                let sql = <$db_type>::build_insert(stmt);
                match sqlx::query(&sql).execute(&self.pool).await {
                    Ok(_) => Ok(id),
                    Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                        Err(StorageError::AlreadyExists {
                            collection: collection.to_string(),
                            id,
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }

            async fn update(
                &self,
                collection: &str,
                id: &str,
                partial: crate::storage::Document,
            ) -> crate::storage::Result<()> {
                use sea_query::{Expr, LockType, Query};
                use sqlx::Row;

                use crate::storage::schema::Documents;
                use crate::storage::StorageError;

                let mut tx = self.pool.begin().await?;

                let select = Query::select()
                    .column(Documents::Body)
                    .from(Documents::Table)
                    .and_where(Expr::col(Documents::Collection).eq(collection))
                    .and_where(Expr::col(Documents::Id).eq(id))
                    .lock(LockType::Update)
                    .to_owned();

                let sql = <$db_type>::build_select(select);
                let row = sqlx::query(&sql)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| StorageError::not_found(collection, id))?;
                let body: String = row.get("body");
                let mut doc: crate::storage::Document = serde_json::from_str(&body)?;
                crate::storage::helpers::merge(collection, id, &mut doc, partial)?;

                let body = serde_json::to_string(&doc)?;
                let now = chrono::Utc::now().to_rfc3339();

                let stmt = Query::update()
                    .table(Documents::Table)
                    .value(Documents::Body, body)
                    .value(Documents::UpdatedAt, now)
                    .and_where(Expr::col(Documents::Collection).eq(collection))
                    .and_where(Expr::col(Documents::Id).eq(id))
                    .to_owned();

                let sql = <$db_type>::build_update(stmt);
                let result = sqlx::query(&sql).execute(&mut *tx).await?;
                if result.rows_affected() == 0 {
                    return Err(StorageError::not_found(collection, id));
                }
                tx.commit().await?;
                Ok(())
            }

            async fn delete(&self, collection: &str, id: &str) -> crate::storage::Result<()> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Documents;
                use crate::storage::StorageError;

                let stmt = Query::delete()
                    .from_table(Documents::Table)
                    .and_where(Expr::col(Documents::Collection).eq(collection))
                    .and_where(Expr::col(Documents::Id).eq(id))
                    .to_owned();

                let sql = <$db_type>::build_delete(stmt);
                let result = sqlx::query(&sql).execute(&self.pool).await?;
                if result.rows_affected() == 0 {
                    return Err(StorageError::not_found(collection, id));
                }
                Ok(())
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_document_store!(super::postgres::Postgres, "postgres");
impl_document_store!(super::sqlite::Sqlite, "sqlite");
