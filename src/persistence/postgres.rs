//! PostgreSQL implementation of the history store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::{HISTORY_COLUMNS, HistoryRow, into_history_event};
use super::{HistoryStore, like_pattern};
use crate::domain::{HistoryPage, HistoryQuery, NewHistoryEvent, Region};
use crate::error::GatewayError;

/// Rows per `INSERT`; eight binds each stays well under the 65 535 limit.
const INSERT_CHUNK: usize = 1_000;

/// Shared filter of the page and count queries; `$1` region, `$2` pattern,
/// `$3` event type.
const FILTER: &str = "WHERE region = $1 \
     AND ($2::text IS NULL OR title ILIKE $2 ESCAPE '\\') \
     AND ($3::text IS NULL OR event_type = $3)";

/// PostgreSQL-backed history store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresHistoryStore {
    pool: PgPool,
}

impl PostgresHistoryStore {
    /// Creates a new store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }
}

#[async_trait]
impl HistoryStore for PostgresHistoryStore {
    async fn insert_ignoring_duplicates(
        &self,
        entries: &[NewHistoryEvent],
    ) -> Result<u64, GatewayError> {
        let mut inserted = 0;
        for chunk in entries.chunks(INSERT_CHUNK) {
            let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO event_history \
                 (region, title, banner, start_date, end_date, details, link, event_type) ",
            );
            qb.push_values(chunk, |mut row, e| {
                row.push_bind(e.region.code())
                    .push_bind(e.title.as_str())
                    .push_bind(e.banner.as_str())
                    .push_bind(e.start_date.as_str())
                    .push_bind(e.end_date.as_str())
                    .push_bind(e.details.as_deref())
                    .push_bind(e.link.as_deref())
                    .push_bind(e.event_type.as_str());
            });
            qb.push(" ON CONFLICT (region, title, banner, start_date, end_date) DO NOTHING");

            let result = qb
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    async fn page(
        &self,
        region: Region,
        query: &HistoryQuery,
    ) -> Result<HistoryPage, GatewayError> {
        let pattern = query.search.as_deref().map(like_pattern);
        let kind = query.event_type.kind().map(|k| k.as_str());

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM event_history {FILTER}"
        ))
        .bind(region.code())
        .bind(pattern.as_deref())
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        let rows = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM event_history {FILTER} \
             ORDER BY removed_at DESC, seq DESC LIMIT $4 OFFSET $5"
        ))
        .bind(region.code())
        .bind(pattern.as_deref())
        .bind(kind)
        .bind(i64::from(query.page_size))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        let data = rows
            .into_iter()
            .map(into_history_event)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HistoryPage::new(
            data,
            query,
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn count(&self, region: Region) -> Result<u64, GatewayError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM event_history WHERE region = $1")
                .bind(region.code())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

/// These run against the database named by `DATABASE_URL` and return early
/// when it is unset. Each test migrates into its own throwaway schema.
#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use sqlx::Executor;
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::domain::{EventKind, HistoryTypeFilter};

    struct Scratch {
        pool: PgPool,
        schema: String,
        store: PostgresHistoryStore,
    }

    impl Scratch {
        async fn open() -> Option<Self> {
            let Ok(url) = std::env::var("DATABASE_URL") else {
                return None;
            };
            let schema = format!("history_test_{}", uuid::Uuid::new_v4().simple());
            let search_path = schema.clone();
            let Ok(pool) = PgPoolOptions::new()
                .max_connections(1)
                .after_connect(move |conn, _meta| {
                    let sql = format!(
                        "CREATE SCHEMA IF NOT EXISTS {search_path}; SET search_path TO {search_path}"
                    );
                    Box::pin(async move {
                        conn.execute(sql.as_str()).await?;
                        Ok(())
                    })
                })
                .connect(&url)
                .await
            else {
                panic!("connect to {url}");
            };
            let store = PostgresHistoryStore::new(pool.clone());
            if let Err(err) = store.migrate().await {
                panic!("migrate: {err}");
            }
            Some(Self {
                pool,
                schema,
                store,
            })
        }

        async fn close(self) {
            let _ = sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
                .execute(&self.pool)
                .await;
        }
    }

    fn entry(title: &str, kind: EventKind) -> NewHistoryEvent {
        NewHistoryEvent {
            region: Region::Sg,
            title: title.to_string(),
            banner: format!("https://cdn/{title}.jpg"),
            start_date: "2026-01-01".to_string(),
            end_date: "2026-01-02".to_string(),
            details: None,
            link: None,
            event_type: kind,
        }
    }

    fn batch_of_25() -> Vec<NewHistoryEvent> {
        (1..=25)
            .map(|i| entry(&format!("E{i:02}"), EventKind::Event))
            .collect()
    }

    #[tokio::test]
    async fn conflicting_rows_are_skipped() {
        let Some(db) = Scratch::open().await else {
            return;
        };
        let batch = batch_of_25();

        assert_eq!(db.store.insert_ignoring_duplicates(&batch).await.ok(), Some(25));
        assert_eq!(db.store.insert_ignoring_duplicates(&batch).await.ok(), Some(0));
        assert_eq!(db.store.count(Region::Sg).await.ok(), Some(25));

        let twice = entry("Twice", EventKind::Update);
        let inserted = db
            .store
            .insert_ignoring_duplicates(&[twice.clone(), twice])
            .await;
        assert_eq!(inserted.ok(), Some(1));
        assert_eq!(db.store.count(Region::Th).await.ok(), Some(0));

        db.close().await;
    }

    #[tokio::test]
    async fn second_page_keeps_insertion_order_within_a_batch() {
        let Some(db) = Scratch::open().await else {
            return;
        };
        let _ = db.store.insert_ignoring_duplicates(&batch_of_25()).await;

        let query = HistoryQuery::new(2, 12, None, HistoryTypeFilter::All);
        let Ok(page) = db.store.page(Region::Sg, &query).await else {
            panic!("page should load");
        };
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        let titles: Vec<&str> = page.data.iter().map(|r| r.title.as_str()).collect();
        let expected: Vec<String> = (2..=13).rev().map(|i| format!("E{i:02}")).collect();
        assert_eq!(titles, expected);

        db.close().await;
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let Some(db) = Scratch::open().await else {
            return;
        };
        let _ = db
            .store
            .insert_ignoring_duplicates(&[
                entry("50%_off", EventKind::Event),
                entry("500 off", EventKind::Event),
                entry("50 percent", EventKind::Update),
            ])
            .await;

        let query = HistoryQuery::new(1, 12, Some("50%_"), HistoryTypeFilter::All);
        let Ok(page) = db.store.page(Region::Sg, &query).await else {
            panic!("page should load");
        };
        assert_eq!(page.total, 1);
        assert_eq!(page.data.first().map(|r| r.title.as_str()), Some("50%_off"));

        let query = HistoryQuery::new(1, 12, Some("50"), HistoryTypeFilter::Update);
        let Ok(page) = db.store.page(Region::Sg, &query).await else {
            panic!("page should load");
        };
        assert_eq!(page.total, 1);
        assert_eq!(page.data.first().map(|r| r.title.as_str()), Some("50 percent"));

        db.close().await;
    }
}
