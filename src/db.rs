use crate::config::DatabaseConfig;
use crate::models::journal::{JournalEntry, JournalFilter, JournalPatch, NewJournalEntry};
use crate::store::{parse_id, JournalStore, StoreError};
use async_trait::async_trait;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_postgres::Row;
use tracing::{error, info, warn};

const SELECT_COLUMNS: &str = "id, title, entry, date";

/// PostgreSQL への接続プールを握るストア実装。
/// Deadpool の `Pool` を内部に保持し、`JournalStore` の各操作を SQL に落とし込む。
#[derive(Clone)]
pub struct Database {
    pool: Pool,
    /// Set once the schema has been created on a live connection.
    schema: Arc<OnceCell<()>>,
}

impl Database {
    /// 接続プールを構築する。Deadpool は遅延接続なので、ここでは DB に触れない。
    /// スキーマは最初に接続が取れたときに一度だけ作成されるため、
    /// 起動時に DB が落ちていても、復帰後のリクエストはそのまま成功する。
    pub fn new(config: DatabaseConfig) -> Result<Self, StoreError> {
        info!("Creating PostgreSQL connection pool for host: {}:{}", config.host, config.port);

        let pool = Self::create_pool(config)?;
        Ok(Database {
            pool,
            schema: Arc::new(OnceCell::new()),
        })
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, StoreError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);

        pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
            "disable" => deadpool_postgres::SslMode::Disable,
            "prefer" => deadpool_postgres::SslMode::Prefer,
            "require" => deadpool_postgres::SslMode::Require,
            other => {
                warn!("Unknown SSL mode '{}', defaulting to 'prefer'", other);
                deadpool_postgres::SslMode::Prefer
            }
        });

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });
        pg_config.pool = Some(deadpool_postgres::PoolConfig::new(config.max_connections as usize));

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            StoreError::Unavailable(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            StoreError::Unavailable(format!("Connection pool creation failed: {}", e))
        })
    }

    /// プールから接続を借り、未作成ならスキーマを作ってから返す。
    /// 接続やマイグレーションに失敗した場合は `OnceCell` が空のまま残り、次の呼び出しで再試行される。
    async fn get_connection(&self) -> Result<Object, StoreError> {
        let client = self.pool.get().await?;
        self.schema
            .get_or_try_init(|| Self::migrate(&client))
            .await?;
        Ok(client)
    }

    /// True once `journal_entries` is known to exist.
    pub fn schema_ready(&self) -> bool {
        self.schema.initialized()
    }

    /// `journal_entries` テーブルを冪等に作成する。
    /// title / entry の必須制約は CHECK で表現し、空文字も拒否する。
    async fn migrate(client: &Object) -> Result<(), StoreError> {
        info!("Running database migrations");

        let journal_table = r#"
            CREATE TABLE IF NOT EXISTS journal_entries (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL CHECK (title <> ''),
                entry TEXT NOT NULL CHECK (entry <> ''),
                date TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;
        client.execute(journal_table, &[]).await.map_err(|e| {
            error!("Failed to create journal_entries table: {}", e);
            StoreError::from(e)
        })?;

        let date_index = "CREATE INDEX IF NOT EXISTS idx_journal_entries_date ON journal_entries(date)";
        client.execute(date_index, &[]).await.map_err(|e| {
            error!("Failed to create journal_entries date index: {}", e);
            StoreError::from(e)
        })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    fn row_to_entry(row: &Row) -> JournalEntry {
        JournalEntry {
            id: row.get(0),
            title: row.get(1),
            entry: row.get(2),
            date: row.get(3),
        }
    }
}

/// Escape LIKE metacharacters so the needle matches literally.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl JournalStore for Database {
    async fn insert(&self, new_entry: NewJournalEntry) -> Result<JournalEntry, StoreError> {
        let (title, entry) = new_entry.require_fields()?;
        let journal = JournalEntry::new(title, entry);
        let client = self.get_connection().await?;

        let query = format!(
            "INSERT INTO journal_entries (id, title, entry, date) VALUES ($1, $2, $3, $4) RETURNING {}",
            SELECT_COLUMNS
        );
        let row = client
            .query_one(query.as_str(), &[&journal.id, &journal.title, &journal.entry, &journal.date])
            .await?;

        let created = Self::row_to_entry(&row);
        info!("Created journal entry with id: {}", created.id);
        Ok(created)
    }

    /// 挿入順 (= date 昇順) で返す。
    /// フィルタ指定時は title と entry の両方に対して ILIKE で部分一致を取る。
    async fn find(&self, filter: &JournalFilter) -> Result<Vec<JournalEntry>, StoreError> {
        let client = self.get_connection().await?;

        let rows = match filter {
            JournalFilter::All => {
                let query = format!("SELECT {} FROM journal_entries ORDER BY date, id", SELECT_COLUMNS);
                client.query(query.as_str(), &[]).await?
            }
            JournalFilter::Contains(needle) => {
                let pattern = like_pattern(needle);
                let query = format!(
                    "SELECT {} FROM journal_entries WHERE title ILIKE $1 OR entry ILIKE $1 ORDER BY date, id",
                    SELECT_COLUMNS
                );
                client.query(query.as_str(), &[&pattern]).await?
            }
        };

        Ok(rows.iter().map(Self::row_to_entry).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<JournalEntry>, StoreError> {
        let uuid = parse_id(id)?;
        let client = self.get_connection().await?;

        let query = format!("SELECT {} FROM journal_entries WHERE id = $1", SELECT_COLUMNS);
        let row = client.query_opt(query.as_str(), &[&uuid]).await?;

        Ok(row.as_ref().map(Self::row_to_entry))
    }

    /// `COALESCE` で None のフィールドは現在値を維持する。date は更新しない。
    async fn update_by_id(
        &self,
        id: &str,
        patch: JournalPatch,
    ) -> Result<Option<JournalEntry>, StoreError> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let uuid = parse_id(id)?;
        let client = self.get_connection().await?;

        let query = format!(
            "UPDATE journal_entries SET title = COALESCE($1, title), entry = COALESCE($2, entry) \
             WHERE id = $3 RETURNING {}",
            SELECT_COLUMNS
        );
        let row = client
            .query_opt(query.as_str(), &[&patch.title, &patch.entry, &uuid])
            .await?;

        if row.is_some() {
            info!("Updated journal entry with id: {}", uuid);
        }
        Ok(row.as_ref().map(Self::row_to_entry))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<JournalEntry>, StoreError> {
        let uuid = parse_id(id)?;
        let client = self.get_connection().await?;

        let query = format!("DELETE FROM journal_entries WHERE id = $1 RETURNING {}", SELECT_COLUMNS);
        let row = client.query_opt(query.as_str(), &[&uuid]).await?;

        if row.is_some() {
            info!("Deleted journal entry with id: {}", uuid);
        }
        Ok(row.as_ref().map(Self::row_to_entry))
    }

    /// `SELECT 1` を投げて DB が生きているか確認する。
    async fn ping(&self) -> Result<(), StoreError> {
        let client = self.get_connection().await?;
        client.execute("SELECT 1", &[]).await?;
        Ok(())
    }
}
