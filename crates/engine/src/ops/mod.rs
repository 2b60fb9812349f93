use sea_orm::DatabaseConnection;

use crate::{
    ResultEngine,
    cache::{DEFAULT_USER_CACHE_CAPACITY, UserCache},
};

mod categories;
mod entries;
mod reports;
mod users;

pub use reports::Balance;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Repository access over the finance tables.
///
/// Cloning is cheap: clones share the database pool and the user cache.
#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
    users: UserCache,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    user_cache_capacity: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            user_cache_capacity: DEFAULT_USER_CACHE_CAPACITY,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Maximum number of users kept in the lookup cache. `0` disables it.
    pub fn user_cache_capacity(mut self, capacity: usize) -> EngineBuilder {
        self.user_cache_capacity = capacity;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        tracing::debug!(
            user_cache_capacity = self.user_cache_capacity,
            "building engine"
        );
        Ok(Engine {
            database: self.database,
            users: UserCache::new(self.user_cache_capacity),
        })
    }
}
