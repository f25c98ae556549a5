use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;

use crate::{auth_jwt::TokenKeys, config::ApiConfig};

pub type AppState = Arc<State>;

pub struct State {
    pub config: ApiConfig,
    pub db: DatabaseConnection,
    pub tokens: TokenKeys,
}

impl State {
    /// Opens the connection pool described by `config.database`.
    pub async fn new(config: ApiConfig) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(config.database.url.to_owned());
        opt.max_connections(config.database.max_connections)
            .min_connections(1)
            .connect_timeout(config.database.connect_timeout)
            .sqlx_logging(false);

        let db = Database::connect(opt).await?;
        tracing::info!(
            max_connections = config.database.max_connections,
            "Connected to database"
        );

        Ok(Self::with_connection(config, db))
    }

    /// Wraps an already opened connection.
    pub fn with_connection(config: ApiConfig, db: DatabaseConnection) -> Self {
        let tokens = TokenKeys::new(&config.jwt);
        Self { config, db, tokens }
    }
}
