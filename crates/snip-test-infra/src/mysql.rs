use crate::Result;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "8.4".to_string(), setter(into))]
    tag: String,
    #[builder(default = "snip".to_string(), setter(into))]
    database: String,
    #[builder(default = "snip".to_string(), setter(into))]
    credential: String,
    /// The server logs "ready" before it accepts TCP clients, so the first
    /// connections are retried.
    #[builder(default = 20)]
    connect_attempts: u32,
}

/// A throwaway MySQL server with a connected pool.
///
/// The container is removed when the server is dropped.
pub struct MySqlServer {
    _container: ContainerAsync<GenericImage>,
    pool: MySqlPool,
    url: String,
}

impl MySqlServer {
    pub async fn start(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new("mysql", config.tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.credential.as_str())
            .with_env_var("MYSQL_PASSWORD", config.credential.as_str())
            .with_env_var("MYSQL_ROOT_PASSWORD", "root")
            .start()
            .await?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(MYSQL_PORT).await?;
        let url = format!(
            "mysql://{user}:{user}@{host}:{port}/{db}",
            user = config.credential,
            db = config.database,
        );
        let pool = connect(&url, config.connect_attempts).await?;

        Ok(Self {
            _container: container,
            pool,
            url,
        })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn database_url(&self) -> &str {
        &self.url
    }
}

async fn connect(url: &str, attempts: u32) -> Result<MySqlPool> {
    let mut attempt = 1;
    loop {
        match MySqlPoolOptions::new().max_connections(5).connect(url).await {
            Ok(pool) => return Ok(pool),
            Err(_) if attempt < attempts => {
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
