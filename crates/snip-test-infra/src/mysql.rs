use std::time::Duration;

use crate::{Result, TestInfraError};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;

/// Settings for a throwaway MySQL server.
///
/// The log line `ready for connections` shows up before the server accepts
/// clients on the mapped port, so [`MySqlServer::pool`] keeps dialing for
/// up to `connect_attempts * retry_interval`.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "8.4".to_string(), setter(into))]
    image_tag: String,
    #[builder(default = "snip".to_string(), setter(into))]
    database: String,
    #[builder(default = "snip".to_string(), setter(into))]
    username: String,
    #[builder(default = "snip".to_string(), setter(into))]
    password: String,
    #[builder(default = 8)]
    max_connections: u32,
    #[builder(default = 20)]
    connect_attempts: u32,
    #[builder(default = Duration::from_millis(500))]
    retry_interval: Duration,
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A MySQL container that lives as long as this value.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
}

impl MySqlServer {
    /// Starts a server with [`MysqlConfig::default`].
    pub async fn start() -> Result<Self> {
        Self::new(MysqlConfig::default()).await
    }

    pub async fn new(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new("mysql", config.image_tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.username.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_ROOT_PASSWORD", "root")
            .start()
            .await?;

        Ok(Self { container, config })
    }

    /// DSN for the test database, as accepted by sqlx.
    pub async fn database_url(&self) -> Result<String> {
        let host = self.container.get_host().await?;
        let port = self.container.get_host_port_ipv4(MYSQL_PORT).await?;
        Ok(format!(
            "mysql://{}:{}@{}:{}/{}",
            self.config.username, self.config.password, host, port, self.config.database
        ))
    }

    /// Opens a pool once the server accepts connections.
    pub async fn pool(&self) -> Result<MySqlPool> {
        let url = self.database_url().await?;
        let attempts = self.config.connect_attempts.max(1);
        let mut attempt = 1;

        loop {
            let connected = MySqlPoolOptions::new()
                .max_connections(self.config.max_connections)
                .connect(&url)
                .await;

            match connected {
                Ok(pool) => return Ok(pool),
                Err(source) if attempt >= attempts => {
                    return Err(TestInfraError::NotReady { attempts, source })
                }
                Err(_) => {
                    attempt += 1;
                    tokio::time::sleep(self.config.retry_interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_only_what_it_is_given() {
        let config = MysqlConfig::builder()
            .database("links")
            .connect_attempts(3)
            .build();

        assert_eq!(config.database, "links");
        assert_eq!(config.username, "snip");
        assert_eq!(config.image_tag, "8.4");
        assert_eq!(config.connect_attempts, 3);
        assert_eq!(config.retry_interval, Duration::from_millis(500));
    }
}
