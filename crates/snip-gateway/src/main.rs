use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use snip_core::Mailer;
use snip_gateway::cli::{Cli, MailerArg, StorageBackendArg};
use snip_gateway::{session, App, AppState, Services};
use snip_mailer::{LogMailer, SmtpConfig, SmtpMailer};
use snip_storage::{
    mysql, InMemoryPendingStore, InMemoryRepository, InMemoryUserRepository, MySqlPendingStore,
    MySqlRepository, MySqlUserRepository,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();

    snip_telemetry::init(config.log_format.into())?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        mailer = %config.mailer,
        "starting snip"
    );

    let cookie_key = session::derive_key(config.session_secret.as_bytes())?;
    let mailer = build_mailer(&config)?;

    let services = match config.storage {
        StorageBackendArg::InMemory => Services::new(
            InMemoryRepository::new(),
            InMemoryUserRepository::new(),
            InMemoryPendingStore::new(),
            mailer,
        ),
        StorageBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let pool = mysql::connect(dsn).await?;
            mysql::ensure_schema(&pool).await?;

            Services::new(
                MySqlRepository::new(pool.clone()),
                MySqlUserRepository::new(pool.clone()),
                MySqlPendingStore::new(pool),
                mailer,
            )
        }
    };

    let state = AppState::builder()
        .services(services)
        .base_url(config.public_base_url.clone())
        .cookie_key(cookie_key)
        .secure_cookies(config.secure_cookies)
        .build();

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("snip stopped");
    Ok(())
}

fn build_mailer(config: &Cli) -> anyhow::Result<Arc<dyn Mailer>> {
    match config.mailer {
        MailerArg::Log => Ok(Arc::new(LogMailer)),
        MailerArg::Smtp => {
            let smtp = SmtpConfig::builder()
                .host(config.smtp_host.clone().context("smtp host is required")?)
                .port(config.smtp_port)
                .username(
                    config
                        .smtp_username
                        .clone()
                        .context("smtp username is required")?,
                )
                .password(
                    config
                        .smtp_password
                        .clone()
                        .context("smtp password is required")?,
                )
                .from(config.mail_from.clone().context("mail sender is required")?)
                .build();
            Ok(Arc::new(SmtpMailer::new(smtp)?))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
