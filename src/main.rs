use std::fmt::{Debug, Display};

use colored::*;
use tokio::task::JoinError;
use vidstream::core::{get_subscriber, init_subscriber, AppConfig};
use vidstream::vidstream_web_server::VidstreamServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_dir =
        std::env::var("VIDSTREAM_LOG_DIR").unwrap_or_else(|_| "/var/tmp/log/vidstream".into());
    let file_appender = tracing_appender::rolling::daily(log_dir, "app");

    let subscriber = get_subscriber("vidstream".into(), "info".into(), file_appender);
    init_subscriber(subscriber);

    let config = AppConfig::new()?;

    let server = VidstreamServer::build(config.clone()).await?;
    let port = server.port();
    let server_task = tokio::spawn(server.run_until_stopped());

    println!("{}", "-----------------------------------------".green());
    println!(
        "🚀 Server started on Addr: {}:{}",
        config.vidstream_server_config.host, port
    );
    println!("{}", "-----------------------------------------".green());

    tokio::select! {
        outcome = server_task => report_exit("HTTP server", outcome),
    }
    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            )
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{}' task failed to complete",
                task_name
            )
        }
    }
}
