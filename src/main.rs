#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::anyhow;
use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::Backend;
use domain::models::BackendName;
use domain::models::Event;
use infrastructure::backends::BackendManager;
use tokio::sync::mpsc;
use tokio::task;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::application::ui::ChatExit;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::ActionsService;
use crate::domain::services::AssistantSession;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! MediConnect has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    if env::var("RUST_BACKTRACE").is_err() {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{err:?}");
    }

    process::exit(1);
}

async fn run() -> Result<()> {
    let mut session = match cli::parse().await? {
        Some(session) => session,
        None => return Ok(()),
    };
    let user = match session.user() {
        Some(user) => user.clone(),
        None => return Ok(()),
    };

    let backend_name = match BackendName::parse(Config::get(ConfigKey::Backend)) {
        Some(backend_name) => backend_name,
        None => {
            return Err(anyhow!(
                "Unknown backend {}",
                Config::get(ConfigKey::Backend)
            ))
        }
    };
    let backend: Arc<dyn Backend + Send + Sync> = Arc::from(BackendManager::get(backend_name)?);
    let assistant = AssistantSession::from_config(Arc::clone(&backend))?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(assistant, event_tx, &mut action_rx).await;
    });

    let ui_future = ui::start(backend, &user, action_tx, event_rx);

    let exit = tokio::select!(
        res = background_futures.join_next() => {
            match res {
                Some(Ok(Err(err))) => return Err(err),
                Some(Err(err)) => return Err(err.into()),
                _ => return Err(anyhow!("Assistant worker stopped unexpectedly")),
            }
        },
        res = ui_future => res?,
    );

    background_futures.abort_all();

    if exit == ChatExit::Logout {
        session.logout().await?;
        println!("Signed out of MediConnect.");
    }

    return Ok(());
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let file_appender = tracing_appender::rolling::never(Config::log_dir(), "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("mediconnect")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    if let Err(err) = run().await {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    process::exit(0);
}
