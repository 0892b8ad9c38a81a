use std::path::{Path, PathBuf};
use std::sync::Arc;

use learn_core::model::{BookmarkableEntity, CategoryNode, ProgressRecord};
use services::bookmark::BookmarkToggle;
use services::{
    ApiClient, ApiConfig, CategoryProgressSource, HttpBookmarkService, HttpProgressSource,
    NavigationHistory, ProgressDashboardService, StaticProgressSource, ToggleOutcome,
};
use storage::FileSessionStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;

use args::{
    BookmarkAction, Command, DEFAULT_SESSION_FILE, NavAction, ProgressInput, SESSION_FILE_VAR,
};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let data = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("{}: {err}", path.display()))?;
    let value = serde_json::from_str(&data).map_err(|err| format!("{}: {err}", path.display()))?;
    Ok(value)
}

async fn run_progress(input: ProgressInput) -> AppResult<()> {
    let source: Arc<dyn CategoryProgressSource> = match input {
        ProgressInput::Files { tree, records } => {
            let tree: CategoryNode = read_json(&tree).await?;
            let records: Vec<ProgressRecord> = read_json(&records).await?;
            Arc::new(StaticProgressSource::new(tree, records))
        }
        ProgressInput::Remote => {
            let api = ApiClient::new(ApiConfig::from_env()?)?;
            Arc::new(HttpProgressSource::new(api))
        }
    };

    let annotated = ProgressDashboardService::new(source).load().await?;

    annotated.walk(&mut |depth, progress| {
        println!(
            "{:indent$}{}  {}/{} studied ({}%)  mastery {:.2}",
            "",
            progress.category_code,
            progress.studied_cards,
            progress.total_cards,
            progress.progress_percent(),
            progress.mastery_rate,
            indent = depth * 2,
        );
    });
    Ok(())
}

async fn run_nav(session: PathBuf, action: NavAction) -> AppResult<()> {
    let history = NavigationHistory::new(Arc::new(FileSessionStore::new(session)));
    match action {
        NavAction::Push(path) => {
            history.push(&path).await;
            tracing::debug!(%path, "visit recorded");
        }
        NavAction::Back(current) => match history.pop_previous(&current).await {
            Some(previous) => println!("{previous}"),
            None => println!("(no previous page)"),
        },
        NavAction::Show => {
            for entry in history.entries().await {
                println!("{entry}");
            }
        }
        NavAction::Clear => history.clear().await,
    }
    Ok(())
}

async fn run_bookmark(
    action: BookmarkAction,
    entity: BookmarkableEntity,
    initial: Option<bool>,
) -> AppResult<()> {
    let api = ApiClient::new(ApiConfig::from_env()?)?;
    let service = Arc::new(HttpBookmarkService::new(api));
    let toggle = BookmarkToggle::new(service, entity).on_toggled(move |bookmarked| {
        tracing::info!(card = %entity.id, kind = %entity.kind, bookmarked, "bookmark confirmed");
    });
    let _mounted = toggle.guard();

    let state = toggle.initialize(initial).await;
    match action {
        BookmarkAction::Status => println!("bookmarked: {}", state.is_bookmarked),
        BookmarkAction::Toggle => match toggle.toggle().await {
            ToggleOutcome::Confirmed(value) => println!("bookmarked: {value}"),
            ToggleOutcome::RolledBack(value) => {
                println!("bookmarked: {value} (change not saved)");
            }
            ToggleOutcome::Ignored | ToggleOutcome::Discarded => {
                println!("bookmarked: {}", toggle.state().is_bookmarked);
            }
        },
    }
    Ok(())
}

async fn run() -> AppResult<()> {
    let session_default = std::env::var(SESSION_FILE_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

    let command = Command::parse(std::env::args().skip(1), session_default).map_err(|e| {
        eprintln!("{e}");
        args::print_usage();
        e
    })?;

    match command {
        Command::Help => {
            args::print_usage();
            Ok(())
        }
        Command::Progress(input) => run_progress(input).await,
        Command::Nav { session, action } => run_nav(session, action).await,
        Command::Bookmark {
            action,
            entity,
            initial,
        } => run_bookmark(action, entity, initial).await,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
