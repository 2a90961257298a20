use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use talentboard::ats::{FixtureAts, FixtureSeed, RoleId};
use talentboard::config::AppConfig;
use talentboard::error::AppError;
use talentboard::pipeline::{board_router, BoardService, BoardSession, BoardSnapshot};
use talentboard::telemetry;
use tracing::info;

#[derive(Clone)]
struct ServeState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Talent Pipeline Board",
    about = "Serve and inspect recruiter pipeline boards mirrored from an applicant tracking service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect board state without starting a server
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// JSON seed for the fixture ATS (defaults to BOARD_FIXTURE, then the built-in sample)
    #[arg(long)]
    fixture: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    /// Render one role's board as columns of candidate cards
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Role whose board to render
    #[arg(long)]
    role_id: String,
    /// JSON seed for the fixture ATS (defaults to the built-in sample)
    #[arg(long)]
    fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Board {
            command: BoardCommand::Snapshot(args),
        } => run_board_snapshot(args).await,
    }
}

fn load_fixture(path: Option<PathBuf>) -> Result<FixtureAts, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let seed: FixtureSeed = serde_json::from_str(&raw)?;
            Ok(FixtureAts::from_seed(seed))
        }
        None => Ok(FixtureAts::sample()),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let fixture_path = args.fixture.take().or(config.fixture_path.clone());
    let client = Arc::new(load_fixture(fixture_path)?);
    let offered_roles = offered_roles(&client).await?;
    let service = Arc::new(BoardService::new(client, offered_roles));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = ServeState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(board_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "pipeline board service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_board_snapshot(args: SnapshotArgs) -> Result<(), AppError> {
    let client = Arc::new(load_fixture(args.fixture)?);
    let session = BoardSession::open(client, RoleId(args.role_id)).await?;
    render_board_snapshot(&session.snapshot());
    Ok(())
}

/// The demo candidate dashboard offers every role the fixture knows about.
async fn offered_roles(client: &FixtureAts) -> Result<Vec<RoleId>, AppError> {
    Ok(client.role_ids())
}

fn render_board_snapshot(snapshot: &BoardSnapshot) {
    println!("Pipeline board for role {}", snapshot.role_id);
    for column in &snapshot.columns {
        println!("\n{} ({})", column.name, column.cards.len());
        for card in &column.cards {
            println!(
                "- {} [candidate {}, application {}]",
                card.display_name, card.candidate_id, card.application_id
            );
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<ServeState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<ServeState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_fixture_renders_a_full_board() {
        let client = Arc::new(FixtureAts::sample());
        let session = BoardSession::open(client, RoleId("role-swe".to_string()))
            .await
            .expect("sample board opens");

        let snapshot = session.snapshot();
        let names: Vec<&str> = snapshot
            .columns
            .iter()
            .map(|column| column.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Applied",
                "Phone Screen",
                "Onsite",
                "Offer",
                "Rejected",
                "Unknown"
            ]
        );
    }
}
