use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use dog_license::config::AppConfig;
use dog_license::error::AppError;
use dog_license::licensing::{
    license_router, ApplicationForm, JsonFileStore, LookupOutcome, LookupService, MemoryStore,
    StepController,
};
use dog_license::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Dog License Service",
    about = "Run the dog license application service from the command line",
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
    /// Walk a sample application through the four-step flow and print the
    /// issued identifier
    Demo,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
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
        Command::Demo => run_demo(),
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

    let store = Arc::new(JsonFileStore::new(config.storage.data_path.clone()));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(prometheus_layer)
        .with_state(state)
        .merge(license_router(store));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "dog license service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_demo() -> Result<(), AppError> {
    let store = Arc::new(MemoryStore::default());
    let mut controller = StepController::new(store.clone());
    *controller.form_mut() = sample_form();

    println!("Dog license application demo");
    while !controller.current_step().is_final() {
        let completed = controller.current_step();
        controller.advance()?;
        println!(
            "Step {} ({}) complete",
            completed.number(),
            completed.title()
        );
    }

    let record = controller.submit()?;
    println!("Application submitted");
    println!("  id:     {}", record.id.as_str());
    println!("  status: {}", record.status.label());
    println!("  fee:    ${}", record.fee);

    let lookup = LookupService::new(store);
    match lookup.lookup(record.id.as_str()).map_err(AppError::Store)? {
        LookupOutcome::Found(found) => {
            println!(
                "Lookup by id succeeded for {}'s dog {}",
                found.owner.first_name,
                found.dog.map(|dog| dog.name).unwrap_or_default()
            );
        }
        other => println!("Lookup did not find the record: {other:?}"),
    }

    Ok(())
}

fn sample_form() -> ApplicationForm {
    use dog_license::licensing::{DogGender, SpayNeuterStatus};

    let next_year = chrono::Local::now().date_naive() + chrono::Duration::days(365);
    ApplicationForm {
        owner_first_name: "Avery".to_string(),
        owner_last_name: "Sullivan".to_string(),
        owner_email: "avery.sullivan@example.com".to_string(),
        owner_phone: "(515) 555-0142".to_string(),
        owner_address: "1207 Walnut Street".to_string(),
        owner_city: "Des Moines".to_string(),
        owner_zip_code: "50309".to_string(),
        dog_name: "Maple".to_string(),
        dog_breed: "Golden Retriever".to_string(),
        dog_age: "4".to_string(),
        dog_gender: Some(DogGender::Female),
        dog_color: "Golden".to_string(),
        spayed_neutered: Some(SpayNeuterStatus::Yes),
        rabies_certificate_selected: true,
        rabies_certificate_preview: None,
        rabies_expiration_date: next_year.format("%Y-%m-%d").to_string(),
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
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

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
