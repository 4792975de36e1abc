use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use city_sim::content::GameConfig;
use city_sim::db::{migrate, save_snapshot};
use city_sim::ecs::{WorldConfig, WorldDeps, build_world_app, run_world_loop};
use city_sim::flush::{flush_to_jsonl, load_from_jsonl};
use city_sim::notify::TracingNotifier;
use city_sim::sim::SystemClock;
use city_sim::store::{self, MemoryStore};
use city_sim::WorldHandle;

/// Run the world tick loop until Ctrl-C.
#[derive(Debug, Parser)]
#[command(name = "world_server", version)]
struct Args {
    /// Game content JSON. Defaults to the embedded standard content.
    #[arg(long)]
    content: Option<PathBuf>,

    /// World seed for every per-domain RNG.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the content's tick length in seconds.
    #[arg(long)]
    tick_seconds: Option<u64>,

    /// Resume from a JSONL checkpoint directory.
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Checkpoint directory.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Checkpoint every N ticks (0 = only on shutdown).
    #[arg(long, default_value_t = 0)]
    flush_every: u64,

    /// Players to found on startup if they do not exist yet.
    #[arg(long = "player")]
    players: Vec<String>,

    /// Also save the final state to Postgres.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut content = match &args.content {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::standard(),
    };
    if let Some(secs) = args.tick_seconds {
        content.tick.tick_seconds = secs;
        content.validate()?;
    }
    let tick_seconds = content.tick.tick_seconds;

    let memory = match &args.resume {
        Some(dir) => {
            let snapshot = load_from_jsonl(dir)?;
            info!(
                category = "WORLD",
                dir = %dir.display(),
                entities = snapshot.entities.len(),
                "resuming from checkpoint"
            );
            MemoryStore::from_snapshot(snapshot)
        }
        None => MemoryStore::new(),
    };

    let deps = WorldDeps {
        store: store::shared(memory),
        content: Arc::new(content),
        clock: Arc::new(SystemClock),
        notifier: Arc::new(TracingNotifier),
        events: Default::default(),
    };

    let handle = WorldHandle::new(&deps, args.seed.wrapping_add(1));
    for name in &args.players {
        let id = handle.join(name);
        info!(category = "WORLD", entity = id, name = %name, "player ready");
    }

    let config = WorldConfig {
        seed: args.seed,
        flush_every: args.flush_every,
        output_dir: Some(args.output_dir.clone()),
    };
    let mut app = build_world_app(deps.clone(), config);

    info!(
        category = "WORLD",
        seed = args.seed,
        tick_seconds,
        "world server ready"
    );

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(category = "WORLD", error = %err, "ctrl-c handler failed");
        }
    };
    let ticks = run_world_loop(&mut app, Duration::from_secs(tick_seconds), shutdown).await;

    let snapshot = deps.store.lock().snapshot();
    flush_to_jsonl(&snapshot, &args.output_dir)?;
    info!(
        category = "WORLD",
        ticks,
        dir = %args.output_dir.display(),
        "final checkpoint written"
    );

    if let Some(url) = &args.database_url {
        let pool = sqlx::PgPool::connect(url).await?;
        migrate(&pool).await?;
        save_snapshot(&pool, &snapshot).await?;
        info!(category = "WORLD", "saved to postgres");
    }

    Ok(())
}
