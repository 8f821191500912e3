use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tourney_directory::application::admin::AdminService;
use tourney_directory::application::player::PlayerService;
use tourney_directory::application::store::TournamentStore;
use tourney_directory::domain::ports::KvStoreBox;
use tourney_directory::infrastructure::in_memory::InMemoryKvStore;
use tourney_directory::interfaces::jsonl::Router;
use tourney_directory::interfaces::jsonl::request_reader::RequestReader;
use tourney_directory::interfaces::jsonl::response_writer::ResponseWriter;
use tourney_directory::telemetry;

/// One year.
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Request file, one JSON request per line. Use `-` for stdin.
    input: PathBuf,

    /// Redis server to keep tournaments in. Without it an in-memory store is used.
    #[arg(long, env = "TOURNEY_REDIS_URL")]
    redis_url: Option<String>,

    /// Seconds a tournament stays listed without a refresh.
    #[arg(
        long,
        env = "TOURNEY_TTL_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TTL_SECS)
    )]
    ttl_secs: u64,
}

async fn open_kv_store(cli: &Cli) -> Result<KvStoreBox> {
    #[cfg(feature = "storage-redis")]
    if let Some(url) = &cli.redis_url {
        use tourney_directory::infrastructure::redis::RedisKvStore;
        let store = RedisKvStore::connect(url).await.into_diagnostic()?;
        return Ok(Box::new(store));
    }

    #[cfg(not(feature = "storage-redis"))]
    if cli.redis_url.is_some() {
        eprintln!(
            "WARNING: Redis storage requested via --redis-url, but 'storage-redis' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    Ok(Box::new(InMemoryKvStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    telemetry::install_panic_hook();

    let cli = Cli::parse();

    let kv = open_kv_store(&cli).await?;
    let store = Arc::new(TournamentStore::with_ttl(kv, Duration::from_secs(cli.ttl_secs)));
    let player = PlayerService::new(store.clone());
    let admin = AdminService::new(store.clone());
    tracing::info!(
        player = ?player.dispatcher().registered_types(),
        admin = ?admin.dispatcher().registered_types(),
        ttl_secs = store.ttl().as_secs(),
        "Tournament directory ready"
    );
    let router = Router::new(player, admin);

    let source: Box<dyn BufRead> = if cli.input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(&cli.input).into_diagnostic()?))
    };

    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());
    for request in RequestReader::new(source).requests() {
        match request {
            Ok(request) => {
                let response = router.route(&request).await;
                writer.write(&response).into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("Error reading request: {}", e);
            }
        }
    }
    writer.flush().into_diagnostic()?;

    Ok(())
}
