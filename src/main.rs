use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;

use anonproxies::utils::humanize_age;
use anonproxies::{Error, Protocol, ProxyEngine, Settings};

/// Collects public proxy links and hands them out through a Telegram bot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-fetch every source and overwrite the cache
    Refresh,
    /// Print the entries of one protocol, one per line
    List {
        /// vless, vmess, trojan, shadowsocks, socks5, mtproto or an alias
        protocol: Protocol,
        /// Print at most this many entries (0 = all)
        #[arg(short, long, default_value_t = 0)]
        limit: usize,
        /// Shuffle before cutting to the limit
        #[arg(short, long)]
        shuffle: bool,
    },
    /// Print how long ago the cache was written
    Age,
    /// Run the Telegram bot
    #[cfg(feature = "telegram")]
    Bot,
}

/// Log a fatal error and terminate.
fn die(e: Error) -> ! {
    error!("{}", e);
    process::exit(1)
}

fn main() {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref()).unwrap_or_else(|e| {
        env_logger::init_from_env(Env::default().default_filter_or("info"));
        die(e)
    });

    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));

    let fetcher = settings.fetcher().unwrap_or_else(|e| die(e));
    let engine = ProxyEngine::new(settings.engine_config(), fetcher);

    match args.command {
        Commands::Refresh => match engine.refresh() {
            Ok(true) => {}
            Ok(false) => process::exit(1),
            Err(e) => die(e),
        },
        Commands::List {
            protocol,
            limit,
            shuffle,
        } => {
            let mut entries = engine.query(protocol).unwrap_or_else(|e| die(e));
            if shuffle {
                use rand::seq::SliceRandom;
                entries.shuffle(&mut rand::thread_rng());
            }
            if limit > 0 {
                entries.truncate(limit);
            }
            for entry in entries {
                println!("{}", entry);
            }
        }
        Commands::Age => {
            let age = engine.cache_age().unwrap_or_else(|e| die(e));
            println!("{}", humanize_age(age));
        }
        #[cfg(feature = "telegram")]
        Commands::Bot => run_bot(engine, settings),
    }
}

#[cfg(feature = "telegram")]
fn run_bot(engine: ProxyEngine<anonproxies::utils::HttpFetcher>, settings: Settings) {
    use log::info;
    use std::sync::Arc;

    let engine = Arc::new(engine);
    info!(
        "Serving {} protocols, {} entries per command",
        Protocol::ALL.len(),
        settings.delivery.limit
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| die(Error::Config(format!("Failed to create tokio runtime: {}", e))));

    let outcome = runtime.block_on(anonproxies::bot::telegram::run(
        Arc::clone(&engine),
        settings.telegram,
        settings.delivery,
    ));
    drop(runtime);

    // the blocking HTTP client is dropped here, outside the runtime
    drop(engine);

    if let Err(e) = outcome {
        die(e);
    }
}
