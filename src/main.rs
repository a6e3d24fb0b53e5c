//! Binary entrypoint for the signshop CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `check <material> <buy> <sell> <owner>` - validate four sign lines and print a JSON verdict
//! - `materials` - list configured currencies, aliases and custom names
//!
//! See the library crate docs for module‑level details: `signshop::`.
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use serde::Serialize;

use signshop::config::Config;
use signshop::context::ShopContext;
use signshop::logutil::sign_text;
use signshop::shop::{Rate, Shop, ShopError};

#[derive(Parser)]
#[command(name = "signshop")]
#[command(about = "Sign and container shops: validate sign text and inspect shop configuration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Validate the four lines of a shop sign
    Check {
        /// Line 1: traded item
        material: String,
        /// Line 2: buy rate
        buy: String,
        /// Line 3: sell rate
        sell: String,
        /// Line 4: owner or server-shop marker
        #[arg(default_value = "")]
        owner: String,
    },
    /// List currencies, aliases and custom item names
    Materials,
}

#[derive(Serialize)]
struct RateView {
    amount: u32,
    price: u32,
    currency: String,
}

impl RateView {
    fn new(rate: &Rate, ctx: &ShopContext) -> Self {
        Self {
            amount: rate.amount(),
            price: rate.price(),
            currency: ctx.materials().display_name(rate.currency()),
        }
    }
}

#[derive(Serialize)]
struct Verdict {
    valid: bool,
    /// Valid shape but no owner yet; sign creation would fill it in.
    needs_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
    server_shop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    buy: Option<RateView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sell: Option<RateView>,
}

fn check(ctx: &ShopContext, lines: [String; 4]) -> Verdict {
    debug!("Checking sign {}", sign_text(&lines));
    match Shop::from_lines(&lines, ctx) {
        Ok(shop) => Verdict {
            valid: true,
            needs_owner: false,
            error: None,
            material: Some(ctx.materials().display_name(shop.material())),
            owner: Some(shop.owner().to_string()),
            server_shop: ctx.is_server_marker(shop.owner()),
            buy: shop.buy_rate().map(|r| RateView::new(r, ctx)),
            sell: shop.sell_rate().map(|r| RateView::new(r, ctx)),
        },
        Err(e) => Verdict {
            valid: false,
            needs_owner: matches!(e, ShopError::InvalidSignOwner),
            error: Some(e.to_string()),
            material: None,
            owner: None,
            server_shop: false,
            buy: None,
            sell: None,
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        if Path::new(&cli.config).exists() {
            warn!("Configuration file {} already exists; leaving it unchanged", cli.config);
            return Ok(());
        }
        Config::create_default(&cli.config).await?;
        println!("Created default configuration in {}", cli.config);
        return Ok(());
    }

    let config = match Config::load(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} (using built-in defaults)", e);
            Config::default()
        }
    };
    init_logging(&Some(config.clone()), cli.verbose);
    info!("signshop v{} using {}", env!("CARGO_PKG_VERSION"), cli.config);

    let ctx = ShopContext::from_config(&config)?;

    match cli.command {
        Commands::Init => {}
        Commands::Check {
            material,
            buy,
            sell,
            owner,
        } => {
            let verdict = check(&ctx, [material, buy, sell, owner]);
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Commands::Materials => {
            let lines = ctx.materials().describe();
            if lines.is_empty() {
                println!("No currencies, aliases or names configured.");
            }
            for line in lines {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity wins over the configured level
    let configured = config
        .as_ref()
        .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let Some(cfg) = config else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
        let _ = builder.try_init();
        return;
    };

    let transactions_path = cfg.logging.transactions_file.clone();
    let file = cfg.logging.file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    let file = file.map(|f| std::sync::Arc::new(std::sync::Mutex::new(f)));
    let is_tty = atty::is(atty::Stream::Stderr);

    builder.format(move |fmt, record| {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!("{} [{}] {}", ts, record.level(), record.args());

        if let Some(file) = &file {
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", line);
            }
        }

        if record.target() == "transactions" {
            if let Some(ref path) = transactions_path {
                if let Ok(mut tf) = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                {
                    let _ = writeln!(tf, "{}", line);
                }
            }
        }

        // With a log file and no terminal, the file is the only copy
        if file.is_none() || is_tty {
            writeln!(fmt, "{}", line)
        } else {
            Ok(())
        }
    });
    let _ = builder.try_init();
}
