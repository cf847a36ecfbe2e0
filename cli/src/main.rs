use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use promcon_client::loader::{FormSchemaLoader, MonitoringTypeLoader};
use promcon_client::registry::ValueRegistryClient;
use promcon_client::tags::TagClient;
use promcon_client::{ClientConfig, HttpTransport, Transport};

mod commands;
mod util;

use commands::form::FormArgs;
use commands::tags::TagsCommands;
use commands::types::TypesCommands;
use commands::values::ValuesCommands;

#[derive(Parser)]
#[command(name = "promcon", version, about = "Operator console for the Prometheus/Consul monitoring admin backend")]
struct Cli {
    /// API base URL
    #[arg(long, env = "PROMCON_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    /// Request timeout in seconds (raise for SSH-backed operations)
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend reachability and latency
    Health,
    /// Reference value operations
    Values {
        #[command(subcommand)]
        command: ValuesCommands,
    },
    /// Service tag operations
    Tags {
        #[command(subcommand)]
        command: TagsCommands,
    },
    /// Monitoring type and category schemas
    Types {
        #[command(subcommand)]
        command: TypesCommands,
    },
    /// Preview the rendered form for a monitoring type
    Form(FormArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config =
        ClientConfig::new(&cli.api_url).with_timeout(Duration::from_secs(cli.timeout));
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config));

    let code = match cli.command {
        Commands::Health => commands::health::run(transport.as_ref()).await,
        Commands::Values { command } => {
            let registry = ValueRegistryClient::new(transport);
            commands::values::run(&registry, command).await
        }
        Commands::Tags { command } => {
            let client = TagClient::new(transport);
            commands::tags::run(&client, command).await
        }
        Commands::Types { command } => {
            let loader = MonitoringTypeLoader::new(transport);
            commands::types::run(&loader, command).await
        }
        Commands::Form(args) => {
            let loader = FormSchemaLoader::new(transport, &args.category, &args.type_id);
            commands::form::run(&loader, args).await
        }
    };

    std::process::exit(code);
}
