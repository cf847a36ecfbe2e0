use clap::Subcommand;
use serde_json::json;

use promcon_client::registry::ValueRegistryClient;

use crate::util::{EXIT_APP_ERROR, EXIT_CONNECTION, EXIT_OK, parse_metadata, print_json, report_error};

#[derive(Subcommand)]
pub enum ValuesCommands {
    /// List known values for a field
    List {
        /// Field namespace, e.g. "company"
        field: String,
        /// Include usage statistics per value
        #[arg(long)]
        stats: bool,
    },
    /// Idempotently register a value (create if absent, return existing otherwise)
    Ensure {
        field: String,
        value: String,
        /// Metadata to attach, as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Explicitly create a value (fails if it already exists)
    Create {
        field: String,
        value: String,
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Delete a value; refused while it is still in use unless --force
    Delete {
        field: String,
        value: String,
        /// Delete even when the value is still referenced by services
        #[arg(long)]
        force: bool,
    },
    /// List all fields supporting reference values
    Fields,
    /// List field categories used by the admin grouping UI
    Categories,
}

pub async fn run(registry: &ValueRegistryClient, command: ValuesCommands) -> i32 {
    match command {
        ValuesCommands::List { field, stats } => {
            let loaded = registry.load_values(&field, stats).await;
            print_json(&json!({
                "field": field,
                "values": loaded.values,
                "from_cache": loaded.from_cache,
                "warning": loaded.warning,
            }));
            if loaded.warning.is_some() {
                EXIT_CONNECTION
            } else {
                EXIT_OK
            }
        }
        ValuesCommands::Ensure {
            field,
            value,
            metadata,
        } => {
            let metadata = parse_metadata(metadata.as_deref());
            let outcome = registry.ensure_value(&field, &value, metadata).await;
            let code = if outcome.success { EXIT_OK } else { EXIT_APP_ERROR };
            print_json(&json!(outcome));
            code
        }
        ValuesCommands::Create {
            field,
            value,
            metadata,
        } => {
            let metadata = parse_metadata(metadata.as_deref());
            let outcome = registry.create_value(&field, &value, metadata).await;
            let code = if outcome.success { EXIT_OK } else { EXIT_APP_ERROR };
            print_json(&json!(outcome));
            code
        }
        ValuesCommands::Delete {
            field,
            value,
            force,
        } => match registry.delete_value(&field, &value, force).await {
            Ok(()) => {
                print_json(&json!({"success": true, "deleted": value}));
                EXIT_OK
            }
            Err(e) => report_error(&e),
        },
        ValuesCommands::Fields => match registry.list_fields().await {
            Ok(fields) => {
                print_json(&json!({"fields": fields}));
                EXIT_OK
            }
            Err(e) => report_error(&e),
        },
        ValuesCommands::Categories => match registry.list_categories().await {
            Ok(categories) => {
                print_json(&json!({"categories": categories}));
                EXIT_OK
            }
            Err(e) => report_error(&e),
        },
    }
}
