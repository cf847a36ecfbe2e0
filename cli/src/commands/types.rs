use clap::Subcommand;
use serde_json::json;

use promcon_client::loader::{LoadState, MonitoringTypeLoader};

use crate::util::{EXIT_APP_ERROR, EXIT_OK, print_json};

#[derive(Subcommand)]
pub enum TypesCommands {
    /// List monitoring categories, or one category's types
    List {
        /// Restrict to one category
        category: Option<String>,
    },
    /// Show one monitoring type's full schema (matchers, form schema, table schema)
    Get {
        category: String,
        type_id: String,
    },
}

pub async fn run(loader: &MonitoringTypeLoader, command: TypesCommands) -> i32 {
    match command {
        TypesCommands::List { category: None } => {
            loader.load_all_categories().await;
            finish(loader.all_state())
        }
        TypesCommands::List {
            category: Some(name),
        } => {
            loader.load_category(&name).await;
            finish(loader.category_state(&name))
        }
        TypesCommands::Get { category, type_id } => {
            loader.load_type(&category, &type_id).await;
            finish(loader.type_state(&category, &type_id))
        }
    }
}

fn finish<T: serde::Serialize>(state: LoadState<T>) -> i32 {
    match state {
        LoadState::Loaded(value) => {
            print_json(&json!(value));
            EXIT_OK
        }
        LoadState::Error(message) => {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json!({"error": "load_failed", "message": message}))
                    .unwrap_or_default()
            );
            EXIT_APP_ERROR
        }
        // A finished load never leaves the machine idle or loading
        _ => EXIT_APP_ERROR,
    }
}
