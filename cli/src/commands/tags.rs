use clap::Subcommand;
use serde_json::json;

use promcon_client::tags::TagClient;

use crate::util::{EXIT_APP_ERROR, EXIT_CONNECTION, EXIT_OK, parse_metadata, print_json, report_error};

#[derive(Subcommand)]
pub enum TagsCommands {
    /// List all known service tags (live services ∪ registered tags)
    List,
    /// Idempotently register one tag
    Ensure {
        tag: String,
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Register several tags in one request
    BatchEnsure {
        /// Tags to register
        tags: Vec<String>,
        #[arg(long)]
        metadata: Option<String>,
    },
}

pub async fn run(client: &TagClient, command: TagsCommands) -> i32 {
    match command {
        TagsCommands::List => {
            let loaded = client.load_tags().await;
            print_json(&json!({
                "tags": loaded.tags.as_slice(),
                "from_cache": loaded.from_cache,
                "warnings": loaded.warnings,
            }));
            if loaded.warnings.is_empty() {
                EXIT_OK
            } else {
                EXIT_CONNECTION
            }
        }
        TagsCommands::Ensure { tag, metadata } => {
            let metadata = parse_metadata(metadata.as_deref());
            let outcome = client.ensure_tag(&tag, metadata).await;
            let code = if outcome.success { EXIT_OK } else { EXIT_APP_ERROR };
            print_json(&json!(outcome));
            code
        }
        TagsCommands::BatchEnsure { tags, metadata } => {
            let metadata = parse_metadata(metadata.as_deref());
            match client.batch_ensure_tags(&tags, metadata).await {
                Ok(results) => {
                    let failed = results.iter().filter(|r| !r.success).count();
                    print_json(&json!({"results": results, "failed": failed}));
                    if failed == 0 { EXIT_OK } else { EXIT_APP_ERROR }
                }
                Err(e) => report_error(&e),
            }
        }
    }
}
