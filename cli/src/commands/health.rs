use std::time::Instant;

use serde_json::json;

use promcon_client::Transport;

use crate::util::{EXIT_OK, print_json, report_error};

/// Reachability probe. The backend exposes no dedicated health route on this
/// surface, so the registry field listing doubles as the probe.
pub async fn run(transport: &dyn Transport) -> i32 {
    let started = Instant::now();
    match transport.get("/reference-values/", &[]).await {
        Ok(_) => {
            print_json(&json!({
                "success": true,
                "latency_ms": started.elapsed().as_millis() as u64,
            }));
            EXIT_OK
        }
        Err(e) => report_error(&e),
    }
}
