use serde_json::json;

use promcon_client::ClientError;

/// Exit codes: 0=success, 1=application error, 2=backend/internal error,
/// 3=connection error (unreachable or timed out), 4=usage error.
pub const EXIT_OK: i32 = 0;
pub const EXIT_APP_ERROR: i32 = 1;
pub const EXIT_BACKEND_ERROR: i32 = 2;
pub const EXIT_CONNECTION: i32 = 3;
pub const EXIT_USAGE: i32 = 4;

pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("{{\"error\": \"serialize_error\", \"message\": \"{e}\"}}"),
    }
}

pub fn exit_error(message: &str, hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(h) = hint {
        err["hint"] = json!(h);
    }
    eprintln!("{}", serde_json::to_string_pretty(&err).unwrap_or_default());
    std::process::exit(EXIT_USAGE);
}

pub fn exit_code_for(err: &ClientError) -> i32 {
    match err {
        ClientError::Timeout(_) | ClientError::Connection(_) => EXIT_CONNECTION,
        ClientError::InvalidInput(_) => EXIT_USAGE,
        ClientError::Decode(_) => EXIT_BACKEND_ERROR,
        ClientError::Api { code, .. }
            if code.as_deref() == Some(promcon_core::error::codes::INTERNAL_ERROR) =>
        {
            EXIT_BACKEND_ERROR
        }
        _ => EXIT_APP_ERROR,
    }
}

/// Print a structured error and return the exit code for it. A timeout gets
/// the "server slow" hint, a connection failure the "server unreachable"
/// one.
pub fn report_error(err: &ClientError) -> i32 {
    let hint = if err.is_timeout() {
        Some("The backend is reachable but slow; it may be doing remote SSH work. Try --timeout 60.")
    } else if err.is_transport() {
        Some("Is the backend running? Check PROMCON_API_URL.")
    } else {
        None
    };

    let mut body = json!({
        "error": err.code().unwrap_or("client_error"),
        "message": err.to_string()
    });
    if let Some(h) = hint {
        body["hint"] = json!(h);
    }
    eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    exit_code_for(err)
}

/// Parse an optional `--metadata` JSON object argument.
pub fn parse_metadata(raw: Option<&str>) -> Option<serde_json::Value> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(v) => Some(v),
        Err(e) => exit_error(
            &format!("Invalid JSON in --metadata: {e}"),
            Some("Provide a JSON object, e.g. --metadata '{\"source\":\"cli\"}'"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn transport_errors_map_to_connection_exit_code() {
        assert_eq!(
            exit_code_for(&ClientError::Timeout(Duration::from_secs(15))),
            EXIT_CONNECTION
        );
        assert_eq!(
            exit_code_for(&ClientError::Connection("refused".to_string())),
            EXIT_CONNECTION
        );
    }

    #[test]
    fn application_errors_map_by_backend_code() {
        let in_use = ClientError::ValueInUse {
            value: "Acme".to_string(),
        };
        assert_eq!(exit_code_for(&in_use), EXIT_APP_ERROR);

        let internal = ClientError::Api {
            code: Some("internal_error".to_string()),
            message: "boom".to_string(),
        };
        assert_eq!(exit_code_for(&internal), EXIT_BACKEND_ERROR);
    }
}
