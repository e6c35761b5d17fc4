//! Print a ready-to-run `curl` command for a signed MedScheduler request.
//!
//! Run with:
//!   cargo run --example sign_request -- POST /patients '{"first_name":"Ana",...}'
//!
//! The secret and client id come from `MEDSCHEDULER_SECRET` and
//! `MEDSCHEDULER_CLIENT_ID`, falling back to development values.

use std::env;

use medscheduler::auth::{
    method_carries_body, sign_with_secret, unix_now, CanonicalRequest, CLIENT_ID_HEADER,
    SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let method = args.first().map(|m| m.to_uppercase()).unwrap_or_else(|| "GET".to_string());
    let path = args.get(1).cloned().unwrap_or_else(|| "/patients".to_string());
    let body = args.get(2).cloned().unwrap_or_default();

    let secret = env::var("MEDSCHEDULER_SECRET")
        .unwrap_or_else(|_| "test-secret-key-for-development!!".to_string());
    let client_id =
        env::var("MEDSCHEDULER_CLIENT_ID").unwrap_or_else(|_| "medscheduler_client".to_string());
    let base_url =
        env::var("MEDSCHEDULER_URL").unwrap_or_else(|_| "http://127.0.0.1:5001".to_string());

    let timestamp = unix_now().to_string();
    let signed_body = if method_carries_body(&method) {
        body.as_str()
    } else {
        ""
    };
    let canonical = CanonicalRequest::new(&method, &path, &timestamp, signed_body.as_bytes());
    let signature = sign_with_secret(secret.as_bytes(), &canonical);

    eprintln!("String to sign:\n{}\n", canonical.to_display_string());

    let mut command = format!(
        "curl -X {method} '{base_url}{path}' \\\n  -H '{CLIENT_ID_HEADER}: {client_id}' \\\n  -H '{TIMESTAMP_HEADER}: {timestamp}' \\\n  -H '{SIGNATURE_HEADER}: {signature}'"
    );
    if !signed_body.is_empty() {
        command.push_str(&format!(
            " \\\n  -H 'Content-Type: application/json' \\\n  --data-raw '{signed_body}'"
        ));
    }
    println!("{command}");

    Ok(())
}
