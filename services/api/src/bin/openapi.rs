//! services/api/src/bin/openapi.rs
//!
//! Writes the Pokedex API's OpenAPI document to disk for client generation.
//!
//! Usage: `openapi [OUTPUT]`, where OUTPUT defaults to `openapi.json`.

use api_lib::web::rest::openapi_json;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    std::fs::write(&output, openapi_json()?)?;
    println!("Wrote the Pokedex OpenAPI document to {}", output);
    Ok(())
}
