//! gemini-probe — Gemini API connectivity smoke test.
//!
//! Run sequence:
//!   1. Init logger
//!   2. Load `.env` (if present) and resolve the credential
//!   3. Print masked credential preview and executable path
//!   4. Select a client tier (primary, then legacy)
//!   5. Send one fixed prompt to one fixed model
//!   6. Print the response or the diagnostic error
//!
//! Stdout carries the human-readable status lines; tracing diagnostics go
//! to stderr. Every fatal path exits with status 1.

use gemini_probe::config::{API_KEY_VAR, Config};
use gemini_probe::error::AppError;
use gemini_probe::llm::ClientStrategy;
use gemini_probe::logger;

use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    logger::init("info")?;

    let config = Config::load()?;

    let Some(api_key) = config.api_key.clone() else {
        println!("❌ Error: {API_KEY_VAR} not found in environment variables.");
        return Err(AppError::Credential(format!(
            "{API_KEY_VAR} is missing or empty"
        )));
    };

    println!("🔑 Testing API key: {}", api_key.preview());
    if let Ok(exe) = std::env::current_exe() {
        println!("🚀 Executable: {}", exe.display());
    }

    let selection = match ClientStrategy::select(&config, &api_key) {
        Ok(selection) => selection,
        Err(e) => {
            println!("❌ Could not construct any Gemini client.");
            println!("1. primary client error: {}", e.primary);
            println!("2. legacy client error: {}", e.legacy);
            return Err(e.into());
        }
    };

    if let Some(primary_failure) = &selection.primary_failure {
        println!("⚠️ Primary client unavailable: {primary_failure}");
        println!("Falling back to legacy client.");
    }
    println!("✓ {} client ready.", selection.strategy.tier());

    info!(model = %config.model, tier = selection.strategy.tier(), "probe starting");
    println!("📡 Sending request to Gemini ({})...", config.model);

    // The two tiers expose structurally different call shapes: the primary
    // client takes the model per call, the legacy handle was bound to it at
    // selection time.
    let result = match &selection.strategy {
        ClientStrategy::Primary(client) => client.generate(&config.model, &config.prompt).await,
        ClientStrategy::Legacy(model) => model.generate(&config.prompt).await,
    };

    match result {
        Ok(text) => {
            println!();
            println!(
                "✅ Success! {} is working via the {} client.",
                config.model,
                selection.strategy.tier()
            );
            println!("🤖 Response: {text}");
            Ok(())
        }
        Err(e) => {
            println!();
            println!("❌ Error during execution:");
            println!("{e}");
            Err(e.into())
        }
    }
}
