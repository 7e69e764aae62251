//! Kodegen Bundler SEA - single executable packager for Node.js projects.
//!
//! This binary turns a Node.js project into one native Linux executable by
//! embedding the bundled source and assets into a copy of the node runtime.

use kodegen_bundler_sea::cli::{self, OutputManager};
use std::process;

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            let output = OutputManager::new(false, false);
            if output.error(&e.to_string()).is_err() {
                eprintln!("Error: {}", e);
            }
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
