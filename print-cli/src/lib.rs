//! Command-line front end for placing and printing images.

pub mod cli;
pub mod config;
pub mod job_file;

pub use config::AppConfig;
pub use job_file::JobFile;

/// Load .env from the first candidate path that exists.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
