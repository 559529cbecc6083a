use clap::{Parser, Subcommand};
use scsc_core::config::{DEFAULT_API_URL, DEFAULT_DB_PATH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scsc",
    version,
    about = "Socio-Cultural Sensitivity Checker: evaluate text and browse the result log"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate one text through the API
    Evaluate(EvaluateArgs),
    /// Evaluate each line of a text file through the API
    Batch(BatchArgs),
    /// Show recent rows from the result log
    Logs(LogsArgs),
    /// Print the CLI version
    Version,
}

#[derive(Parser, Clone)]
pub struct EvaluateArgs {
    /// Text to evaluate
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds (longer than the server's model timeout)
    #[arg(long, default_value_t = 90)]
    pub timeout_secs: u64,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Clone)]
pub struct BatchArgs {
    /// Text file, one example per line
    pub file: PathBuf,

    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Only the first N lines are sent
    #[arg(long, default_value_t = 100)]
    pub max_lines: usize,

    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Parser, Clone)]
pub struct LogsArgs {
    #[arg(long, env = "SCSC_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    #[arg(long, default_value_t = 50)]
    pub limit: u32,
}
