use clap::Parser;

mod cli;
mod exit_codes;

use cli::args::Cli;

#[tokio::main]
async fn main() {
    scsc_core::config::load_dotenv();
    let cli = Cli::parse();

    let code = match cli::commands::dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {:#}", e);
            exit_codes::BACKEND_ERROR
        }
    };
    std::process::exit(code);
}
