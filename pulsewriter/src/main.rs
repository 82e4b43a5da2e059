use clap::Parser;
use pulsewriter::cli::{run, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => {}
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            eprintln!("{e}");
            std::process::exit(e.exit_code() as i32);
        }
    }
}
