#[tokio::main]
async fn main() {
    if let Err(e) = playtracks::cli::run_cli().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
