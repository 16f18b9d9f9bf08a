#[tokio::main]
async fn main() {
    if let Err(err) = event_aggregator::run().await {
        eprintln!("server error: {err}");
        std::process::exit(1);
    }
}
