#[tokio::main]
async fn main() {
    if let Err(e) = upstac_lib::run().await {
        eprintln!("upstac: {e}");
        std::process::exit(1);
    }
}
