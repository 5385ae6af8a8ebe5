#[tokio::main]
async fn main() -> anyhow::Result<()> {
    noterag_server::start().await
}
