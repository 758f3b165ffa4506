#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sanskrit_speak::run().await
}
