#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quiz_runner_server::run().await
}
