#[tokio::main]
async fn main() -> slp_node::Result<()> {
    slp_node::run().await
}
