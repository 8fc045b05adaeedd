#[tokio::main]
async fn main() {
    nursle::run().await.expect("error while running Nursle");
}
