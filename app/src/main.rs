use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("waypoint=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    waypoint_lib::run().await
}
