use trackinfobot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    trackinfobot::run(config).await
}
