use reelvault_core::Config;

// mimalloc keeps fragmentation down on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = reelvault_api::setup::initialize_app(config.clone()).await?;

    reelvault_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
