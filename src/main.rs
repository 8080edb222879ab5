use anyhow::Result;
use submission_sorter::utils::logging;
use submission_sorter::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志（guard 需持有到程序结束）
    let _guard = logging::init(&config)?;

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
