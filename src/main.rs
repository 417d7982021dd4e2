use anyhow::Result;
use clap::Parser;
use hw_whiz::cli::Cli;
use hw_whiz::utils::logging;
use hw_whiz::{App, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：配置文件 < 环境变量 < 命令行
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(book) = cli.book {
        config.book = book;
    }
    if let Some(path) = cli.problems_csv {
        config.problems_csv = path.display().to_string();
    }

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    // 运行子命令
    App::new(config).run(cli.command).await?;

    Ok(())
}
