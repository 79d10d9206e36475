use anyhow::Result;
use clap::Parser;

use deeplinker::cli::Cli;
use deeplinker::config::{get_config, init_config_from};
use deeplinker::interfaces::cli::run_cli_command;
use deeplinker::system::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    let config = get_config();
    let guard = init_logging(&config.logging)?;

    let result = run_cli_command(cli.command).await;
    // 退出前刷新日志
    drop(guard);

    if let Err(e) = result {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }

    Ok(())
}
