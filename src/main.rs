mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 初始化日志系统
    apirequests::logger::init_logger(cli.verbose);

    match cli.command {
        Commands::Run(args) => cli::run(args).await,
        Commands::History(args) => {
            cli::history(args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
