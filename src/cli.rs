use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use apirequests::http::Client;
use apirequests::report::{OutputMode, ReportOptions, Reporter};
use apirequests::rule::RuleLoader;
use apirequests::runner::{LoopOptions, Runner, TestReporter};
use apirequests::store::{ResultStore, list_results};
use apirequests::task::TaskBuilder;
use apirequests::variable::{ConfigLoader, RunSettings};

#[derive(Parser)]
#[command(author, version, about = "Run HTTP request rules and verify the responses", long_about = None)]
pub struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 执行规则文件中的请求并比较响应
    Run(RunArgs),
    /// 查看 store 模式保存的结果
    History(HistoryArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// JSON 规则文件
    pub rules: PathBuf,

    /// 输出模式
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// 只打印失败的任务
    #[arg(long)]
    pub only_failures: bool,

    /// 循环执行的间隔（毫秒）
    #[arg(long = "loop", value_name = "MS")]
    pub loop_ms: Option<u64>,

    /// 循环模式下最多执行的轮数
    #[arg(long)]
    pub max_runs: Option<usize>,

    #[arg(long)]
    pub output_file: Option<String>,

    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// 结果存储目录
    #[arg(long)]
    pub connection: Option<PathBuf>,

    #[arg(long)]
    pub collection: Option<String>,

    /// 同时发出的单任务请求上限
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// 请求超时（秒）
    #[arg(long)]
    pub timeout: Option<u64>,

    /// 配置文件路径，默认自动查找 apirequests.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 使用的环境
    #[arg(short, long)]
    pub env: Option<String>,

    /// 覆盖变量，可重复
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

impl RunArgs {
    fn overrides(&self) -> RunSettings {
        RunSettings {
            output: self.output,
            only_failures: self.only_failures.then_some(true),
            loop_ms: self.loop_ms,
            max_runs: self.max_runs,
            output_file: self.output_file.clone(),
            output_path: self.output_path.clone(),
            connection: self.connection.clone(),
            collection: self.collection.clone(),
            max_in_flight: self.max_in_flight,
            timeout: self.timeout,
        }
    }
}

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(long)]
    pub connection: Option<PathBuf>,

    #[arg(long)]
    pub collection: Option<String>,

    /// 显示最近多少条
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,

    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn run(args: RunArgs) -> Result<ExitCode> {
    let config = ConfigLoader::load(args.config.as_deref())?;
    let settings = config.run.clone().merge(args.overrides());

    let cli_vars = args
        .vars
        .iter()
        .map(|raw| {
            ConfigLoader::parse_cli_var(raw)
                .with_context(|| format!("invalid --var '{}', expected KEY=VALUE", raw))
        })
        .collect::<Result<Vec<_>>>()?;
    let context = ConfigLoader::build_context(&config, args.env.as_deref(), &cli_vars)?;

    let mut rules = RuleLoader::load_file(&args.rules)?;
    for rule in &mut rules {
        rule.resolve_variables(&context);
    }

    let mut builder = TaskBuilder::new();
    let collection = builder.build(&rules);

    let options = ReportOptions::from_settings(&settings);
    if options.output == OutputMode::Print {
        let console = TestReporter::new(options.only_failures);
        console.print_skipped(builder.skipped());
        console.print_header(
            &args.rules.display().to_string(),
            rules.len(),
            collection.len(),
        );
    }

    let client = Client::with_timeout(settings.timeout.map(Duration::from_secs))?;
    let runner = Runner::new(client).with_max_in_flight(settings.max_in_flight);
    let loop_options = LoopOptions {
        interval: settings.loop_ms.map(Duration::from_millis),
        max_runs: settings.max_runs,
    };
    let reporter = Reporter::new(options);

    let mut exit_code = 0;
    let runs = runner
        .run(&collection, loop_options, |results, started_at| {
            let summary = reporter.report(results, started_at)?;
            exit_code = summary.exit_code();
            Ok(())
        })
        .await?;
    info!(runs, "run finished");

    // 循环模式下失败不影响退出码
    if loop_options.is_looping() {
        return Ok(ExitCode::SUCCESS);
    }
    Ok(ExitCode::from(exit_code))
}

pub fn history(args: HistoryArgs) -> Result<()> {
    let config = ConfigLoader::load(args.config.as_deref())?;
    let settings = config.run.merge(RunSettings {
        connection: args.connection,
        collection: args.collection,
        ..Default::default()
    });

    let options = ReportOptions::from_settings(&settings);
    let store = ResultStore::locate(&options.connection, &options.collection);
    list_results(&store, args.limit)?;

    Ok(())
}
