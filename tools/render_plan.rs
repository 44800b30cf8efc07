use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use query_chain::{
    dto::PlanRequest,
    infrastructure::persistence::{PostgresQueryTarget, RecordingQueryTarget},
    qb::Builder,
    use_cases::CompilePlanUseCase,
    Config,
};

/// Render a JSON plan request as Postgres SQL
#[derive(Parser)]
struct Cli {
    /// Plan file, or `-` to read stdin
    plan: PathBuf,

    /// Root table
    #[arg(long)]
    table: String,

    /// Known table columns, needed for `omit` without `select`
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Total record count used for the page summary
    #[arg(long, default_value_t = 0)]
    total: i64,

    /// Print the applied operations instead of SQL
    #[arg(long)]
    explain: bool,
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn read_plan(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env();
    config.validate().map_err(anyhow::Error::msg)?;
    init_tracing(&config);

    let raw = read_plan(&cli.plan)?;
    let request: PlanRequest = serde_json::from_str(&raw).context("parsing plan request")?;
    let plan = CompilePlanUseCase::new(config).execute(request, cli.total)?;
    info!(table = %cli.table, "plan compiled");

    if cli.explain {
        let ops = plan.build(RecordingQueryTarget::default()).into_ops();
        println!("{}", serde_json::to_string_pretty(&ops)?);
        return Ok(());
    }

    let target = plan.build(PostgresQueryTarget::new(&cli.table).with_columns(cli.columns));

    let rendered = target.render()?;
    println!("{}", rendered.sql());
    println!("-- params: {}", serde_json::to_string(rendered.binds())?);

    for (relation, preload) in target.render_preloads()? {
        println!("-- preload {}", relation);
        println!("{}", preload.sql());
        println!("-- params: {}", serde_json::to_string(preload.binds())?);
    }

    if let Some(paging) = &plan.paging {
        let count = target.render_count()?;
        println!("-- count");
        println!("{}", count.sql());
        println!("-- page: {}", serde_json::to_string(&paging.paging())?);
    }

    Ok(())
}
