use clap::{Args, Parser, Subcommand};
use pkg_aggregate::{compare_to_ceiling, summarize, AggregateOptions, ResourceTotals};
use tracing::info;

mod helm;
mod output;
mod quota;

#[derive(Parser)]
#[command(
    name = "resq",
    about = "Sum chart resource declarations and check them against namespace quotas"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the aggregated resource summary for a chart or release
    Sum {
        #[command(flatten)]
        common: CommonArgs,
        /// Output format: plain or table
        #[arg(long, default_value = "plain")]
        output: String,
    },
    /// Check aggregated resources against the namespace resource quota
    Check {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print the version
    Version,
}

#[derive(Args)]
struct CommonArgs {
    /// Chart path, or release name with --remote
    chart: String,

    /// Namespace for rendering and quota lookup
    #[arg(short, long)]
    namespace: Option<String>,

    /// Set values on the command line (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set_values: Vec<String>,

    /// Specify values in a YAML file (repeatable)
    #[arg(short = 'f', long = "values", value_name = "FILE")]
    value_files: Vec<String>,

    /// Aggregate the deployed release manifest instead of rendering a local chart
    #[arg(long)]
    remote: bool,

    /// Require CPU and memory values to be declared for every container
    #[arg(long)]
    require: bool,

    /// Default value for CPU limit
    #[arg(long, value_name = "QUANTITY")]
    default_cpu_limit: Option<String>,

    /// Default value for memory limit
    #[arg(long, value_name = "QUANTITY")]
    default_mem_limit: Option<String>,

    /// Default value for CPU request
    #[arg(long = "default-cpu-req", value_name = "QUANTITY")]
    default_cpu_request: Option<String>,

    /// Default value for memory request
    #[arg(long = "default-mem-req", value_name = "QUANTITY")]
    default_mem_request: Option<String>,
}

impl CommonArgs {
    fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            default_cpu_limit: self.default_cpu_limit.clone(),
            default_mem_limit: self.default_mem_limit.clone(),
            default_cpu_request: self.default_cpu_request.clone(),
            default_mem_request: self.default_mem_request.clone(),
            require_explicit: self.require,
        }
    }
}

async fn load_totals(common: &CommonArgs) -> anyhow::Result<ResourceTotals> {
    let manifest = if common.remote {
        helm::fetch_release_manifest(&common.chart, common.namespace.as_deref()).await?
    } else {
        helm::render_chart(
            &common.chart,
            common.namespace.as_deref(),
            &common.set_values,
            &common.value_files,
        )
        .await?
    };
    info!("aggregating {} bytes of manifest", manifest.len());
    Ok(pkg_aggregate::aggregate(&manifest, &common.aggregate_options())?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sum { common, output } => {
            let totals = load_totals(&common).await?;
            let rows = summarize(&totals);
            let stdout = std::io::stdout();
            output::write_summary(&mut stdout.lock(), &rows, &output)?;
        }
        Commands::Check { common } => {
            // fetch the ceiling first so a quota misconfiguration fails
            // before any rendering work
            let ceiling = quota::fetch_ceiling(common.namespace.as_deref()).await?;
            let totals = load_totals(&common).await?;
            let report = compare_to_ceiling(&totals, &ceiling)?;
            let stdout = std::io::stdout();
            output::write_comparison(&mut stdout.lock(), &report)?;
        }
        Commands::Version => {
            println!("resq {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_subcommand_parses() {
        let cli = Cli::try_parse_from(["resq", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn sum_flags_map_to_aggregate_options() {
        let cli = Cli::try_parse_from([
            "resq",
            "sum",
            "./chart",
            "--require",
            "--default-cpu-limit",
            "100m",
            "--default-mem-req",
            "256Mi",
        ])
        .unwrap();
        let Commands::Sum { common, output } = cli.command else {
            panic!("expected sum");
        };
        assert_eq!(output, "plain");
        let options = common.aggregate_options();
        assert!(options.require_explicit);
        assert_eq!(options.default_cpu_limit.as_deref(), Some("100m"));
        assert_eq!(options.default_mem_request.as_deref(), Some("256Mi"));
        assert_eq!(options.default_mem_limit, None);
    }
}
