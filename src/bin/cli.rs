//! Binary entry point for the rowgraph CLI.
#![forbid(unsafe_code)]

#[path = "cli/config.rs"]
mod config;
#[path = "cli/ui.rs"]
mod ui;

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rowgraph::{
    aggregate::AggregatorRegistry,
    cli::decode_dump::{run_decode, CliError, DecodeDumpConfig, RecordFormat},
    decode::MissingScorePolicy,
    ingest::{ErrorPolicy, IngestSummary},
    partition::parse_partition_values,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::{CliConfig, DecoderOverrides};
use ui::{format_duration, Ui};

#[derive(Parser, Debug)]
#[command(
    name = "rowgraph",
    version,
    about = "Decode wide-column link tables into graph vertices",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "ROWGRAPH_CONFIG",
        value_name = "FILE",
        help = "Path to cli.toml (defaults to the user config directory)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(long, global = true, help = "Suppress status output on stderr")]
    quiet: bool,

    #[arg(long, global = true, help = "Disable colors and spinners")]
    plain: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Decode a CSV row dump into vertex records")]
    Decode(DecodeCmd),

    #[command(about = "Parse an output partition descriptor (k1=v1,k2=v2)")]
    Partition {
        #[arg(value_name = "DESCRIPTOR")]
        descriptor: String,
    },

    #[command(about = "List the aggregator channels registered for link rank")]
    Aggregators,
}

#[derive(Args, Debug)]
struct DecodeCmd {
    #[arg(value_name = "DUMP", help = "CSV dump with columns row,family,qualifier,value")]
    dump: PathBuf,

    #[arg(long, help = "Column family holding outlinks")]
    outlink_family: Option<String>,

    #[arg(long, help = "Column family holding the score")]
    score_family: Option<String>,

    #[arg(long, help = "Qualifier of the score cell")]
    score_qualifier: Option<String>,

    #[arg(long, value_enum, help = "Score used when a row has no score cell")]
    missing_score: Option<MissingScoreArg>,

    #[arg(long, help = "Collapse repeated outlink targets")]
    dedup_outlinks: bool,

    #[arg(long, value_enum, help = "Abort or skip rows that fail to decode")]
    on_error: Option<ErrorPolicyArg>,

    #[arg(long, value_name = "N", help = "Stop after N vertices")]
    limit: Option<u64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum MissingScoreArg {
    Zero,
    Nan,
    Error,
}

impl From<MissingScoreArg> for MissingScorePolicy {
    fn from(arg: MissingScoreArg) -> Self {
        match arg {
            MissingScoreArg::Zero => MissingScorePolicy::Zero,
            MissingScoreArg::Nan => MissingScorePolicy::Nan,
            MissingScoreArg::Error => MissingScorePolicy::Error,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ErrorPolicyArg {
    Abort,
    Skip,
}

impl From<ErrorPolicyArg> for ErrorPolicy {
    fn from(arg: ErrorPolicyArg) -> Self {
        match arg {
            ErrorPolicyArg::Abort => ErrorPolicy::Abort,
            ErrorPolicyArg::Skip => ErrorPolicy::Skip,
        }
    }
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let ui = Ui::new(cli.plain, cli.quiet);

    match cli.command {
        Command::Decode(cmd) => {
            let file_cfg = CliConfig::load(cli.config)?;
            debug!(config = ?file_cfg.path(), "cli.config.loaded");
            let decode_cfg = build_decode_config(cmd, &file_cfg, cli.format);
            let task = ui.task(format!("decoding {}", decode_cfg.path.display()));
            let stdout = io::stdout();
            let mut out = io::BufWriter::new(stdout.lock());
            let summary = run_decode(&decode_cfg, &mut out).map_err(into_boxed_error)?;
            out.flush()?;
            let elapsed = task.finish();
            print_summary(&ui, &summary, &format_duration(elapsed));
        }
        Command::Partition { descriptor } => {
            let spec = parse_partition_values(Some(descriptor.as_str()))?.unwrap_or_default();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&spec)?),
                OutputFormat::Text => {
                    for (key, value) in spec.iter() {
                        println!("{key}={value}");
                    }
                }
            }
        }
        Command::Aggregators => {
            let registry = AggregatorRegistry::link_rank();
            let specs: Vec<_> = registry.specs().collect();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&specs)?),
                OutputFormat::Text => {
                    for spec in specs {
                        let scope = if spec.persistent {
                            "persistent"
                        } else {
                            "per-superstep"
                        };
                        println!("{}\t{:?}\t{}", spec.name, spec.reduction, scope);
                    }
                }
            }
        }
    }

    Ok(())
}

fn build_decode_config(cmd: DecodeCmd, file_cfg: &CliConfig, format: OutputFormat) -> DecodeDumpConfig {
    let overrides = DecoderOverrides {
        outlink_family: cmd.outlink_family,
        score_family: cmd.score_family,
        score_qualifier: cmd.score_qualifier,
        missing_score: cmd.missing_score.map(Into::into),
        dedup_outlinks: cmd.dedup_outlinks,
    };
    let mut cfg = DecodeDumpConfig::new(cmd.dump);
    cfg.decoder = overrides.apply(file_cfg.decoder_options());
    cfg.on_error = cmd.on_error.map(Into::into).unwrap_or(file_cfg.on_error());
    cfg.limit = cmd.limit.or(file_cfg.limit());
    cfg.format = match format {
        OutputFormat::Text => RecordFormat::Text,
        OutputFormat::Json => RecordFormat::JsonLines,
    };
    cfg
}

fn print_summary(ui: &Ui, summary: &IngestSummary, elapsed: &str) {
    ui.section(
        "Decoded",
        [
            ("rows", summary.rows_read.to_string()),
            ("vertices", summary.vertices.to_string()),
            ("edges", summary.edges.to_string()),
            ("dangling", summary.dangling.to_string()),
            ("skipped", summary.rows_skipped.to_string()),
            ("elapsed", elapsed.to_string()),
        ],
    );
    if summary.rows_skipped > 0 {
        ui.warn(&format!("{} rows failed to decode and were skipped", summary.rows_skipped));
    }
}

fn into_boxed_error(err: CliError) -> Box<dyn Error> {
    Box::new(err)
}
