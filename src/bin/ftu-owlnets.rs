use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use ftu_owlnets::parser::crosswalk;
use ftu_owlnets::{writer, Config, Graph, OwlnetsError, OwlnetsResult};

/// Builds OWLNETS files from an organ / FTU / FTU part crosswalk table
#[derive(Parser, Debug)]
#[command(name = "ftu-owlnets", version, about)]
struct Options {
    /// YAML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Crosswalk table, overrides `source.path` of the configuration
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory [default: owlnets/<SAB>]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail on the first malformed row instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ftu_owlnets=info".into()),
        )
        .with_target(false)
        .init();
}

fn run(options: Options) -> OwlnetsResult<()> {
    let mut config = Config::from_file(&options.config)?;
    if options.strict {
        config.strict = true;
    }
    info!(
        schema_version = config.metadata.schema_version.as_deref().unwrap_or("-"),
        version = config.metadata.version.as_deref().unwrap_or("-"),
        contact = config.metadata.contact.as_deref().unwrap_or("-"),
        "converting crosswalk for {}",
        config.sab
    );

    let input = options
        .input
        .or_else(|| config.source.path.clone())
        .ok_or_else(|| OwlnetsError::ConfigurationMissing("source.path".to_string()))?;
    let rows = crosswalk::read_file(&input, &config)?;

    let (graph, report) = Graph::from_rows(&rows, &config)?;

    let output = options
        .output
        .unwrap_or_else(|| PathBuf::from("owlnets").join(&config.sab));
    let files = writer::write_dir(&output, &graph, &config.sab)?;

    info!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        rows = report.rows(),
        rejected = report.rejected().len(),
        "wrote {}, {} and {}",
        files.nodes.display(),
        files.edges.display(),
        files.relations.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let options = Options::parse();
    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
