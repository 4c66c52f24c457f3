use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;
use mimalloc::MiMalloc;
use taxonomize_emit::{EmitConfig, emit};
use taxonomize_extract::{ExtractConfig, KindMap, LoadPolicy, Taxonomy};
use taxonomize_graph::PairwiseOptions;
use taxonomize_schemas::SatisfiabilityReport;
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

// Use mimalloc for better performance. Parsing large XMI libraries is
// allocation-heavy.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Convert SysML v2 / KerML library taxonomies into OML vocabularies and
/// check which pairs of classifiers can share an instance.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a library into OML vocabularies
    ///
    /// Writes one vocabulary per input document plus a catalog, and
    /// optionally a bundle, a pairwise-intersection vocabulary, and a CSV
    /// edge list.
    Convert {
        #[command(flatten)]
        input: InputArgs,

        /// Output root directory
        #[arg(short, long, default_value = "build/oml")]
        output: PathBuf,

        /// Catalog file name, written under the output root
        #[arg(long, default_value = taxonomize_emit::DEFAULT_CATALOG)]
        catalog: String,

        /// Do not write a catalog
        #[arg(long, conflicts_with = "catalog")]
        no_catalog: bool,

        /// Rewrite prefix of the catalog's fallback rule
        #[arg(long, default_value = taxonomize_emit::DEFAULT_CATALOG_FALLBACK)]
        catalog_fallback: String,

        /// Stem of an aggregate bundle including every vocabulary
        #[arg(long)]
        bundle: Option<String>,

        /// Stem of the pairwise-intersection vocabulary (requires --bundle)
        #[arg(long, requires = "bundle")]
        pairwise: Option<String>,

        /// Maximum number of classifier pairs to analyze
        #[arg(long)]
        max_pairs: Option<u64>,

        /// Write the specialization edge list as CSV to this path
        #[arg(long)]
        edges: Option<PathBuf>,

        /// Write the satisfiability report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Analyze pairwise satisfiability without writing vocabularies
    ///
    /// Prints the satisfiability report as JSON.
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Maximum number of classifier pairs to analyze
        #[arg(long)]
        max_pairs: Option<u64>,

        /// Include a verdict for every analyzed pair
        #[arg(long)]
        verdicts: bool,

        /// Output file path (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Library roots to walk for .kermlx and .sysmlx documents
    #[arg(required = true)]
    roots: Vec<PathBuf>,

    /// CSV table of implicit supertypes (kind,supertype)
    #[arg(short, long)]
    kind_map: Option<PathBuf>,

    /// Classifier kind to recognize; repeat to replace the default set
    #[arg(long = "kind", value_name = "KIND")]
    kinds: Vec<String>,

    /// Canonical namespace for document IRIs
    #[arg(long, default_value = taxonomize_extract::DEFAULT_NAMESPACE)]
    namespace: String,

    /// Stop at the first document that fails to load
    #[arg(long)]
    abort_on_error: bool,
}

impl InputArgs {
    fn config(&self) -> ExtractConfig {
        let mut config = ExtractConfig {
            namespace: self.namespace.clone(),
            load_policy: if self.abort_on_error {
                LoadPolicy::Abort
            } else {
                LoadPolicy::Continue
            },
            ..ExtractConfig::with_roots(&self.roots)
        };
        if !self.kinds.is_empty() {
            config.classifier_kinds = self.kinds.iter().cloned().collect();
        }
        config
    }

    /// Loads the kind map and builds the taxonomy.
    fn taxonomy(&self) -> Result<Taxonomy> {
        let kind_map = match &self.kind_map {
            Some(path) => KindMap::load(path)
                .with_context(|| format!("failed to load kind map {}", path.display()))?,
            None => KindMap::default(),
        };
        let config = self.config();
        let _span = info_span!("extract").entered();
        let taxonomy = taxonomize_extract::run(&config, &kind_map)?;
        Ok(taxonomy)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize structured logging. Output goes to stderr so JSON output
    // on stdout remains clean for piping. Default to warn, allowlist our crates.
    const CRATES: &[&str] = &[
        "taxonomize",
        "taxonomize_emit",
        "taxonomize_extract",
        "taxonomize_graph",
        "taxonomize_schemas",
    ];
    let level = cli.verbose.tracing_level_filter();
    let allowlist = CRATES.iter().map(|c| format!("{c}={level}")).join(",");
    let filter = EnvFilter::new(format!("warn,{allowlist}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            catalog,
            no_catalog,
            catalog_fallback,
            bundle,
            pairwise,
            max_pairs,
            edges,
            report,
        } => {
            let taxonomy = input.taxonomy()?;
            let config = EmitConfig {
                output_root: output,
                namespace: input.namespace.clone(),
                catalog: (!no_catalog).then_some(catalog),
                catalog_fallback,
                bundle_stem: bundle,
                pairwise_stem: pairwise,
                max_pairs,
                edge_list: edges,
                ..EmitConfig::default()
            };

            // Pairwise analysis only runs when something consumes it.
            let analysis = (config.pairwise_artifact().is_some() || report.is_some()).then(|| {
                let mut options = config.pairwise_options();
                options.record_verdicts |= report.is_some();
                analyze(&taxonomy, options)
            });

            let summary = {
                let _span = info_span!("emit").entered();
                emit(&taxonomy, analysis.as_ref(), &config)?
            };

            if let (Some(path), Some(analysis)) = (&report, &analysis) {
                write_json(analysis, Some(path))?;
            }
            if !summary.failures.is_empty() {
                bail!(
                    "{} of {} artifacts failed to write",
                    summary.failures.len(),
                    summary.failures.len() + summary.written.len()
                );
            }
            Ok(())
        }
        Commands::Analyze {
            input,
            max_pairs,
            verdicts,
            output,
        } => {
            let taxonomy = input.taxonomy()?;
            let report = analyze(
                &taxonomy,
                PairwiseOptions {
                    max_pairs,
                    record_verdicts: verdicts,
                },
            );
            write_json(&report, output.as_deref())
        }
    }
}

/// Computes ancestor sets and analyzes pairs, logging the counts.
fn analyze(taxonomy: &Taxonomy, options: PairwiseOptions) -> SatisfiabilityReport {
    let _span = info_span!("analyze").entered();
    let report = taxonomy.closure().analyze(options);
    info!(
        vertices = report.vertex_count,
        pairs = report.pair_count,
        analyzed_pairs = report.analyzed_pairs,
        unsatisfiable_pairs = report.unsatisfiable_pairs,
        truncated = report.truncated,
        "pairwise satisfiability"
    );
    report
}

fn write_json(report: &SatisfiabilityReport, path: Option<&Path>) -> Result<()> {
    // Lock stdout once up front rather than on each write call.
    // Stdout must outlive the lock, so we bind it here first.
    let stdout = std::io::stdout();
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(stdout.lock()),
    };
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
