//! iLocusMapper CLI entry point
//!
//! Reconciles iLocus annotations between two genome assemblies from vmatch
//! alignments of the query iLocus sequences against the subject genome.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ilocus_mapper::core::{
    open_input, open_output, IlocusMapError, IlocusMapper, LocusRepository, MappingStats,
    MatchMode, ResolverConfig,
};
use ilocus_mapper::formats::{self, VmatchReader};
use log::{info, LevelFilter, Log};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// How candidate subject iLoci are fetched (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum MatchModeArg {
    /// Any subject iLocus overlapping the aligned region
    #[default]
    #[value(name = "overlap")]
    Overlap,
    /// Only subject iLoci containing the whole aligned region
    #[value(name = "containment")]
    Containment,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Overlap => MatchMode::Overlap,
            MatchModeArg::Containment => MatchMode::Containment,
        }
    }
}

#[derive(Parser)]
#[command(name = "ilocus-mapper")]
#[command(about = "Map iLoci between genome assemblies by reciprocal overlap")]
#[command(version)]
#[command(author = "iLocusMapper Contributors")]
struct Cli {
    /// Write per-candidate diagnostics to this file; progress stays on stderr
    #[arg(short = 'l', long, global = true)]
    logfile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the iLocus correspondence between two assemblies
    Map {
        /// iLocus annotation for query (GFF3)
        query_gff3: PathBuf,
        /// iLocus annotation for subject (GFF3)
        subject_gff3: PathBuf,
        /// vmatch output file(s)
        #[arg(required = true)]
        vmatch: Vec<PathBuf>,
        /// Output file (stdout if not specified)
        #[arg(short = 'o', long)]
        outfile: Option<PathBuf>,
        /// Candidate retrieval: overlap or containment
        #[arg(long = "match-mode", default_value = "overlap")]
        match_mode: MatchModeArg,
    },
    /// Report the outcome of every alignment, in input order
    Check {
        /// iLocus annotation for query (GFF3)
        query_gff3: PathBuf,
        /// iLocus annotation for subject (GFF3)
        subject_gff3: PathBuf,
        /// vmatch output file
        vmatch: PathBuf,
        /// Output file (stdout if not specified)
        #[arg(short = 'o', long)]
        outfile: Option<PathBuf>,
        /// Candidate retrieval: overlap or containment
        #[arg(long = "match-mode", default_value = "overlap")]
        match_mode: MatchModeArg,
    },
    /// Count iLoci by iLocus_type
    Types {
        /// iLocus annotation (GFF3)
        locus_gff3: PathBuf,
        /// Only count the iLoci listed in this file (one label per line)
        #[arg(long)]
        ids: Option<PathBuf>,
    },
    /// Retrieve sequences by ID from FASTA data
    Select {
        /// File with one sequence ID per line
        idlist: PathBuf,
        /// FASTA input
        seqs: PathBuf,
        /// Output file (stdout if not specified)
        #[arg(short = 'o', long)]
        outfile: Option<PathBuf>,
        /// Max line width for sequences; 0 disables wrapping
        #[arg(short = 'w', long = "line-width", default_value_t = formats::fasta::DEFAULT_LINE_WIDTH)]
        line_width: usize,
    },
}

/// Routes debug diagnostics to the `-l` file, everything else to stderr
struct DiagnosticLogger {
    console: env_logger::Logger,
    diagnostics: env_logger::Logger,
}

impl DiagnosticLogger {
    fn new(mut console: env_logger::Builder, file: File) -> Self {
        let diagnostics = env_logger::Builder::new()
            .filter_module("ilocus_mapper", LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .build();
        Self {
            console: console.build(),
            diagnostics,
        }
    }

    fn max_level(&self) -> LevelFilter {
        self.console.filter().max(self.diagnostics.filter())
    }
}

impl Log for DiagnosticLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console.enabled(metadata) || self.diagnostics.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if record.level() >= log::Level::Debug {
            self.diagnostics.log(record);
        } else {
            self.console.log(record);
        }
    }

    fn flush(&self) {
        self.console.flush();
        self.diagnostics.flush();
    }
}

/// Progress goes to stderr under `RUST_LOG` (default `info`). With a logfile,
/// debug records of this crate (one per candidate mapping) go to the file.
fn init_logging(logfile: Option<&Path>) -> anyhow::Result<()> {
    let mut console =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let Some(path) = logfile else {
        console.init();
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let logger = DiagnosticLogger::new(console, file);
    let max_level = logger.max_level();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);
    Ok(())
}

fn load_iloci(path: &Path, side: &str) -> anyhow::Result<LocusRepository> {
    info!("Loading {} iLoci: {:?}", side, path);
    let reader = open_input(path)
        .with_context(|| format!("Failed to open {} annotation {}", side, path.display()))?;
    let repository = formats::read_iloci(reader)
        .with_context(|| format!("Failed to load {} iLoci from {}", side, path.display()))?;
    info!("Loaded {} {} iLoci", repository.len(), side);
    Ok(repository)
}

fn build_mapper(query_gff3: &Path, subject_gff3: &Path, match_mode: MatchModeArg) -> anyhow::Result<IlocusMapper> {
    let query = load_iloci(query_gff3, "query")?;
    let subject = load_iloci(subject_gff3, "subject")?;

    let config = ResolverConfig {
        match_mode: match_mode.into(),
    };
    if config.match_mode.is_strict() {
        info!("Match mode: containment");
    }

    Ok(IlocusMapper::new(query, subject, config))
}

fn open_alignments(path: &Path) -> anyhow::Result<VmatchReader<Box<dyn std::io::BufRead>>> {
    info!("Processing vmatch alignments: {:?}", path);
    let reader = open_input(path)
        .with_context(|| format!("Failed to open alignment file {}", path.display()))?;
    Ok(VmatchReader::new(reader))
}

fn print_stats(stats: &MappingStats, start: Instant) {
    eprintln!("\n=== Mapping Statistics ===");
    eprintln!("Alignments:      {}", stats.total);
    eprintln!("With candidates: {}", stats.with_candidates);
    eprintln!("Accepted:        {}", stats.accepted);
    eprintln!("Rejected:        {}", stats.rejected);
    eprintln!("Unknown seq:     {}", stats.unknown_sequence);
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logfile.as_deref())?;
    let start = Instant::now();

    match cli.command {
        Commands::Map {
            query_gff3,
            subject_gff3,
            vmatch,
            outfile,
            match_mode,
        } => {
            let mut mapper = build_mapper(&query_gff3, &subject_gff3, match_mode)?;

            for path in &vmatch {
                let alignments = open_alignments(path)?;
                mapper
                    .process_all(alignments.map(|r| r.map_err(IlocusMapError::from)))
                    .with_context(|| format!("Failed to process alignments from {}", path.display()))?;
            }

            let stats = mapper.stats().clone();
            let report = mapper.finish();

            let mut out = open_output(outfile.as_deref())?;
            formats::write_mapping_report(&mut out, &report)?;
            out.flush()?;

            print_stats(&stats, start);
            eprintln!("Query mapped:    {}/{}", report.mapped_query_count(), report.query_mappings.len());
            eprintln!("Subject unmapped: {}", report.unmapped_subjects.len());
        }

        Commands::Check {
            query_gff3,
            subject_gff3,
            vmatch,
            outfile,
            match_mode,
        } => {
            let mut mapper = build_mapper(&query_gff3, &subject_gff3, match_mode)?;
            let mut out = open_output(outfile.as_deref())?;

            for (idx, alignment) in open_alignments(&vmatch)?.enumerate() {
                let alignment = alignment
                    .with_context(|| format!("Failed to read alignments from {}", vmatch.display()))?;
                let outcome = mapper
                    .process(&alignment)
                    .with_context(|| format!("Failed to resolve alignment #{}", idx + 1))?;
                formats::write_alignment_outcome(&mut out, &outcome)?;
            }

            let report = mapper.report();
            formats::write_unmapped_subjects(&mut out, &report.unmapped_subjects)?;
            out.flush()?;

            print_stats(mapper.stats(), start);
        }

        Commands::Types { locus_gff3, ids } => {
            let ids = match ids {
                Some(path) => Some(
                    formats::read_id_list(open_input(&path)?)
                        .with_context(|| format!("Failed to read id list {}", path.display()))?,
                ),
                None => None,
            };

            let counts = formats::locus_type_counts(open_input(&locus_gff3)?, ids.as_ref())
                .with_context(|| format!("Failed to read {}", locus_gff3.display()))?;

            let mut out = open_output(None::<&Path>)?;
            formats::write_type_counts(&mut out, &counts)?;
            out.flush()?;
        }

        Commands::Select {
            idlist,
            seqs,
            outfile,
            line_width,
        } => {
            let ids = formats::read_id_list(open_input(&idlist)?)
                .with_context(|| format!("Failed to read id list {}", idlist.display()))?;

            let mut out = open_output(outfile.as_deref())?;
            let stats = formats::select_sequences(open_input(&seqs)?, &ids, &mut out, line_width)
                .with_context(|| format!("Failed to read sequences from {}", seqs.display()))?;
            out.flush()?;

            info!("Selected {} of {} sequences", stats.selected, stats.total);
        }
    }

    Ok(())
}
