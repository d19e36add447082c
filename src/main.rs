// Standard library imports for path handling
use std::path::PathBuf;

// Command-line argument parsing library
use clap::Parser;

// Structured logging
use tracing::{debug, info};

use varsnap::config::{DEFAULT_PANEL_HEIGHT, DEFAULT_REFERENCE, DEFAULT_WINDOW};
use varsnap::igv::DEFAULT_MEMORY_MB;
use varsnap::output::{default_batch_path, session_batch_path};
use varsnap::{
    DisplayMode, Error, IgvRunner, InputFormat, ScriptConfig, SortMode, VariantSource,
    build_script, build_session_script, derive_prefix, write_batch_script,
};

/// Take IGV snapshots of every variant in a VCF without opening an IGV window
///
/// The tool:
/// 1. Reads variants from a VCF (or a plain list of chrom:pos lines)
/// 2. Writes an IGV batch script visiting each variant with a flanking window
/// 3. Optionally runs IGV headlessly under xvfb-run to take the snapshots
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// BAM/BED/VCF files to load as tracks, in display order
    #[arg(short, long = "load-files", required = true, num_args = 1..)]
    load_files: Vec<PathBuf>,

    /// VCF file (or plain-text locus list with -t 1) to take snapshots of
    #[arg(short, long = "vcf-file", required_unless_present = "session_only")]
    vcf_file: Option<PathBuf>,

    /// Directory where snapshot images are saved (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Reference genome to load in IGV
    #[arg(short, long, default_value = DEFAULT_REFERENCE)]
    reference: String,

    /// How reads are displayed
    #[arg(long, value_enum, default_value_t = DisplayMode::Squish)]
    view_preference: DisplayMode,

    /// How reads are sorted at each locus
    #[arg(long, value_enum, default_value_t = SortMode::Strand)]
    sort_preference: SortMode,

    /// Panel height for snapshot images
    #[arg(long, default_value_t = DEFAULT_PANEL_HEIGHT)]
    height: u32,

    /// Prefix for snapshot names (default: input basename without .vcf*)
    #[arg(long)]
    prefix: Option<String>,

    /// Bases shown upstream and downstream of each locus
    #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
    window: u64,

    /// 1 to view reads as pairs, 0 otherwise
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pair: u8,

    /// 1 if --vcf-file is a plain-text list of chrom:pos lines
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    textfile: u8,

    /// Where to write the batch script (default: <vcf-file>.bat)
    #[arg(short, long)]
    batch_file: Option<PathBuf>,

    /// IGV jar; when given, the script is run headlessly after it is written
    #[arg(long)]
    igv_jar: Option<PathBuf>,

    /// Java binary used to launch IGV
    #[arg(long, default_value = "java")]
    java: PathBuf,

    /// JVM memory limit for IGV in megabytes
    #[arg(long, default_value_t = DEFAULT_MEMORY_MB)]
    memory_mb: u32,

    /// Only write a session script that loads the genome and tracks
    #[arg(long)]
    session_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = if debug { "debug" } else { "info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| format!("Invalid log level '{level}': {e}"))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    Ok(())
}

fn absolute(path: PathBuf) -> Result<PathBuf, Error> {
    std::path::absolute(&path).map_err(|e| Error::io(format!("resolving {}", path.display()), e))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.debug)?;

    let snapshot_dir = match args.output_dir {
        Some(dir) => absolute(dir)?,
        None => std::env::current_dir().map_err(|e| Error::io("reading current directory", e))?,
    };
    let vcf_file = args.vcf_file.map(absolute).transpose()?;

    let prefix = match (&args.prefix, &vcf_file) {
        (Some(prefix), _) => prefix.clone(),
        (None, Some(vcf_file)) => derive_prefix(vcf_file),
        (None, None) => "igv_session".to_string(),
    };

    let format = if args.textfile == 1 {
        InputFormat::PlainText
    } else {
        InputFormat::Vcf
    };

    let config = ScriptConfig {
        reference: args.reference,
        tracks: args.load_files,
        variant_track: vcf_file.clone().filter(|_| format == InputFormat::Vcf),
        snapshot_dir,
        panel_height: args.height,
        window: args.window,
        display: args.view_preference,
        sort: args.sort_preference,
        view_as_pairs: args.pair == 1,
        prefix,
    };
    config.validate()?;
    debug!("Script configuration: {:?}", config);

    if args.session_only {
        let script = build_session_script(&config);
        let batch_path = args
            .batch_file
            .unwrap_or_else(|| session_batch_path(&config.prefix));
        write_batch_script(&script, &batch_path)?;
        return Ok(());
    }

    let vcf_file = vcf_file
        .ok_or_else(|| Error::configuration("--vcf-file is required unless --session-only is set"))?;

    info!("Reading variants from {}", vcf_file.display());
    let source = VariantSource::open(&vcf_file, format)?;
    let script = build_script(source, &config)?;

    let batch_path = args
        .batch_file
        .unwrap_or_else(|| default_batch_path(&vcf_file));
    let batch_path = write_batch_script(&script, &batch_path)?;

    match args.igv_jar {
        Some(jar) => {
            let runner = IgvRunner {
                java: args.java,
                memory_mb: args.memory_mb,
                ..IgvRunner::new(jar)
            };
            runner.run(&batch_path).await?;
            info!("Snapshots saved to {}", config.snapshot_dir.display());
        }
        None => info!(
            "No --igv-jar given; run the script with: igv -b {}",
            batch_path.display()
        ),
    }

    Ok(())
}
