use clap::Parser;
use lento_splits::{is_gzip_path, plot_lento, read_nexus_matrix, Lento, PlotOptions};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Compute split support and conflict (Lento) from a NEXUS character matrix
/// and print the ranked splits as TSV.
#[derive(Parser, Debug)]
#[command(name = "lento", version, about = "Split support and conflict for a character matrix")]
struct Args {
    /// Path to a NEXUS file with a DATA or CHARACTERS block
    input: PathBuf,

    /// Write a Lento plot to this file (.svg or a bitmap format such as .png)
    #[arg(short = 'p', long = "plot")]
    plot: Option<PathBuf>,

    /// Label plot bars with the split taxa
    #[arg(long = "label", default_value_t = false)]
    label: bool,

    /// Leave singleton splits out of the plot
    #[arg(long = "nosingles", default_value_t = false)]
    nosingles: bool,

    /// Write the report to this file instead of stdout (.gz compresses)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Quiet mode: suppresses progress messages on stderr
    #[arg(short = 'q', long = "quiet", default_value_t = false)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    if !args.input.is_file() {
        eprintln!("File {} does not exist", args.input.display());
        std::process::exit(1);
    }

    // Read the matrix
    let t0 = Instant::now();
    let matrix = match read_nexus_matrix(&args.input) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.input.display());
            std::process::exit(2);
        }
    };
    let lento = match Lento::new(matrix) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Invalid matrix in {}: {e}", args.input.display());
            std::process::exit(2);
        }
    };
    let read_s = t0.elapsed().as_secs_f64();
    log_if(!args.quiet, format!("Reading in nexus {read_s:.3}s"));
    log_if(!args.quiet, format!("Read in {} taxa with {} characters", lento.ntaxa(), lento.nchar()));

    // Derive splits and conflicts
    let t1 = Instant::now();
    let analysis = lento.analysis();
    let summary = analysis.summary();
    let analyse_s = t1.elapsed().as_secs_f64();
    log_if(!args.quiet, format!("Determining splits and conflict {analyse_s:.3}s"));
    log_if(
        !args.quiet,
        format!(
            "Observed {} of {} possible splits, support {}, conflict {}",
            summary.observed, summary.total, summary.supported, summary.conflicted
        ),
    );

    let t2 = Instant::now();
    let report = match analysis.write() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to build report: {e}");
            std::process::exit(3);
        }
    };
    match &args.output {
        Some(output) => {
            if let Err(e) = lento_splits::write_report(output, &report) {
                eprintln!("Failed to write output {}: {e}", output.display());
                std::process::exit(4);
            }
            log_write_done(!args.quiet, output, t2.elapsed().as_secs_f64());
        }
        None => println!("{report}"),
    }

    if let Some(plot) = &args.plot {
        let t3 = Instant::now();
        let options = PlotOptions {
            labels: args.label,
            singles: !args.nosingles,
            ..Default::default()
        };
        if let Err(e) = plot_lento(analysis, &options, plot) {
            eprintln!("Failed to plot {}: {e}", plot.display());
            std::process::exit(5);
        }
        let plot_s = t3.elapsed().as_secs_f64();
        log_if(!args.quiet, format!("Plotting to {} {plot_s:.3}s", plot.display()));
    }
}

fn log_if(show: bool, msg: String) {
    if show { eprintln!("{}", msg); }
}

fn log_write_done(show: bool, output: &Path, secs: f64) {
    if !show { return; }
    if is_gzip_path(output) {
        eprintln!("Writing compressed report {secs:.3}s");
    } else {
        eprintln!("Writing report {secs:.3}s");
    }
}
