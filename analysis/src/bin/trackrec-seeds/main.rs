use anyhow::{ensure, Context, Result};
use clap::Parser;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use trackrec_analysis::{seed_record, SpacePointRecord};
use trackrec_seeding::{
    AlignmentCovariance, PhiNeighborBinFinder, SeedFinder, SeedingConfig, StandardSeedFilter,
};

#[derive(Parser)]
#[command(author, version)]
#[command(about = "Find track seeds in the spacepoints of one event", long_about = None)]
struct Args {
    /// CSV file with one `x,y,z` spacepoint per row (mm).
    file: PathBuf,
    /// RON file overriding the default seeding configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the seeds to `OUTPUT` instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print details about the indexed spacepoints and the seeds found.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            ron::from_str::<SeedingConfig>(&contents)
                .with_context(|| format!("failed to parse `{}`", path.display()))?
        }
        None => SeedingConfig::default(),
    };
    let finder = SeedFinder::try_from(config).context("invalid seeding configuration")?;

    let mut reader = csv::Reader::from_path(&args.file)
        .with_context(|| format!("failed to open `{}`", args.file.display()))?;
    let spacepoints = reader
        .deserialize()
        .collect::<Result<Vec<SpacePointRecord>, _>>()
        .with_context(|| format!("invalid spacepoint in `{}`", args.file.display()))?;
    ensure!(!spacepoints.is_empty(), "empty input file");

    let grid = finder.build_grid(&spacepoints, &AlignmentCovariance);
    if args.verbose {
        let size = grid.size();
        eprintln!(
            "indexed {} of {} spacepoints into a {}x{} grid",
            grid.num_spacepoints(),
            spacepoints.len(),
            size.phi_bins,
            size.z_bins
        );
    }
    let seed_filter = StandardSeedFilter::default();
    // Cells are independent once the grid is built; fan them out and keep
    // the per-cell output slots in natural cell order.
    let cells: Vec<_> = grid.cells().collect();
    let progress = ProgressBar::new(cells.len().try_into().unwrap()).with_style(
        ProgressStyle::with_template("[{bar:25}] {percent}%, ETA: {eta}")
            .unwrap()
            .progress_chars("=> "),
    );
    let per_cell: Vec<_> = cells
        .into_par_iter()
        .progress_with(progress)
        .map(|cell| finder.seeds_in_cell(&grid, cell, &PhiNeighborBinFinder, &seed_filter))
        .collect();

    let mut writer: csv::Writer<Box<dyn std::io::Write>> = match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create `{}`", path.display()))?;
            csv::Writer::from_writer(Box::new(file))
        }
        None => csv::Writer::from_writer(Box::new(std::io::stdout())),
    };
    for seed in per_cell.iter().flatten() {
        writer
            .serialize(seed_record(&spacepoints, seed))
            .context("failed to write seed")?;
    }
    writer.flush().context("failed to write seeds")?;
    if args.verbose {
        let num_seeds: usize = per_cell.iter().map(Vec::len).sum();
        let num_occupied = per_cell.iter().filter(|seeds| !seeds.is_empty()).count();
        eprintln!("found {num_seeds} seeds in {num_occupied} cells");
    }

    Ok(())
}
