//! Generate the CSV tables behind the manuscript figures from the
//! ligandability tables in the data directory, and package them.
//!
//! ```bash
//! # Everything, reading ./*.tsv and writing ./figures
//! figures
//!
//! # A single panel, with debug logging
//! figures -vv --data ./data --out ./out fig2d
//! ```
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ligand::report::*;
use ligand::*;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const PEPTIDES_COMPOUNDS: &str = "peptides_compounds.tsv";
const PEPTIDES_CHEMOTYPES: &str = "peptides_chemotypes.tsv";
const PROTEINS_CHEMOTYPES: &str = "proteins_chemotypes.tsv";
const MANUSCRIPT_CODES: &str = "manuscript_codes.json";
const EXPERIMENTS: &str = "expts";
const SPREADSHEET: &str = "processed_excel.xlsx";
const ARCHIVE: &str = "figures.zip";

#[derive(Parser)]
#[command(name = "figures")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the input tables
    #[arg(long, value_name = "DIR", default_value = ".")]
    data: PathBuf,

    /// Directory the CSV tables and archive are written to
    #[arg(long, value_name = "DIR", default_value = "figures")]
    out: PathBuf,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Panels to generate; all of them when none are given
    #[arg(value_enum)]
    targets: Vec<Target>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Target {
    Fig2bLeft,
    Fig2bRight,
    Fig2c,
    Fig2d,
    Fig4a,
    HitCompounds,
    Renamed,
    Experiments,
    Package,
}

impl Target {
    const ALL: [Target; 9] = [
        Target::Fig2bLeft,
        Target::Fig2bRight,
        Target::Fig2c,
        Target::Fig2d,
        Target::Fig4a,
        Target::HitCompounds,
        Target::Renamed,
        Target::Experiments,
        Target::Package,
    ];
}

struct Paths {
    data: PathBuf,
    out: PathBuf,
}

impl Paths {
    fn input(&self, name: &str) -> PathBuf {
        self.data.join(name)
    }

    fn output(&self, name: &str) -> PathBuf {
        self.out.join(name)
    }

    fn table(&self, name: &str, kind: TableKind) -> Result<Table> {
        let path = self.input(name);
        Table::load(&path, kind).with_context(|| format!("loading {}", path.display()))
    }

    fn codes(&self) -> Result<CodeBook> {
        let path = self.input(MANUSCRIPT_CODES);
        CodeBook::load(&path).with_context(|| format!("loading {}", path.display()))
    }
}

fn written(path: &Path) {
    info!("wrote {}", path.display());
}

fn run(target: Target, paths: &Paths) -> Result<()> {
    match target {
        Target::Fig2bLeft => {
            let d = compounds_per_lysine(paths.table(PEPTIDES_COMPOUNDS, TableKind::Peptide)?)?;
            let path = paths.output("figure 2b left.csv");
            d.write(&path)?;
            written(&path);
        }
        Target::Fig2bRight => {
            let d = chemotypes_per_protein(paths.table(PROTEINS_CHEMOTYPES, TableKind::Protein)?)?;
            let path = paths.output("figure 2b right.csv");
            d.write(&path)?;
            written(&path);
        }
        Target::Fig2c => {
            let s = chemotype_sharing(paths.table(PEPTIDES_CHEMOTYPES, TableKind::Peptide)?)?;
            let path = paths.output("figure 2c.csv");
            write_records(&path, &s)?;
            written(&path);
        }
        Target::Fig2d => {
            let d = competitors_per_protein(paths.table(PEPTIDES_COMPOUNDS, TableKind::Peptide)?)?;
            let path = paths.output("figure 2d.csv");
            d.write(&path)?;
            written(&path);
        }
        Target::Fig4a => {
            let p = liganded_partition(paths.table(PEPTIDES_CHEMOTYPES, TableKind::Peptide)?)?;
            let path = paths.output("figure 4a left.csv");
            write_partition(&path, "peptides", &p)?;
            written(&path);

            let p = liganded_partition(paths.table(PROTEINS_CHEMOTYPES, TableKind::Protein)?)?;
            let path = paths.output("figure 4a right.csv");
            write_partition(&path, "proteins", &p)?;
            written(&path);
        }
        Target::HitCompounds => {
            let t = paths.table(PEPTIDES_COMPOUNDS, TableKind::Peptide)?;
            let hits = hit_compounds(&t, &paths.codes()?);
            let path = paths.output("hit_compounds.csv");
            write_records(&path, &hits)?;
            written(&path);
        }
        Target::Renamed => {
            let t = paths.table(PEPTIDES_COMPOUNDS, TableKind::Peptide)?;
            let path = paths.output("renamed.csv");
            write_renamed(&path, &t, &paths.codes()?)?;
            written(&path);
        }
        Target::Experiments => {
            let listing = paths.input(EXPERIMENTS);
            let text = fs::read_to_string(&listing)
                .with_context(|| format!("reading {}", listing.display()))?;
            let counts = codes::count_experiments(&text, &paths.codes()?);
            let path = paths.output("Tab2Experiments.csv");
            write_records(&path, &counts)?;
            written(&path);
        }
        Target::Package => {
            archive::package(
                paths.out.clone(),
                paths.input(SPREADSHEET),
                paths.output(ARCHIVE),
            )
            .context("packaging figures")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let paths = Paths {
        data: cli.data,
        out: cli.out,
    };
    fs::create_dir_all(&paths.out)
        .with_context(|| format!("creating {}", paths.out.display()))?;

    let mut targets = if cli.targets.is_empty() {
        Target::ALL.to_vec()
    } else {
        cli.targets
    };
    // Packaging picks up whatever the other targets wrote, so it runs last
    targets.sort_by_key(|t| *t == Target::Package);

    for target in targets {
        run(target, &paths).with_context(|| format!("generating {:?}", target))?;
    }
    Ok(())
}
