//! The manuscript panels, each computed from one reactivity table, and the
//! writers that turn them into small CSV files
use super::*;
use serde::Serialize;
use std::io::prelude::*;

/// One or more histograms sharing the same buckets, written side by side
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    /// Header of the bucket label column
    pub label: &'static str,
    pub series: Vec<(&'static str, Histogram)>,
}

impl Distribution {
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut w = csv::Writer::from_path(path)?;

        let mut header = vec![self.label];
        header.extend(self.series.iter().map(|(name, _)| *name));
        w.write_record(&header)?;

        let labels = match self.series.first() {
            Some((_, h)) => h.labels(),
            None => Vec::new(),
        };
        for (idx, label) in labels.into_iter().enumerate() {
            let mut record = vec![label];
            for (_, h) in &self.series {
                record.push(h.counts().get(idx).copied().unwrap_or_default().to_string());
            }
            w.write_record(&record)?;
        }
        w.flush()?;
        Ok(())
    }
}

/// Distribution of liganded lysines by the number of distinct compounds that
/// ligand them (left half of figure 2b)
pub fn compounds_per_lysine(peptides: Table) -> Result<Distribution> {
    let agg = Aggregation::new(&peptides.deduplicate(), Grouping::Compound, Level::Peptide)?;
    Ok(Distribution {
        label: "Distinct compounds",
        series: vec![("Number of liganded lysines", agg.histogram(10))],
    })
}

/// Distribution of liganded proteins by the number of distinct chemotypes
/// that ligand them (right half of figure 2b)
pub fn chemotypes_per_protein(proteins: Table) -> Result<Distribution> {
    let agg = Aggregation::new(&proteins, Grouping::Chemotype, Level::Protein)?;
    Ok(Distribution {
        label: "Distinct chemotypes",
        series: vec![("Number of liganded proteins", agg.histogram(10))],
    })
}

/// Competitors and liganded peptides per protein (figure 2d)
pub fn competitors_per_protein(peptides: Table) -> Result<Distribution> {
    let agg = Aggregation::new(&peptides.deduplicate(), Grouping::Compound, Level::Protein)?;
    let overflow = Histogram::DEFAULT_OVERFLOW;
    Ok(Distribution {
        label: "Count",
        series: vec![
            ("Number of competitors", agg.histogram(overflow)),
            ("Liganded peptides per protein", agg.row_histogram(overflow)),
        ],
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupSharing {
    pub chemotype: String,
    pub unique: usize,
    pub shared: usize,
}

/// Lysines liganded by a single chemotype versus several (figure 2c)
pub fn chemotype_sharing(peptides: Table) -> Result<Vec<GroupSharing>> {
    let agg = Aggregation::new(&peptides.deduplicate(), Grouping::Chemotype, Level::Peptide)?;
    Ok(agg
        .groups
        .iter()
        .zip(agg.sharing())
        .map(|(g, s)| GroupSharing {
            chemotype: g.clone(),
            unique: s.unique,
            shared: s.shared,
        })
        .collect())
}

/// Liganded versus unliganded peptides or proteins (figure 4a). Peptide
/// tables are deduplicated and counted per site, protein tables per protein.
pub fn liganded_partition(table: Table) -> Result<Partition> {
    let (table, level) = match table.kind {
        TableKind::Peptide => (table.deduplicate(), Level::Peptide),
        TableKind::Protein => (table, Level::Protein),
    };
    Ok(Aggregation::new(&table, Grouping::Chemotype, level)?.partition())
}

/// Write a partition as two `Label, count` lines, with `noun` naming what
/// was counted (`"peptides"` or `"proteins"`)
pub fn write_partition<P: AsRef<Path>>(path: P, noun: &str, p: &Partition) -> Result<()> {
    let mut f = io::BufWriter::new(fs::File::create(path)?);
    writeln!(f, "Liganded {}, {}", noun, p.liganded)?;
    writeln!(f, "Unliganded {}, {}", noun, p.unliganded)?;
    f.flush()?;
    Ok(())
}

/// A peptide together with the manuscript codes of every compound that
/// ligands it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HitCompounds {
    pub accession: String,
    pub gene_name: String,
    pub description: String,
    pub sequence: String,
    pub site: Option<Residue>,
    pub max_ratio: Option<f64>,
    pub average_ratio: Option<f64>,
    pub hit_compounds: String,
}

/// List the liganding compounds of every peptide, by manuscript code.
/// Compounds without a code are reported once and left out.
pub fn hit_compounds(peptides: &Table, codes: &CodeBook) -> Vec<HitCompounds> {
    let names = peptides
        .columns
        .iter()
        .map(|c| {
            let name = compound_name(c);
            match codes.lookup(name) {
                Ok(code) => Some(code),
                Err(e) => {
                    log::warn!("no code for column {:?}, ignoring its hits: {}", c, e);
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    peptides
        .rows
        .iter()
        .map(|row| {
            let hits = row
                .liganded_columns()
                .filter_map(|idx| names[idx])
                .collect::<BTreeSet<_>>();
            HitCompounds {
                accession: row.accession.clone(),
                gene_name: row.derived_gene_name().into(),
                description: row.description.clone(),
                sequence: row.sequence.clone().unwrap_or_default(),
                site: row.site,
                max_ratio: row.max_ratio,
                average_ratio: row.average_ratio,
                hit_compounds: hits.into_iter().collect::<Vec<_>>().join(","),
            }
        })
        .collect()
}

/// Serialize a list of records into a CSV file with a header line
pub fn write_records<P: AsRef<Path>, T: Serialize>(path: P, records: &[T]) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    for r in records {
        w.serialize(r)?;
    }
    w.flush()?;
    Ok(())
}

fn ratio_field(r: Option<f64>) -> String {
    r.map(|x| x.to_string()).unwrap_or_default()
}

/// Write a table with its reactivity columns renamed to manuscript codes,
/// and the gene name taken from the description
pub fn write_renamed<P: AsRef<Path>>(path: P, table: &Table, codes: &CodeBook) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;

    let mut header = table
        .metadata
        .iter()
        .map(|m| m.name().to_string())
        .collect::<Vec<_>>();
    if !table.has(MetaColumn::GeneName) {
        header.push(MetaColumn::GeneName.name().into());
    }
    header.extend(table.columns.iter().map(|c| codes.rename_column(c)));
    w.write_record(&header)?;

    for row in &table.rows {
        let mut record = table
            .metadata
            .iter()
            .map(|m| match m {
                MetaColumn::Accession => row.accession.clone(),
                MetaColumn::GeneName => row.derived_gene_name().into(),
                MetaColumn::Description => row.description.clone(),
                MetaColumn::Sequence => row.sequence.clone().unwrap_or_default(),
                MetaColumn::Site => row.site.map(|s| s.to_string()).unwrap_or_default(),
                MetaColumn::MaxRatio => ratio_field(row.max_ratio),
                MetaColumn::AverageRatio => ratio_field(row.average_ratio),
            })
            .collect::<Vec<_>>();
        if !table.has(MetaColumn::GeneName) {
            record.push(row.derived_gene_name().into());
        }
        record.extend(row.ratios.iter().copied().map(ratio_field));
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}
