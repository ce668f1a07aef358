use super::*;

/// Which of the shared input tables a file holds
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// One row per quantified lysine: `peptides_compounds.tsv`,
    /// `peptides_chemotypes.tsv`
    Peptide,
    /// One row per protein: `proteins_chemotypes.tsv`
    Protein,
}

/// Metadata columns that may lead a table header, in the order the
/// `analyze` step writes them
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MetaColumn {
    Accession,
    GeneName,
    Description,
    Sequence,
    Site,
    MaxRatio,
    AverageRatio,
}

impl MetaColumn {
    pub const ALL: [MetaColumn; 7] = [
        MetaColumn::Accession,
        MetaColumn::GeneName,
        MetaColumn::Description,
        MetaColumn::Sequence,
        MetaColumn::Site,
        MetaColumn::MaxRatio,
        MetaColumn::AverageRatio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MetaColumn::Accession => "accession",
            MetaColumn::GeneName => "gene_name",
            MetaColumn::Description => "description",
            MetaColumn::Sequence => "sequence",
            MetaColumn::Site => "site",
            MetaColumn::MaxRatio => "max_ratio",
            MetaColumn::AverageRatio => "average_ratio",
        }
    }

    pub fn from_name(s: &str) -> Option<MetaColumn> {
        MetaColumn::ALL.iter().copied().find(|m| m.name() == s)
    }
}

impl TableKind {
    /// Metadata columns that must be present before the reactivity columns
    pub fn required(self) -> &'static [MetaColumn] {
        use MetaColumn::*;
        match self {
            TableKind::Peptide => &[Accession, Description, Sequence, Site, MaxRatio, AverageRatio],
            TableKind::Protein => &[Accession, Description, MaxRatio, AverageRatio],
        }
    }
}

/// One line of a reactivity table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub accession: String,
    pub gene_name: Option<String>,
    pub description: String,
    pub sequence: Option<String>,
    pub site: Option<Residue>,
    pub max_ratio: Option<f64>,
    pub average_ratio: Option<f64>,
    /// One entry per reactivity column; `None` if the ratio was not
    /// quantified for that compound or chemotype
    pub ratios: Vec<Option<f64>>,
}

/// Everything in a row except accession, description and site
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DedupKey {
    gene_name: Option<String>,
    sequence: Option<String>,
    max_ratio: Option<u64>,
    average_ratio: Option<u64>,
    ratios: Vec<Option<u64>>,
}

/// The thing a row is counted towards
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    Protein(String),
    Peptide(String, Residue),
}

/// Whether rows are counted per peptide site or rolled up per protein
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Peptide,
    Protein,
}

impl Row {
    /// Indices of the reactivity columns that meet the liganding threshold
    pub fn liganded_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.ratios
            .iter()
            .enumerate()
            .filter(|(_, r)| r.map_or(false, is_liganded))
            .map(|(idx, _)| idx)
    }

    pub fn is_liganded(&self) -> bool {
        self.liganded_columns().next().is_some()
    }

    pub fn dedup_key(&self) -> DedupKey {
        let bits = |r: &Option<f64>| r.map(f64::to_bits);
        DedupKey {
            gene_name: self.gene_name.clone(),
            sequence: self.sequence.clone(),
            max_ratio: bits(&self.max_ratio),
            average_ratio: bits(&self.average_ratio),
            ratios: self.ratios.iter().map(bits).collect(),
        }
    }

    /// Gene symbol, taken from the first word of the description
    pub fn derived_gene_name(&self) -> &str {
        self.description.split(' ').next().unwrap_or_default()
    }

    pub fn entity(&self, level: Level) -> Entity {
        match level {
            Level::Protein => Entity::Protein(self.accession.clone()),
            Level::Peptide => {
                Entity::Peptide(self.accession.clone(), self.site.unwrap_or_default())
            }
        }
    }
}

/// A fully loaded reactivity table
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub kind: TableKind,
    /// File name the table was loaded from, used in error messages
    pub path: String,
    /// Metadata prefix of the header, in file order
    pub metadata: Vec<MetaColumn>,
    /// Reactivity column names (compounds or chemotypes), in file order
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Drop rows that duplicate an earlier row on every column except
    /// accession, description and site. The first occurrence is kept as-is.
    pub fn deduplicate(self) -> Table {
        let before = self.rows.len();
        let mut seen = HashSet::new();
        let rows = self
            .rows
            .into_iter()
            .filter(|row| seen.insert(row.dedup_key()))
            .collect::<Vec<_>>();

        log::debug!(
            "{}: dropped {} duplicate rows, {} remain",
            self.path,
            before - rows.len(),
            rows.len()
        );

        Table { rows, ..self }
    }

    pub fn has(&self, column: MetaColumn) -> bool {
        self.metadata.contains(&column)
    }

    /// Check that rows of this table can be counted at `level`
    pub fn check_level(&self, level: Level) -> Result<()> {
        match (self.kind, level) {
            (TableKind::Protein, Level::Peptide) => Err(Error::schema(
                &self.path,
                "peptide-level counts need a peptide table with a site column",
            )),
            _ => Ok(()),
        }
    }
}
