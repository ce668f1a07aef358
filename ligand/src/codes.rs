//! Translation of internal compound names into the codes used in the
//! manuscript, as listed in `manuscript_codes.json`
use super::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Cell lines that experiments were run in
pub const CELL_LINES: [&str; 2] = ["231", "Ramos"];

/// Compounds left out of the experiment table
pub const EXCLUDED_COMPOUNDS: [&str; 4] = ["28q", "28r", "28s", "28t"];

/// Mapping of internal compound names to manuscript codes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CodeBook {
    /// Kept sorted by key, which fixes the order of substring lookups
    codes: BTreeMap<String, String>,
}

impl FromIterator<(String, String)> for CodeBook {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        CodeBook {
            codes: iter.into_iter().collect(),
        }
    }
}

impl CodeBook {
    /// Load a JSON object of `name -> code` pairs
    pub fn load<P: AsRef<Path>>(path: P) -> Result<CodeBook> {
        let path = path.as_ref();
        let f = fs::File::open(path).map_err(|e| Error::open(path, e))?;
        let codes: BTreeMap<String, String> = serde_json::from_reader(io::BufReader::new(f))?;
        log::debug!("{}: {} manuscript codes", path.display(), codes.len());
        Ok(CodeBook { codes })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Exact key match only
    pub fn get(&self, token: &str) -> Option<&str> {
        self.codes.get(token).map(|s| s.as_str())
    }

    /// Resolve a compound token to its manuscript code
    ///
    /// An exact key match wins. Otherwise the first key, in sorted key
    /// order, that occurs as a substring of `token` is used. Tokens that
    /// contain more than one key are ambiguous; the choice is logged.
    pub fn lookup(&self, token: &str) -> Result<&str> {
        if let Some(code) = self.get(token) {
            return Ok(code);
        }

        let mut matches = self.codes.iter().filter(|(k, _)| token.contains(k.as_str()));
        let (key, code) = matches.next().ok_or_else(|| Error::LookupMiss {
            token: token.into(),
        })?;

        let others = matches.map(|(k, _)| k.as_str()).collect::<Vec<_>>();
        if !others.is_empty() {
            log::warn!(
                "{:?} matches several codes, using {:?} (also matched {:?})",
                token,
                key,
                others
            );
        }
        Ok(code.as_str())
    }

    /// Rename a `Compound_Concentration` column to `Code_Concentration`
    ///
    /// Columns without a concentration suffix are returned unchanged, and so
    /// are columns whose compound has no code.
    pub fn rename_column(&self, column: &str) -> String {
        let (name, conc) = match column.split_once('_') {
            Some(parts) => parts,
            None => return column.into(),
        };
        let conc = conc.split('_').next().unwrap_or_default();
        match self.lookup(name) {
            Ok(code) => format!("{}_{}", code, conc),
            Err(e) => {
                log::warn!("keeping column {:?}: {}", column, e);
                column.into()
            }
        }
    }
}

/// Details recovered from one experiment file name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Experiment {
    pub compound: String,
    pub cell_line: String,
}

/// Parse a line of the experiment listing, e.g.
/// `abbasov/MIKA-KB02_231_25uM_rep1.combined`
pub fn parse_experiment(line: &str, codes: &CodeBook) -> Result<Experiment> {
    let name = line.trim();
    let name = name.rsplit('/').next().unwrap_or(name);
    let name = name.replace("MIKA-", "").replace(".combined", "");

    let mut compound: Option<&str> = None;
    let mut cell_line = None;
    for token in name.split('_') {
        if let Some(code) = codes.get(token) {
            compound = Some(code);
        } else if CELL_LINES.contains(&token) {
            cell_line = Some(token);
        } else if compound.is_none() {
            compound = codes.lookup(token).ok();
        }
    }

    match (compound, cell_line) {
        (Some(c), Some(l)) => Ok(Experiment {
            compound: c.into(),
            cell_line: l.into(),
        }),
        _ => Err(Error::LookupMiss {
            token: name.clone(),
        }),
    }
}

/// One line of the experiment table
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExperimentCount {
    #[serde(rename = "Compound")]
    pub compound: String,
    #[serde(rename = "231 datasets")]
    pub mda_mb_231: usize,
    #[serde(rename = "Ramos datasets")]
    pub ramos: usize,
}

/// Count datasets per compound and cell line from an `expts` listing.
/// Unresolvable lines are reported and skipped.
pub fn count_experiments(listing: &str, codes: &CodeBook) -> Vec<ExperimentCount> {
    let mut counts: BTreeMap<String, ExperimentCount> = BTreeMap::new();
    for line in listing.lines().filter(|l| !l.trim().is_empty()) {
        let ex = match parse_experiment(line, codes) {
            Ok(ex) => ex,
            Err(e) => {
                log::warn!("skipping experiment {:?}: {}", line.trim(), e);
                continue;
            }
        };
        let entry = counts
            .entry(ex.compound.clone())
            .or_insert_with(|| ExperimentCount {
                compound: ex.compound.clone(),
                ..ExperimentCount::default()
            });
        match ex.cell_line.as_str() {
            "231" => entry.mda_mb_231 += 1,
            _ => entry.ramos += 1,
        }
    }

    counts
        .into_iter()
        .filter(|(cmpd, _)| !EXCLUDED_COMPOUNDS.contains(&cmpd.as_str()))
        .map(|(_, c)| c)
        .collect()
}
