//! Loading of the tab-separated reactivity tables written by the `analyze`
//! step (`peptides_compounds.tsv`, `peptides_chemotypes.tsv`,
//! `proteins_chemotypes.tsv`)
use super::*;
use memchr::{memchr_iter, Memchr};
use std::io::prelude::*;

/// Generalized wrapper around [`Memchr`] iterator for splitting `&[u8]` slices
/// by a byte.
struct Pitchfork<'a> {
    pos: usize,
    haystack: &'a [u8],
    inner: Memchr<'a>,
}

impl<'a> Pitchfork<'a> {
    pub fn new(needle: u8, haystack: &'a [u8]) -> Self {
        Self {
            pos: 0,
            haystack,
            inner: memchr_iter(needle, haystack),
        }
    }
}

impl<'a> Iterator for Pitchfork<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let end = match self.inner.next() {
            Some(e) => e,
            None => {
                if self.pos < self.haystack.len() {
                    self.haystack.len()
                } else {
                    return None;
                }
            }
        };
        let slice = &self.haystack[self.pos..end];
        self.pos = end + 1;
        Some(slice)
    }
}

/// Split one line into its fields. Unlike a plain [`Pitchfork`], a trailing
/// empty field is kept, since an unquantified last column is written as
/// nothing after the final tab.
fn fields(line: &[u8]) -> Vec<&[u8]> {
    let mut v = Pitchfork::new(b'\t', line).collect::<Vec<_>>();
    if line.is_empty() || line.last() == Some(&b'\t') {
        v.push(&[]);
    }
    v
}

fn strip_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}

/// Position of every metadata column within a header
#[derive(Default)]
struct Layout {
    meta: Vec<MetaColumn>,
}

impl Layout {
    fn index(&self, column: MetaColumn) -> Option<usize> {
        self.meta.iter().position(|&m| m == column)
    }
}

/// Split a header into its metadata prefix and reactivity columns, checking
/// that every metadata column the table kind needs is present
fn read_header(path: &str, kind: TableKind, header: &[&str]) -> Result<(Layout, Vec<String>)> {
    let mut layout = Layout::default();
    for name in header {
        match MetaColumn::from_name(name) {
            Some(m) if layout.meta.contains(&m) => {
                return Err(Error::schema(path, format!("duplicate column {:?}", name)));
            }
            Some(m) => layout.meta.push(m),
            None => break,
        }
    }

    let columns = header[layout.meta.len()..]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();

    if let Some(name) = columns.iter().find(|c| MetaColumn::from_name(c).is_some()) {
        return Err(Error::schema(
            path,
            format!("metadata column {:?} found after reactivity columns", name),
        ));
    }

    let mut seen = HashSet::new();
    for name in &columns {
        if name.trim().is_empty() {
            return Err(Error::schema(path, "unnamed reactivity column"));
        }
        if !seen.insert(name.as_str()) {
            return Err(Error::schema(path, format!("duplicate column {:?}", name)));
        }
    }

    let missing = kind
        .required()
        .iter()
        .filter(|m| !layout.meta.contains(m))
        .map(|m| m.name())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(Error::schema(
            path,
            format!("missing required column(s) {}", missing.join(", ")),
        ));
    }

    if columns.is_empty() {
        return Err(Error::schema(path, "no reactivity columns after metadata"));
    }

    Ok((layout, columns))
}

struct Line<'a> {
    path: &'a str,
    number: usize,
}

impl<'a> Line<'a> {
    fn malformed(&self, column: &str, value: &str) -> Error {
        Error::MalformedValue {
            path: self.path.into(),
            line: self.number,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Parse a ratio. An empty cell is an unquantified ratio.
    fn ratio(&self, column: &str, value: &str) -> Result<Option<f64>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| self.malformed(column, value))
    }

    fn site(&self, value: &str) -> Result<Option<Residue>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<Residue>()
            .map(Some)
            .map_err(|_| self.malformed(MetaColumn::Site.name(), value))
    }
}

fn read_row(line: &Line, layout: &Layout, columns: &[String], fields: &[&str]) -> Result<Row> {
    let text = |m: MetaColumn| layout.index(m).map(|i| fields[i]);

    let mut row = Row {
        accession: text(MetaColumn::Accession).unwrap_or_default().into(),
        gene_name: text(MetaColumn::GeneName).map(String::from),
        description: text(MetaColumn::Description).unwrap_or_default().into(),
        sequence: text(MetaColumn::Sequence).map(String::from),
        ..Row::default()
    };

    if let Some(s) = text(MetaColumn::Site) {
        row.site = line.site(s)?;
    }
    if let Some(s) = text(MetaColumn::MaxRatio) {
        row.max_ratio = line.ratio(MetaColumn::MaxRatio.name(), s)?;
    }
    if let Some(s) = text(MetaColumn::AverageRatio) {
        row.average_ratio = line.ratio(MetaColumn::AverageRatio.name(), s)?;
    }

    let offset = layout.meta.len();
    row.ratios = columns
        .iter()
        .zip(&fields[offset..])
        .map(|(c, v)| line.ratio(c, v))
        .collect::<Result<Vec<_>>>()?;

    if row.site.is_none() && layout.index(MetaColumn::Site).is_some() {
        return Err(line.malformed(MetaColumn::Site.name(), ""));
    }

    Ok(row)
}

impl Table {
    /// Load a tab-separated reactivity table from disk
    pub fn load<P: AsRef<Path>>(path: P, kind: TableKind) -> Result<Table> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        fs::File::open(path)
            .and_then(|mut f| f.read_to_end(&mut buffer))
            .map_err(|e| Error::open(path, e))?;

        let name = path.display().to_string();
        let table = Table::parse(&name, kind, &buffer)?;
        log::debug!(
            "{}: {} rows, {} reactivity columns",
            name,
            table.rows.len(),
            table.columns.len()
        );
        Ok(table)
    }

    /// Parse a table from an in-memory buffer. `path` is only used to label
    /// errors.
    pub fn parse(path: &str, kind: TableKind, buffer: &[u8]) -> Result<Table> {
        let text = std::str::from_utf8(buffer)
            .map_err(|e| Error::schema(path, format!("not valid UTF-8: {}", e)))?;

        let mut lines = Pitchfork::new(b'\n', text.as_bytes())
            .map(strip_cr)
            .enumerate()
            .filter(|(_, l)| !l.is_empty());

        let header = match lines.next() {
            Some((_, h)) => fields(h),
            None => return Err(Error::schema(path, "empty file")),
        };
        // Every slice is a sub-slice of a valid `str` split on ASCII bytes
        let as_str = |f: &[u8]| std::str::from_utf8(f).unwrap_or_default().to_string();
        let header = header.into_iter().map(as_str).collect::<Vec<_>>();
        let header = header.iter().map(|s| s.as_str()).collect::<Vec<_>>();
        let (layout, columns) = read_header(path, kind, &header)?;

        let mut rows = Vec::new();
        for (idx, buf) in lines {
            let line = Line {
                path,
                number: idx + 1,
            };
            let owned = fields(buf).into_iter().map(as_str).collect::<Vec<_>>();
            if owned.len() != header.len() {
                return Err(Error::schema(
                    path,
                    format!(
                        "line {} has {} fields, header has {}",
                        line.number,
                        owned.len(),
                        header.len()
                    ),
                ));
            }
            let owned = owned.iter().map(|s| s.as_str()).collect::<Vec<_>>();
            rows.push(read_row(&line, &layout, &columns, &owned)?);
        }

        Ok(Table {
            kind,
            path: path.into(),
            metadata: layout.meta,
            columns,
            rows,
        })
    }
}
