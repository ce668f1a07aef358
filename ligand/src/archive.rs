//! Bundling of the generated CSV tables and the processed spreadsheet into a
//! single zip file
use super::*;
use std::io::prelude::*;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Recursively collect every file under `dir` whose name contains `.csv`.
/// Symbolic links to directories are not descended into.
fn collect_tables(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_tables(&path, out)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.contains(".csv"))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Zip every CSV table found under `dir`, plus `spreadsheet`, into
/// `archive`. Entries are stored under their bare file names; the names of
/// the packaged entries are returned in archive order.
pub fn package<P: AsRef<Path>>(dir: P, spreadsheet: P, archive: P) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let spreadsheet = spreadsheet.as_ref();
    if !spreadsheet.is_file() {
        return Err(Error::InputNotFound {
            path: spreadsheet.into(),
        });
    }

    let mut tables = Vec::new();
    collect_tables(dir, &mut tables).map_err(|e| Error::open(dir, e))?;
    tables.sort();

    let archive = archive.as_ref();
    let mut zip = ZipWriter::new(io::BufWriter::new(fs::File::create(archive)?));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut names: Vec<String> = Vec::new();
    for path in tables.iter().map(PathBuf::as_path).chain(std::iter::once(spreadsheet)) {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };
        if names.contains(&name) {
            log::warn!("{} already packaged, skipping {}", name, path.display());
            continue;
        }

        let mut buffer = Vec::new();
        fs::File::open(path)
            .and_then(|mut f| f.read_to_end(&mut buffer))
            .map_err(|e| Error::open(path, e))?;

        zip.start_file(name.as_str(), options)?;
        zip.write_all(&buffer)?;
        log::debug!("packaged {} ({} bytes)", path.display(), buffer.len());
        names.push(name);
    }

    zip.finish()?.flush()?;
    log::info!("wrote {} with {} entries", archive.display(), names.len());
    Ok(names)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn packages_tables_and_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("figures/2B")).unwrap();
        fs::write(root.join("figures/2B/figure 2b left.csv"), "a,b\n").unwrap();
        fs::write(root.join("figures/figure 2c.csv"), "c\n").unwrap();
        fs::write(root.join("figures/notes.txt"), "skip me").unwrap();
        fs::write(root.join("processed_excel.xlsx"), "xlsx").unwrap();

        let zip_path = root.join("figures.zip");
        let names = package(
            root.join("figures"),
            root.join("processed_excel.xlsx"),
            zip_path.clone(),
        )
        .unwrap();
        assert_eq!(
            names,
            vec!["figure 2b left.csv", "figure 2c.csv", "processed_excel.xlsx"]
        );

        let mut archive = zip::ZipArchive::new(fs::File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
        let mut s = String::new();
        archive
            .by_name("figure 2b left.csv")
            .unwrap()
            .read_to_string(&mut s)
            .unwrap();
        assert_eq!(s, "a,b\n");
    }

    #[test]
    fn missing_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let err = package(
            dir.path().to_path_buf(),
            dir.path().join("processed_excel.xlsx"),
            dir.path().join("figures.zip"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }

    #[test]
    fn duplicate_names_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("out/a")).unwrap();
        fs::create_dir_all(root.join("out/b")).unwrap();
        fs::write(root.join("out/a/t.csv"), "1").unwrap();
        fs::write(root.join("out/b/t.csv"), "2").unwrap();
        fs::write(root.join("sheet.xlsx"), "x").unwrap();
        let names = package(root.join("out"), root.join("sheet.xlsx"), root.join("z.zip")).unwrap();
        assert_eq!(names, vec!["t.csv", "sheet.xlsx"]);
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlink_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("out/a")).unwrap();
        fs::write(root.join("out/a/t.csv"), "1").unwrap();
        std::os::unix::fs::symlink(root.join("out"), root.join("out/a/loop")).unwrap();
        fs::write(root.join("sheet.xlsx"), "x").unwrap();
        let names = package(root.join("out"), root.join("sheet.xlsx"), root.join("z.zip")).unwrap();
        assert_eq!(names, vec!["t.csv", "sheet.xlsx"]);
    }
}
