use ligand::report::*;
use ligand::*;
use std::fs;
use std::io::Read;
use std::path::Path;

const PEPTIDES_COMPOUNDS: &str = "\
accession\tgene_name\tdescription\tsequence\tsite\tmax_ratio\taverage_ratio\tKB02_25\tKB02_50\tKB03_25\tHA17_25\tDAPG1_25\tSF21_25\tHA15_25
P1\tAAA1\tAAA1 protein one\tK.AK*.R\t5\t20\t8\t20\t6\t5\t4\t4\t4\t4
P1\tAAA1\tAAA1 protein one\tK.CK*.R\t9\t2\t1\t2\t1\t1\t1\t1\t1\t1
P2\tBBB2\tBBB2 protein two\tK.DK*.R\t3\t4\t4\t\t\t\t4\t\t\t
P2\tBBB2\tBBB2 protein two, isoform 2\tK.DK*.R\t3\t4\t4\t\t\t\t4\t\t\t
P3\tCCC3\tCCC3 protein three\tK.EK*.R\t7\t1\t1\t1\t1\t1\t1\t1\t1\t1
";

const PEPTIDES_CHEMOTYPES: &str = "\
accession\tgene_name\tdescription\tsequence\tsite\tmax_ratio\taverage_ratio\tDAPG\tScouts\tSF
P1\tAAA1\tAAA1 protein one\tK.AK*.R\t5\t20\t8\t4\t20\t1
P2\tBBB2\tBBB2 protein two\tK.DK*.R\t3\t4\t4\t\t4\t
P3\tCCC3\tCCC3 protein three\tK.EK*.R\t7\t1\t1\t1\t1\t1
";

const PROTEINS_CHEMOTYPES: &str = "\
accession\tdescription\tmax_ratio\taverage_ratio\tDAPG\tScouts\tSF
P1\tAAA1 protein one\t20\t8\t4\t20\t1
P2\tBBB2 protein two\t4\t4\t\t4\t
P3\tCCC3 protein three\t1\t1\t1\t1\t1
";

const CODES: &str = r#"{"KB02": "1", "KB03": "2", "HA17": "7", "DAPG1": "28q", "SF21": "20"}"#;

fn setup(dir: &Path) {
    fs::write(dir.join("peptides_compounds.tsv"), PEPTIDES_COMPOUNDS).unwrap();
    fs::write(dir.join("peptides_chemotypes.tsv"), PEPTIDES_CHEMOTYPES).unwrap();
    fs::write(dir.join("proteins_chemotypes.tsv"), PROTEINS_CHEMOTYPES).unwrap();
    fs::write(dir.join("manuscript_codes.json"), CODES).unwrap();
}

#[test]
fn compound_panels() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let path = dir.path().join("peptides_compounds.tsv");

    let t = Table::load(&path, TableKind::Peptide).unwrap();
    assert_eq!(t.rows.len(), 5);
    assert_eq!(t.clone().deduplicate().rows.len(), 4);

    // P1_5 is hit by six distinct compounds, P2_3 by one
    let d = compounds_per_lysine(t.clone()).unwrap();
    let h = &d.series[0].1;
    assert_eq!(h.counts()[0], 1);
    assert_eq!(h.counts()[5], 1);
    assert_eq!(h.total(), 2);

    let d = competitors_per_protein(t).unwrap();
    assert_eq!(d.series[0].1.counts(), &[1, 0, 0, 0, 0, 1]);
    assert_eq!(d.series[1].1.counts(), &[2, 0, 0, 0, 0, 0]);

    let out = dir.path().join("figure 2d.csv");
    d.write(&out).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        "Count,Number of competitors,Liganded peptides per protein\n\
         1,1,2\n2,0,0\n3,0,0\n4,0,0\n5,0,0\n>=6,1,0\n"
    );
}

#[test]
fn chemotype_panels() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());

    let peptides = Table::load(dir.path().join("peptides_chemotypes.tsv"), TableKind::Peptide)
        .unwrap();
    let proteins = Table::load(dir.path().join("proteins_chemotypes.tsv"), TableKind::Protein)
        .unwrap();

    let sharing = chemotype_sharing(peptides.clone()).unwrap();
    assert_eq!(
        sharing,
        vec![
            GroupSharing {
                chemotype: "DAPG".into(),
                unique: 0,
                shared: 1
            },
            GroupSharing {
                chemotype: "Scouts".into(),
                unique: 1,
                shared: 1
            },
            GroupSharing {
                chemotype: "SF".into(),
                unique: 0,
                shared: 0
            },
        ]
    );

    let p = liganded_partition(peptides).unwrap();
    assert_eq!((p.liganded, p.unliganded), (2, 1));
    let p = liganded_partition(proteins.clone()).unwrap();
    assert_eq!((p.liganded, p.unliganded), (2, 1));

    let d = chemotypes_per_protein(proteins).unwrap();
    let h = &d.series[0].1;
    assert_eq!(h.overflow(), 10);
    assert_eq!(&h.counts()[..3], &[1, 1, 0]);
}

#[test]
fn protein_table_rejects_peptide_schema() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let err = Table::load(dir.path().join("proteins_chemotypes.tsv"), TableKind::Peptide)
        .unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }));
}

#[test]
fn hits_rename_and_package() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let codes = CodeBook::load(dir.path().join("manuscript_codes.json")).unwrap();
    assert_eq!(codes.len(), 5);
    let t = Table::load(dir.path().join("peptides_compounds.tsv"), TableKind::Peptide).unwrap();

    let hits = hit_compounds(&t, &codes);
    assert_eq!(hits.len(), 5);
    // HA15 has no code and is left out
    assert_eq!(hits[0].hit_compounds, "1,2,20,28q,7");
    assert_eq!(hits[2].hit_compounds, "7");
    write_records(out.join("hit_compounds.csv"), &hits).unwrap();
    write_renamed(out.join("renamed.csv"), &t, &codes).unwrap();

    let renamed = fs::read_to_string(out.join("renamed.csv")).unwrap();
    assert!(renamed.lines().next().unwrap().ends_with("1_25,1_50,2_25,7_25,28q_25,20_25,HA15_25"));

    fs::write(dir.path().join("processed_excel.xlsx"), b"PK").unwrap();
    let names = archive::package(
        out.clone(),
        dir.path().join("processed_excel.xlsx"),
        dir.path().join("figures.zip"),
    )
    .unwrap();
    assert_eq!(
        names,
        vec!["hit_compounds.csv", "renamed.csv", "processed_excel.xlsx"]
    );

    let mut zip = zip::ZipArchive::new(fs::File::open(dir.path().join("figures.zip")).unwrap())
        .unwrap();
    let mut s = String::new();
    zip.by_name("renamed.csv")
        .unwrap()
        .read_to_string(&mut s)
        .unwrap();
    assert_eq!(s, renamed);
}

#[test]
fn missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let err = Table::load(dir.path().join("peptides_compounds.tsv"), TableKind::Peptide)
        .unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));
    assert!(matches!(
        CodeBook::load(dir.path().join("manuscript_codes.json")),
        Err(Error::InputNotFound { .. })
    ));
}
