use std::collections::BTreeSet;
use std::io::Read;

use flate2::read::GzDecoder;
use lento_splits::{read_nexus_matrix, splits_from_newick, Lento, LentoError, Split};

fn example() -> Lento {
    Lento::from_rows([
        ("A", ["1", "1", "1", "1", "0", "1", "0", "1", "1"]),
        ("B", ["1", "1", "1", "0", "0", "0", "0", "1", "0"]),
        ("C", ["1", "1", "0", "0", "1", "0", "1", "0", "0"]),
        ("D", ["1", "0", "0", "0", "0", "0", "1", "0", "1"]),
    ])
    .unwrap()
}

fn expected() -> Vec<Split> {
    vec![
        Split::with_counts(["A"], 2, 0).unwrap(),
        Split::with_counts(["C"], 1, 0).unwrap(),
        Split::with_counts(["A", "B"], 2, 1).unwrap(),
        Split::with_counts(["A", "B", "C"], 1, 2).unwrap(),
        Split::with_counts(["A", "B", "C", "D"], 1, 0).unwrap(),
        Split::with_counts(["C", "D"], 1, 2).unwrap(),
        Split::with_counts(["A", "D"], 1, 4).unwrap(),
    ]
}

#[test]
fn example_support_and_conflict() {
    let lento = example();
    let analysis = lento.analysis();
    for e in expected() {
        let found = analysis
            .get(e.taxa())
            .unwrap()
            .unwrap_or_else(|| panic!("missing split {e}"));
        assert_eq!(found, &e, "split {e}");
    }
    assert_eq!(analysis.len(), expected().len());
}

#[test]
fn example_summary() {
    let lento = example();
    let summary = lento.analysis().summary();
    assert_eq!(summary.observed, 7);
    assert_eq!(summary.supported, 9);
    assert_eq!(summary.conflicted, 9);
    assert_eq!(summary.total, lento.total_splits());
    assert_eq!(summary.total, 8);
}

#[test]
fn analysis_is_cached() {
    let lento = example();
    let first = lento.analysis();
    let second = lento.analysis();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.splits(), lento.analyze().splits());
}

#[test]
fn normalising_ratio_is_support_over_conflict() {
    let lento = example();
    let ratio = lento.analysis().normalising_ratio().unwrap();
    assert!((ratio - 1.0).abs() < f64::EPSILON);
}

#[test]
fn report_rows() {
    let report = example().analysis().write().unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "1\t2\t1\t1.000000\tA:B");
    assert_eq!(lines[1], "2\t2\t0\t0.000000\tA");
    assert_eq!(lines[6], "7\t1\t4\t4.000000\tA:D");
    assert!(!report.ends_with('\n'));
}

#[test]
fn report_to_plain_and_gzip_files() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = example().analyze();
    let expected = analysis.write().unwrap();

    let plain = dir.path().join("lento.tsv");
    analysis.write_to(&plain).unwrap();
    assert_eq!(std::fs::read_to_string(&plain).unwrap(), expected);

    let gz = dir.path().join("lento.tsv.gz");
    analysis.write_to(&gz).unwrap();
    let mut decoded = String::new();
    GzDecoder::new(std::fs::File::open(&gz).unwrap())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, expected);
}

#[test]
fn write_to_stdout_marker_is_rejected() {
    let err = example().analyze().write_to("-").unwrap_err();
    assert!(matches!(err, LentoError::Io(_)));
}

#[test]
fn tree_example_has_eleven_splits() {
    let splits = splits_from_newick("(A,((B,C),(D,(E,F))));").unwrap();
    let labels: BTreeSet<String> = splits.iter().map(Split::label).collect();
    let expected: BTreeSet<String> = [
        "A", "B", "C", "D", "E", "F", "B:C", "E:F", "D:E:F", "B:C:D:E:F", "A:B:C:D:E:F",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    assert_eq!(splits.len(), 11);
    assert_eq!(labels, expected);
    assert!(splits.iter().all(|s| s.support() == 1 && s.conflict() == 0));
}

#[test]
fn matrix_of_tree_splits_round_trips() {
    let tree_splits = splits_from_newick("(A,((B,C),(D,(E,F))));").unwrap();
    let lento = Lento::from_rows(["A", "B", "C", "D", "E", "F"].map(|taxon| {
        let row: Vec<&str> = tree_splits
            .iter()
            .map(|s| if s.contains(taxon) { "1" } else { "0" })
            .collect();
        (taxon, row)
    }))
    .unwrap();

    let analysis = lento.analysis();
    let derived: BTreeSet<String> = analysis.splits().iter().map(Split::label).collect();
    let from_tree: BTreeSet<String> = tree_splits.iter().map(Split::label).collect();
    assert_eq!(derived, from_tree);
    assert!(analysis.splits().iter().all(|s| s.support() == 1 && s.conflict() == 0));

    // tree-like data has nothing to normalise against
    assert!(matches!(analysis.normalising_ratio(), Err(LentoError::NoConflict)));
    assert!(matches!(analysis.write(), Err(LentoError::NoConflict)));
}

#[test]
fn duplicate_columns_accumulate_support() {
    let lento = Lento::from_rows([("A", ["1", "1", "1"]), ("B", ["1", "1", "0"]), ("C", ["0", "0", "1"])]).unwrap();
    let analysis = lento.analysis();
    let ab = analysis.get(["B", "A"]).unwrap().unwrap();
    assert_eq!(ab.support(), 2);
    assert_eq!(ab.conflict(), 1);
    assert_eq!(analysis.len(), 2);
}

#[test]
fn reads_nexus_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("example.nex");
    std::fs::write(
        &path,
        "#NEXUS\nBEGIN DATA;\n  DIMENSIONS NTAX=4 NCHAR=9;\n  FORMAT DATATYPE=STANDARD SYMBOLS=\"01\";\n  MATRIX\n  A 111101011\n  B 111000010\n  C 110010100\n  D 100000101\n  ;\nEND;\n",
    )
    .unwrap();

    let lento = Lento::new(read_nexus_matrix(&path).unwrap()).unwrap();
    assert_eq!(lento.analysis().write().unwrap(), example().analysis().write().unwrap());
}

#[test]
fn missing_nexus_file_is_an_io_error() {
    let err = read_nexus_matrix("definitely/not/here.nex").unwrap_err();
    assert!(matches!(err, LentoError::Io(_)));
}
