//! End-to-end tests: GFF3 + vmatch files in, correspondence report out

use flate2::write::GzEncoder;
use flate2::Compression;
use ilocus_mapper::core::{open_input, IlocusMapError, MappingError};
use ilocus_mapper::formats::{read_iloci, write_mapping_report, VmatchReader};
use ilocus_mapper::{IlocusMapper, MappingReport, ResolverConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const QUERY_GFF3: &str = "##gff-version 3\n\
chr1\tAEGeAn::iLocusParser\tlocus\t101\t200\t.\t+\t.\tID=locus1;Name=Q1;iLocus_type=siLocus\n\
chr1\tAEGeAn::iLocusParser\tgene\t121\t180\t.\t+\t.\tID=gene1;Parent=locus1\n\
chr1\tAEGeAn::iLocusParser\tlocus\t1001\t1100\t.\t-\t.\tID=locus2;Name=Q2;iLocus_type=siLocus\n\
chr1\tAEGeAn::iLocusParser\tlocus\t2001\t2300\t.\t.\t.\tID=locus3;Name=Q3;iLocus_type=iiLocus\n";

const SUBJECT_GFF3: &str = "##gff-version 3\n\
chrA\tAEGeAn::iLocusParser\tlocus\t101\t200\t.\t+\t.\tID=locus1;Name=S1;iLocus_type=siLocus\n\
chrA\tAEGeAn::iLocusParser\tlocus\t1001\t1100\t.\t-\t.\tID=locus2;Name=S2;iLocus_type=siLocus\n\
chrB\tAEGeAn::iLocusParser\tlocus\t1\t500\t.\t.\t.\tID=locus3;Name=S3;iLocus_type=iiLocus\n";

// Q1 fully covers S1; Q2 covers half of S2; Q3 hits a sequence with no loci
const VMATCH: &str = "# args=-q query.iloci.fa -d -p -l 50 subject\n\
   100   chrA   100 D   100   Q1     0    0   1.00e-50    200 100.00\n\
    50   chrA  1000 D    50   Q2     0    0   1.00e-20    100 100.00\n\
   300   chrZ     0 P   300   Q3     0    0   1.00e-90    600 100.00\n";

struct Fixture {
    dir: TempDir,
    query: PathBuf,
    subject: PathBuf,
    vmatch: PathBuf,
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn fixture(vmatch: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    Fixture {
        query: write_file(dir.path(), "query.iloci.gff3", QUERY_GFF3),
        subject: write_file(dir.path(), "subject.iloci.gff3", SUBJECT_GFF3),
        vmatch: write_file(dir.path(), "query-vs-subject.vmatch", vmatch),
        dir,
    }
}

fn run(query: &Path, subject: &Path, alignments: &[&Path]) -> Result<MappingReport, IlocusMapError> {
    let query = read_iloci(open_input(query)?)?;
    let subject = read_iloci(open_input(subject)?)?;
    let mut mapper = IlocusMapper::new(query, subject, ResolverConfig::default());

    for path in alignments {
        let reader = VmatchReader::new(open_input(path)?);
        mapper.process_all(reader.map(|r| r.map_err(IlocusMapError::from)))?;
    }
    Ok(mapper.finish())
}

fn render(report: &MappingReport) -> String {
    let mut out = Vec::new();
    write_mapping_report(&mut out, report).unwrap();
    String::from_utf8(out).unwrap()
}

fn subjects_of<'a>(report: &'a MappingReport, query: &str) -> Option<&'a Vec<String>> {
    report
        .query_mappings
        .iter()
        .find(|m| m.query_label == query)
        .and_then(|m| m.subject_labels.as_ref())
}

#[test]
fn test_full_mapping_report() {
    let f = fixture(VMATCH);
    let report = run(&f.query, &f.subject, &[&f.vmatch]).unwrap();

    assert_eq!(
        render(&report),
        "Q1\tS1\nQ2\tNone\nQ3\tNone\nNone\tS2\nNone\tS3\n"
    );
}

#[test]
fn test_identical_loci_map() {
    let f = fixture(VMATCH);
    let report = run(&f.query, &f.subject, &[&f.vmatch]).unwrap();

    assert_eq!(subjects_of(&report, "Q1"), Some(&vec!["S1".to_string()]));
}

#[test]
fn test_half_overlap_rejected() {
    let f = fixture(VMATCH);
    let report = run(&f.query, &f.subject, &[&f.vmatch]).unwrap();

    assert_eq!(subjects_of(&report, "Q2"), None);
    assert!(report.unmapped_subjects.contains(&"S2".to_string()));
}

#[test]
fn test_untouched_subject_reported() {
    let f = fixture(VMATCH);
    let report = run(&f.query, &f.subject, &[&f.vmatch]).unwrap();

    assert!(report.unmapped_subjects.contains(&"S3".to_string()));
    assert!(!report.unmapped_subjects.contains(&"S1".to_string()));
}

#[test]
fn test_rerun_is_identical() {
    let f = fixture(VMATCH);
    let first = render(&run(&f.query, &f.subject, &[&f.vmatch]).unwrap());
    let second = render(&run(&f.query, &f.subject, &[&f.vmatch]).unwrap());

    assert_eq!(first, second);
}

#[test]
fn test_multiple_alignment_files_union() {
    let f = fixture(VMATCH);
    // A second run maps Q2 onto S2 in full
    let extra = write_file(
        f.dir.path(),
        "extra.vmatch",
        "100 chrA 1000 D 100 Q2 0 0 1e-40 200 100.00\n",
    );

    let report = run(&f.query, &f.subject, &[&f.vmatch, &extra]).unwrap();

    assert_eq!(subjects_of(&report, "Q1"), Some(&vec!["S1".to_string()]));
    assert_eq!(subjects_of(&report, "Q2"), Some(&vec!["S2".to_string()]));
    assert_eq!(report.unmapped_subjects, vec!["S3".to_string()]);
}

#[test]
fn test_gzip_inputs() {
    let f = fixture(VMATCH);
    let gz_path = f.dir.path().join("query-vs-subject.vmatch.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&gz_path).unwrap(), Compression::default());
    encoder.write_all(VMATCH.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let plain = render(&run(&f.query, &f.subject, &[&f.vmatch]).unwrap());
    let gzipped = render(&run(&f.query, &f.subject, &[&gz_path]).unwrap());

    assert_eq!(plain, gzipped);
}

#[test]
fn test_no_alignments_reports_everything_unmapped() {
    let f = fixture("# no matches\n");
    let report = run(&f.query, &f.subject, &[&f.vmatch]).unwrap();

    assert_eq!(report.mapped_query_count(), 0);
    assert_eq!(report.query_mappings.len(), 3);
    assert_eq!(report.unmapped_subjects, vec!["S1", "S2", "S3"]);
}

#[test]
fn test_unbound_query_is_fatal() {
    let f = fixture("100 chrA 100 D 100 Qx 0 0 1e-50 200 100.00\n");
    let err = run(&f.query, &f.subject, &[&f.vmatch]).unwrap_err();

    assert!(matches!(
        err,
        IlocusMapError::Mapping(MappingError::UnboundQueryLocus(ref label)) if label == "Qx"
    ));
}

#[test]
fn test_malformed_alignment_is_fatal() {
    let f = fixture("100 chrA 100 D 100 Q1\n");
    let err = run(&f.query, &f.subject, &[&f.vmatch]).unwrap_err();

    assert!(matches!(err, IlocusMapError::Parse(_)));
}
