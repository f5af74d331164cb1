use chrono::NaiveDate;
use pdf_pageops::*;
use std::io::{Cursor, Read};

fn output(name: &str, bytes: &[u8]) -> OutputFile {
    OutputFile {
        bytes: bytes.to_vec(),
        filename: name.to_string(),
    }
}

fn fixed_time() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(14, 5, 7)
        .unwrap()
}

fn entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

#[test]
fn test_single_output_passes_through() {
    let package = package_at(vec![output("rotated-a.pdf", b"%PDF-1.7")], "rotate-a", fixed_time()).unwrap();
    assert_eq!(package.filename, "rotated-a.pdf");
    assert_eq!(package.bytes, b"%PDF-1.7".to_vec());
    assert_eq!(package.entries, 1);
}

#[test]
fn test_several_outputs_are_zipped() {
    let outputs = vec![
        output("page-2-report.pdf", b"two"),
        output("page-4-report.pdf", b"four"),
    ];
    let package = package_at(outputs, "extract-report", fixed_time()).unwrap();

    assert_eq!(package.filename, "extract-report-20240309-140507.zip");
    assert_eq!(package.entries, 2);
    assert_eq!(
        entries(&package.bytes),
        vec![
            ("page-2-report.pdf".to_string(), b"two".to_vec()),
            ("page-4-report.pdf".to_string(), b"four".to_vec()),
        ]
    );
}

#[test]
fn test_duplicate_names_get_suffixes() {
    let outputs = vec![
        output("a.pdf", b"1"),
        output("a.pdf", b"2"),
        output("a-2.pdf", b"3"),
        output("a.pdf", b"4"),
    ];
    let package = package_at(outputs, "batch", fixed_time()).unwrap();
    let names: Vec<String> = entries(&package.bytes).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a.pdf", "a-2.pdf", "a-2-2.pdf", "a-3.pdf"]);
}

#[test]
fn test_nothing_to_package() {
    assert!(matches!(
        package_at(Vec::new(), "empty", fixed_time()),
        Err(PageOpsError::EmptyInput)
    ));
}
