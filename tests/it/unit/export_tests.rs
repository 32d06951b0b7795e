//! Unit tests for the csv, xlsx and pdf serializers.

use crate::helpers::{parse_csv, people, people_columns, read_sheet};
use calamine::Data;
use tabula::export::csv::write_csv;
use tabula::export::pdf::{collapse_line_breaks, page_count, paper_for_columns, write_pdf};
use tabula::export::xlsx::write_xlsx;
use tabula::export::{ExportOptions, export_rows};
use tabula::{Column, ExportError, ExportFormat, Notice, NoticeLevel, Row, Value};

#[test]
fn test_csv_has_header_plus_one_line_per_row() {
    let columns = people_columns();
    for n in [1usize, 2, 17, 250] {
        let bytes = write_csv(&people(n), &columns).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert_eq!(text.split("\r\n").filter(|l| !l.is_empty()).count(), n + 1);
        assert!(text.ends_with("\r\n"));

        let records = parse_csv(&bytes);
        assert_eq!(records.len(), n + 1);
        assert!(records.iter().all(|r| r.len() == columns.len()));
        assert_eq!(records[0], vec!["ID", "Name", "Joined", "Avatar"]);
    }
}

#[test]
fn test_csv_quotes_survive_parse_back() {
    let columns = vec![Column::new("a", "A, with comma"), Column::new("b", "B")];
    let rows = vec![
        Row::new().with("a", "say \"hi\"").with("b", "x,y"),
        Row::new().with("a", Value::Null).with("b", vec!["p", "q"]),
    ];
    let records = parse_csv(&write_csv(&rows, &columns).unwrap());
    assert_eq!(records[0], vec!["A, with comma", "B"]);
    assert_eq!(records[1], vec!["say \"hi\"", "x,y"]);
    assert_eq!(records[2], vec!["", "p;q"]);
}

#[test]
fn test_csv_uses_display_dates() {
    let columns = vec![Column::date("d", "Date")];
    let rows = vec![Row::new().with("d", "2024-02-29"), Row::new().with("d", "not a date")];
    let records = parse_csv(&write_csv(&rows, &columns).unwrap());
    assert_eq!(records[1], vec!["29-02-2024"]);
    assert_eq!(records[2], vec!["not a date"]);
}

#[test]
fn test_csv_line_breaks_inside_fields_survive() {
    let columns = vec![Column::new("note", "Note"), Column::new("id", "ID")];
    let rows = vec![
        Row::new().with("note", "first\r\nsecond").with("id", 1),
        Row::new().with("note", "a\nb").with("id", 2),
    ];
    let records = parse_csv(&write_csv(&rows, &columns).unwrap());
    assert_eq!(records.len(), 3);
    assert_eq!(records[1], vec!["first\r\nsecond", "1"]);
    assert_eq!(records[2], vec!["a\nb", "2"]);
}

#[test]
fn test_xlsx_is_a_workbook() {
    let bytes = write_xlsx(&people(20), &people_columns()).unwrap();
    assert_eq!(&bytes[..4], b"PK\x03\x04");
    assert_eq!(read_sheet(bytes).len(), 21);
}

#[test]
fn test_xlsx_cells_read_back() {
    let columns = vec![
        Column::new("name", "Name"),
        Column::number("age", "Age"),
        Column::new("tags", "Tags"),
        Column::date("joined", "Joined"),
    ];
    let rows = vec![
        Row::new()
            .with("name", "Alice")
            .with("age", 30)
            .with("tags", vec!["a", "b"])
            .with("joined", "2024-02-29"),
        Row::new()
            .with("name", "Bob")
            .with("age", Value::Null)
            .with("tags", Value::Null)
            .with("joined", "2023-01-05"),
    ];
    let sheet = read_sheet(write_xlsx(&rows, &columns).unwrap());

    assert_eq!(sheet.len(), rows.len() + 1);
    let header: Vec<String> = sheet[0].iter().map(|c| c.to_string()).collect();
    assert_eq!(header, vec!["Name", "Age", "Tags", "Joined"]);

    assert_eq!(sheet[1][0], Data::String("Alice".into()));
    assert_eq!(sheet[1][1], Data::Float(30.0));
    assert_eq!(sheet[1][2], Data::String("a;b".into()));
    assert_eq!(sheet[1][3], Data::String("29-02-2024".into()));

    assert_eq!(sheet[2][1], Data::Empty);
    assert_eq!(sheet[2][2], Data::Empty);
    assert_eq!(sheet[2][3], Data::String("05-01-2023".into()));
}

#[test]
fn test_pdf_paper_grows_with_columns() {
    let sizes: Vec<&str> = [2, 6, 7, 10, 11, 16, 17, 60]
        .into_iter()
        .map(|n| paper_for_columns(n).name)
        .collect();
    assert_eq!(sizes, vec!["A4", "A4", "A3", "A3", "A2", "A2", "A1", "A1"]);

    let a4 = paper_for_columns(1);
    let a1 = paper_for_columns(30);
    assert!(a1.width > a4.width);
}

#[test]
fn test_pdf_multi_page() {
    let rows = people(300);
    let bytes = write_pdf(&rows, &people_columns(), "Quarterly Users");
    let text = String::from_utf8_lossy(&bytes);
    let pages = page_count(rows.len(), 4);
    assert!(pages > 1);
    assert!(text.contains(&format!("(Page {} of {})", pages, pages)));
    assert_eq!(text.matches("(Quarterly Users)").count(), 1);
}

#[test]
fn test_line_breaks_collapse() {
    assert_eq!(collapse_line_breaks("one\r\ntwo\nthree\n\n"), "one two three ");
}

#[test]
fn test_empty_export_is_user_notice() {
    let err = export_rows(
        ExportFormat::Xlsx,
        &[],
        &people_columns(),
        &ExportOptions::default(),
        0,
    )
    .unwrap_err();
    assert!(matches!(err, ExportError::EmptyDataset));

    let notice = Notice::from(err);
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(!notice.is_error());
}

#[test]
fn test_export_file_metadata() {
    let file = export_rows(
        ExportFormat::Pdf,
        &people(3),
        &people_columns(),
        &ExportOptions::default(),
        1_717_171_717_171,
    )
    .unwrap();
    assert_eq!(file.file_name, "1717171717171_table_export.pdf");
    assert_eq!(file.mime_type(), "application/pdf");
    assert!(String::from_utf8_lossy(&file.bytes).contains("(Exported Table Report)"));
}
