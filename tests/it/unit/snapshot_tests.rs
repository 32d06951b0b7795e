//! Snapshot tests using the insta crate.
//!
//! Inline snapshots pin serialized output (csv text, column JSON, rendered
//! cells) next to the code that produces it.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use tabula::export::csv::write_csv;
use tabula::format::render_cell;
use tabula::{Column, Row, SortDirection, SortState, Value};

// ============================================================================
// CSV Output
// ============================================================================

#[test]
fn snapshot_csv_output() {
    let columns = vec![
        Column::number("id", "ID"),
        Column::new("name", "Full Name"),
        Column::date("joined", "Joined").with_date_format("yyyy/MM/dd"),
        Column::new("tags", "Tags"),
    ];
    let rows = vec![
        Row::new()
            .with("id", 1)
            .with("name", "Ada \"Countess\" Lovelace")
            .with("joined", "1843-07-01")
            .with("tags", vec!["math", "engines"]),
        Row::new()
            .with("id", 2.5)
            .with("name", "Line\nBreak")
            .with("joined", Value::Null),
    ];
    // CRLF shown as LF for readability
    let csv = String::from_utf8(write_csv(&rows, &columns).unwrap())
        .unwrap()
        .replace("\r\n", "\n");
    insta::assert_snapshot!(csv, @r#"
    "ID","Full Name","Joined","Tags"
    "1","Ada ""Countess"" Lovelace","1843/07/01","math;engines"
    "2.5","Line
    Break","",""
    "#);
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn snapshot_column_json() {
    let columns = vec![
        Column::new("name", "Name"),
        Column::date("joined", "Joined").with_date_format("dd/MM/yyyy"),
        Column::image("photos", "Photos"),
    ];
    insta::assert_json_snapshot!(columns, @r#"
    [
      {
        "key": "name",
        "label": "Name",
        "kind": "text"
      },
      {
        "key": "joined",
        "label": "Joined",
        "kind": "date",
        "date_format": "dd/MM/yyyy"
      },
      {
        "key": "photos",
        "label": "Photos",
        "kind": "image"
      }
    ]
    "#);
}

#[test]
fn snapshot_sort_state_json() {
    let sort = SortState::new("joined", SortDirection::Desc);
    insta::assert_json_snapshot!(sort, @r#"
    {
      "key": "joined",
      "direction": "desc"
    }
    "#);
}

// ============================================================================
// Cell Rendering
// ============================================================================

#[test]
fn snapshot_rendered_cells() {
    let photos = Column::image("photos", "Photos");
    let joined = Column::date("joined", "Joined");
    let cells = vec![
        render_cell(&photos, &Value::from(vec!["a.PNG", "notes.txt", "b.webp"])),
        render_cell(&photos, &Value::from("no image here")),
        render_cell(&joined, &Value::from("2024-07-04T12:00:00+02:00")),
        render_cell(&joined, &Value::from("someday")),
    ];
    insta::assert_debug_snapshot!(cells, @r#"
    [
        Images(
            [
                "a.PNG",
                "b.webp",
            ],
        ),
        Text(
            "no image here",
        ),
        Text(
            "04-07-2024",
        ),
        Text(
            "someday",
        ),
    ]
    "#);
}
