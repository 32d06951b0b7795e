//! Unit tests for the column model and resize gestures.

use tabula::{Column, ColumnModel, TableError};

fn model() -> ColumnModel {
    ColumnModel::new(vec![
        Column::new("name", "Name"),
        Column::new("email", "Email"),
        Column::new("name", "Duplicate"),
    ])
}

#[test]
fn test_duplicate_keys_dropped() {
    let model = model();
    assert_eq!(model.len(), 2);
    assert_eq!(model.get("name").map(|c| c.label.as_str()), Some("Name"));
    let labels: Vec<_> = model.labels().collect();
    assert_eq!(labels, vec![("name", "Name"), ("email", "Email")]);
}

#[test]
fn test_width_follows_pointer_delta() {
    let mut model = model();
    model.begin_resize("email", 400.0, 150.0).unwrap();
    assert_eq!(model.drag_to(420.0), Some(170.0));
    assert_eq!(model.drag_to(380.0), Some(130.0));
    model.end_resize();
    assert_eq!(model.width("email"), Some(130.0));
    assert_eq!(model.width("name"), None);
}

#[test]
fn test_width_floor() {
    let mut model = model().with_min_width(40.0);
    model.begin_resize("name", 100.0, 80.0).unwrap();
    assert_eq!(model.drag_to(-500.0), Some(40.0));
    model.end_resize();
}

#[test]
fn test_session_releases_on_drop() {
    let mut model = model();
    {
        let mut session = model.resize_session("name", 0.0, 100.0).unwrap();
        session.drag_to(25.0);
    }
    assert!(!model.is_resizing());
    assert_eq!(model.width("name"), Some(125.0));

    let session = model.resize_session("email", 0.0, 100.0).unwrap();
    session.finish();
    assert!(!model.is_resizing());
}

#[test]
fn test_session_releases_on_early_return() {
    fn drag(model: &mut ColumnModel, key: &str) -> Result<f32, TableError> {
        let mut session = model.resize_session(key, 10.0, 60.0)?;
        let width = session.drag_to(30.0).ok_or(TableError::WrongMode("idle"))?;
        if width > 50.0 {
            return Ok(width);
        }
        session.finish();
        Ok(0.0)
    }

    let mut model = model();
    assert_eq!(drag(&mut model, "name").unwrap(), 80.0);
    assert!(!model.is_resizing());
    assert!(matches!(drag(&mut model, "ghost"), Err(TableError::UnknownColumn(_))));
    assert!(!model.is_resizing());
}

#[test]
fn test_reset_width() {
    let mut model = model();
    model.begin_resize("name", 0.0, 100.0).unwrap();
    model.drag_to(10.0);
    model.end_resize();
    model.reset_width("name");
    assert_eq!(model.width("name"), None);
}
