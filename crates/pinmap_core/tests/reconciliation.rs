use pinmap_core::db::open_db_in_memory;
use pinmap_core::{
    FieldEdit, FieldKind, FieldSpec, PinRepository, PinTypeRecord, PinTypeRepository,
    PinTypeUpdate, RepoError, SqlitePinRepository, SqlitePinTypeRepository,
};
use rusqlite::Connection;
use std::collections::BTreeMap;

fn create_ab_type(conn: &mut Connection) -> PinTypeRecord {
    let mut repo = SqlitePinTypeRepository::new(conn);
    repo.create_pin_type(
        "Survey",
        &[
            FieldSpec::new("A", FieldKind::String, true),
            FieldSpec::new("B", FieldKind::Integer, false),
        ],
        None,
        None,
    )
    .unwrap()
}

fn field_edits(record: &PinTypeRecord) -> PinTypeUpdate {
    PinTypeUpdate {
        fields: Some(vec![
            FieldEdit::existing(
                record.field("A").unwrap().id,
                "A2",
                FieldKind::String,
                true,
            ),
            FieldEdit::new_field("C", FieldKind::Date, false),
        ]),
        ..PinTypeUpdate::default()
    }
}

#[test]
fn reconcile_updates_creates_and_deletes_by_id() {
    let mut conn = open_db_in_memory().unwrap();
    let record = create_ab_type(&mut conn);
    let field_a_id = record.field("A").unwrap().id;
    let field_b_id = record.field("B").unwrap().id;

    let mut repo = SqlitePinTypeRepository::new(&mut conn);
    let updated = repo
        .update_pin_type(record.id, &field_edits(&record))
        .unwrap();

    // A kept its id under the new name, B is gone, C is new.
    assert_eq!(updated.fields.len(), 2);
    let renamed = updated.field("A2").unwrap();
    assert_eq!(renamed.id, field_a_id);
    assert!(updated.field("A").is_none());
    assert!(updated.field("B").is_none());
    assert!(updated.fields.iter().all(|field| field.id != field_b_id));

    let created = updated.field("C").unwrap();
    assert_eq!(created.kind, FieldKind::Date);
    assert!(!created.is_required);
}

#[test]
fn reconcile_deletes_cascade_to_field_values() {
    let mut conn = open_db_in_memory().unwrap();
    let record = create_ab_type(&mut conn);
    let field_b_id = record.field("B").unwrap().id;

    let pin_id = {
        let mut repo = SqlitePinRepository::new(&mut conn);
        let values: BTreeMap<String, String> = [("A", "kept"), ("B", "7")]
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        repo.add_pin("Survey", 1.0, 2.0, &values).unwrap().id
    };

    {
        let mut repo = SqlitePinTypeRepository::new(&mut conn);
        repo.update_pin_type(record.id, &field_edits(&record))
            .unwrap();
    }

    let orphaned: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM field_values WHERE field_id = ?1;",
            [field_b_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphaned, 0);

    // The value recorded under A survives the rename untouched.
    let repo = SqlitePinRepository::new(&mut conn);
    let detail = repo.get_pin(pin_id).unwrap();
    assert_eq!(detail.fields.get("A2").unwrap().value, "kept");
    assert!(detail.fields.get("B").is_none());
}

#[test]
fn reconcile_treats_unrecognized_id_as_new_field() {
    let mut conn = open_db_in_memory().unwrap();
    let record = create_ab_type(&mut conn);

    let mut repo = SqlitePinTypeRepository::new(&mut conn);
    let update = PinTypeUpdate {
        fields: Some(vec![
            FieldEdit::existing(record.field("A").unwrap().id, "A", FieldKind::String, true),
            FieldEdit::existing(record.field("B").unwrap().id, "B", FieldKind::Integer, false),
            FieldEdit::existing(9999, "Imported", FieldKind::String, false),
        ]),
        ..PinTypeUpdate::default()
    };
    let updated = repo.update_pin_type(record.id, &update).unwrap();

    assert_eq!(updated.fields.len(), 3);
    let imported = updated.field("Imported").unwrap();
    assert_ne!(imported.id, 9999);
}

#[test]
fn reconcile_can_swap_two_field_names() {
    let mut conn = open_db_in_memory().unwrap();
    let record = create_ab_type(&mut conn);
    let field_a_id = record.field("A").unwrap().id;
    let field_b_id = record.field("B").unwrap().id;

    let mut repo = SqlitePinTypeRepository::new(&mut conn);
    let update = PinTypeUpdate {
        fields: Some(vec![
            FieldEdit::existing(field_a_id, "B", FieldKind::String, true),
            FieldEdit::existing(field_b_id, "A", FieldKind::Integer, false),
        ]),
        ..PinTypeUpdate::default()
    };
    let updated = repo.update_pin_type(record.id, &update).unwrap();

    assert_eq!(updated.field("B").unwrap().id, field_a_id);
    assert_eq!(updated.field("A").unwrap().id, field_b_id);
}

#[test]
fn reconcile_rejects_duplicate_target_names() {
    let mut conn = open_db_in_memory().unwrap();
    let record = create_ab_type(&mut conn);

    let mut repo = SqlitePinTypeRepository::new(&mut conn);
    let update = PinTypeUpdate {
        fields: Some(vec![
            FieldEdit::existing(record.field("A").unwrap().id, "Twin", FieldKind::String, true),
            FieldEdit::new_field("Twin", FieldKind::String, false),
        ]),
        ..PinTypeUpdate::default()
    };
    let err = repo.update_pin_type(record.id, &update).unwrap_err();
    assert!(
        matches!(err, RepoError::DuplicateField { field, .. } if field == "Twin")
    );

    // Nothing changed.
    let reloaded = repo.get_pin_type_by_name("Survey").unwrap();
    assert!(reloaded.field("A").is_some());
    assert!(reloaded.field("B").is_some());
    assert_eq!(reloaded.fields.len(), 2);
}

#[test]
fn omitting_the_field_list_leaves_the_schema_alone() {
    let mut conn = open_db_in_memory().unwrap();
    let record = create_ab_type(&mut conn);

    let mut repo = SqlitePinTypeRepository::new(&mut conn);
    let update = PinTypeUpdate {
        color: Some("123456".to_string()),
        ..PinTypeUpdate::default()
    };
    let updated = repo.update_pin_type(record.id, &update).unwrap();

    assert_eq!(updated.color, "123456");
    assert_eq!(updated.fields, record.fields);
}

#[test]
fn empty_field_list_deletes_every_field() {
    let mut conn = open_db_in_memory().unwrap();
    let record = create_ab_type(&mut conn);

    let mut repo = SqlitePinTypeRepository::new(&mut conn);
    let update = PinTypeUpdate {
        fields: Some(Vec::new()),
        ..PinTypeUpdate::default()
    };
    let updated = repo.update_pin_type(record.id, &update).unwrap();
    assert!(updated.fields.is_empty());
}
