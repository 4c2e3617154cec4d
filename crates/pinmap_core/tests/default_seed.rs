use pinmap_core::db::{ensure_default_pin_type, open_db_in_memory};
use pinmap_core::{FieldKind, PinTypeRepository, SqlitePinTypeRepository};

#[test]
fn seed_creates_default_type_with_name_and_date_fields() {
    let mut conn = open_db_in_memory().unwrap();

    assert!(ensure_default_pin_type(&mut conn).unwrap());

    let repo = SqlitePinTypeRepository::new(&mut conn);
    let default = repo.get_pin_type_by_name("Default").unwrap();
    assert_eq!(default.fields.len(), 2);

    let name = default.field("Name").unwrap();
    assert_eq!(name.kind, FieldKind::String);
    assert!(name.is_required);

    let date = default.field("Date").unwrap();
    assert_eq!(date.kind, FieldKind::Date);
    assert!(date.is_required);
}

#[test]
fn seed_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();

    assert!(ensure_default_pin_type(&mut conn).unwrap());
    assert!(!ensure_default_pin_type(&mut conn).unwrap());

    let repo = SqlitePinTypeRepository::new(&mut conn);
    assert_eq!(repo.list_pin_types().unwrap().len(), 1);
}

#[test]
fn seed_leaves_a_user_shaped_database_alone() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let mut repo = SqlitePinTypeRepository::new(&mut conn);
        repo.create_pin_type("Tree", &[], None, None).unwrap();
    }

    // The user already has a category; no "Default" is forced on them.
    assert!(!ensure_default_pin_type(&mut conn).unwrap());

    let repo = SqlitePinTypeRepository::new(&mut conn);
    let names: Vec<String> = repo
        .list_pin_types()
        .unwrap()
        .into_iter()
        .map(|pin_type| pin_type.name)
        .collect();
    assert_eq!(names, vec!["Tree".to_string()]);
}
