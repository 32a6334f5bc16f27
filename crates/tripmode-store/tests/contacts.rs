use tripmode_core::domain::{prepare_contacts_for_save, NewContact, OwnerId, ParsedContact};
use tripmode_store::error::StoreError;
use tripmode_store::repo::ContactUpdate;
use tripmode_store::Store;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open store");
    store.migrate().expect("migrate");
    store
}

fn owner(raw: &str) -> OwnerId {
    OwnerId::new(raw).expect("owner")
}

#[test]
fn add_many_assigns_ids_and_scopes_by_owner() {
    let store = store();
    let now = 1_700_000_000;
    let parsed = vec![
        ParsedContact::new("Grace", None, Some("+15550102".to_string())),
        ParsedContact::new("Ada", Some("ada@example.com".to_string()), None),
    ];

    let ids = store
        .contacts()
        .add_many(now, &owner("u1"), &prepare_contacts_for_save(&parsed))
        .expect("add many");
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    store
        .contacts()
        .add(
            now,
            &owner("u2"),
            NewContact {
                name: "Linus".to_string(),
                email: None,
                phone: Some("555".to_string()),
            },
        )
        .expect("add");

    let listed = store.contacts().list_for_owner(&owner("u1")).expect("list");
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Grace"]);
    assert!(listed.iter().all(|c| c.matched_user_id.is_none()));

    let grace = store.contacts().get(ids[0]).expect("get").expect("exists");
    assert_eq!(grace.phone.as_deref(), Some("+15550102"));
    assert_eq!(grace.created_at, now);
}

#[test]
fn add_many_rolls_back_on_invalid_contact() {
    let store = store();
    let contacts = vec![
        NewContact {
            name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
        },
        NewContact {
            name: "  ".to_string(),
            email: Some("blank@example.com".to_string()),
            phone: None,
        },
    ];

    let err = store
        .contacts()
        .add_many(1, &owner("u1"), &contacts)
        .expect_err("reject blank name");
    assert!(matches!(err, StoreError::Core(_)));
    assert!(store
        .contacts()
        .list_for_owner(&owner("u1"))
        .expect("list")
        .is_empty());
}

#[test]
fn add_normalizes_phone_and_email() {
    let store = store();
    let contact = store
        .contacts()
        .add(
            1,
            &owner("u1"),
            NewContact {
                name: " Ada ".to_string(),
                email: Some("  ".to_string()),
                phone: Some("+1 (555) 010-1000".to_string()),
            },
        )
        .expect("add");
    assert_eq!(contact.name, "Ada");
    assert_eq!(contact.email, None);
    assert_eq!(contact.phone.as_deref(), Some("+15550101000"));
}

#[test]
fn update_and_delete_contact() {
    let store = store();
    let created = store
        .contacts()
        .add(
            1,
            &owner("u1"),
            NewContact {
                name: "Ada".to_string(),
                email: None,
                phone: Some("555".to_string()),
            },
        )
        .expect("add");

    let updated = store
        .contacts()
        .update(
            2,
            created.id,
            ContactUpdate {
                email: Some(Some("ada@example.com".to_string())),
                phone: Some(None),
                ..Default::default()
            },
        )
        .expect("update");
    assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
    assert_eq!(updated.phone, None);
    assert_eq!(updated.updated_at, 2);

    store.contacts().delete(created.id).expect("delete");
    let err = store.contacts().delete(created.id).expect_err("missing");
    assert!(matches!(err, StoreError::NotFound(_)));
}
