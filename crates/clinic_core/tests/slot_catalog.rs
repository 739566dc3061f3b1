use clinic_core::db::open_db_in_memory;
use clinic_core::{
    PractitionerFields, PractitionerRepository, ServiceError, SlotFields, SlotService,
    SqlitePractitionerRepository, SqliteSlotRepository, ValidationError,
};

fn slot(day: &str, start: &str, end: &str) -> SlotFields {
    SlotFields {
        day: day.to_string(),
        start: start.to_string(),
        end: end.to_string(),
    }
}

#[test]
fn create_normalizes_day_and_times() {
    let conn = open_db_in_memory().unwrap();
    let service = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap());

    let created = service
        .create_slot(&slot("Monday", "09:00", "09:30"))
        .unwrap();
    assert_eq!(created.day, "monday");
    assert_eq!(created.start, "09:00:00");
    assert_eq!(created.end, "09:30:00");
    assert_eq!(service.get_slot(created.id).unwrap(), created);
}

#[test]
fn create_rejects_inverted_window() {
    let conn = open_db_in_memory().unwrap();
    let service = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap());

    let err = service
        .create_slot(&slot("monday", "10:00", "09:00"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidRange(_))
    ));
    assert!(service.list_slots().unwrap().is_empty());
}

#[test]
fn create_reports_missing_day_first() {
    let conn = open_db_in_memory().unwrap();
    let service = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap());

    let err = service.create_slot(&slot("", "", "")).unwrap_err();
    assert_eq!(err.to_string(), "day is required.");
}

#[test]
fn replace_updates_window_seen_by_linked_practitioners() {
    let mut conn = open_db_in_memory().unwrap();
    let slot_id = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap())
        .create_slot(&slot("tuesday", "08:00", "09:00"))
        .unwrap()
        .id;

    let practitioner_id = SqlitePractitionerRepository::try_new(&mut conn)
        .unwrap()
        .create_practitioner(
            &PractitionerFields {
                name: "A".to_string(),
                specialty: "Derm".to_string(),
                gender: "M".to_string(),
                phone: "555".to_string(),
                biography: "bio".to_string(),
                facility: "Clinic".to_string(),
            },
            &[slot_id],
        )
        .unwrap();

    let replaced = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap())
        .replace_slot(slot_id, &slot("wednesday", "13:00", "14:15:30"))
        .unwrap();
    assert_eq!(replaced.day, "wednesday");
    assert_eq!(replaced.end, "14:15:30");

    let record = SqlitePractitionerRepository::try_new(&mut conn)
        .unwrap()
        .get_practitioner(practitioner_id)
        .unwrap()
        .unwrap();
    assert_eq!(record.slots, vec![replaced]);
}

#[test]
fn delete_referenced_slot_is_conflict() {
    let mut conn = open_db_in_memory().unwrap();
    let slot_id = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap())
        .create_slot(&slot("friday", "10:00", "11:00"))
        .unwrap()
        .id;
    SqlitePractitionerRepository::try_new(&mut conn)
        .unwrap()
        .create_practitioner(
            &PractitionerFields {
                name: "B".to_string(),
                specialty: "ENT".to_string(),
                gender: "F".to_string(),
                phone: "777".to_string(),
                biography: "bio".to_string(),
                facility: "Clinic".to_string(),
            },
            &[slot_id],
        )
        .unwrap();

    let service = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap());
    assert!(matches!(
        service.delete_slot(slot_id),
        Err(ServiceError::Conflict(_))
    ));
    assert!(service.get_slot(slot_id).is_ok());
}

#[test]
fn delete_unreferenced_slot_then_get_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap());
    let created = service
        .create_slot(&slot("sunday", "07:00", "07:45"))
        .unwrap();

    service.delete_slot(created.id).unwrap();
    assert!(matches!(
        service.get_slot(created.id),
        Err(ServiceError::NotFound { entity: "slot", .. })
    ));
    assert!(matches!(
        service.delete_slot(created.id),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn list_is_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let service = SlotService::new(SqliteSlotRepository::try_new(&conn).unwrap());
    let ids: Vec<_> = ["saturday", "monday", "thursday"]
        .iter()
        .map(|day| service.create_slot(&slot(day, "09:00", "10:00")).unwrap().id)
        .collect();

    let listed: Vec<_> = service
        .list_slots()
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(listed, ids);
}
