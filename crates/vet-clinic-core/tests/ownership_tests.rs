//! Cross-owner isolation: owner B can never read or change owner A's data.

use vet_clinic_core::db::Database;
use vet_clinic_core::{
    AppointmentManager, AppointmentPatch, AppointmentStatus, ClinicError, NewAppointment, NewPet,
    NewTask, PetPatch, PetRegistry, ResourceKind, TaskBoard, TaskPatch,
};

const ALICE: &str = "alice";
const BOB: &str = "bob";

struct Fixture {
    db: Database,
    pet_id: String,
    appointment_id: String,
    task_id: String,
}

fn alice_data() -> Fixture {
    let db = Database::open_in_memory().unwrap();
    let pet_id = PetRegistry::new(&db)
        .create(
            ALICE,
            NewPet {
                name: Some("Rex".into()),
                species: Some("Dog".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .id;
    let appointment_id = AppointmentManager::new(&db)
        .create(
            ALICE,
            NewAppointment {
                pet_id: Some(pet_id.clone()),
                date: Some("2025-08-09".into()),
                appointment_type: Some("Treatment".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .id;
    let task_id = TaskBoard::new(&db)
        .create(
            ALICE,
            NewTask {
                title: Some("Buy food".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .id;
    Fixture {
        db,
        pet_id,
        appointment_id,
        task_id,
    }
}

fn assert_forbidden<T: std::fmt::Debug>(result: Result<T, ClinicError>, expected: ResourceKind) {
    match result {
        Err(ClinicError::Forbidden { kind, .. }) => assert_eq!(kind, expected),
        other => panic!("expected Forbidden({expected}), got {:?}", other),
    }
}

#[test]
fn test_pets_are_isolated() {
    let f = alice_data();
    let registry = PetRegistry::new(&f.db);

    assert_forbidden(registry.get(BOB, &f.pet_id), ResourceKind::Pet);
    let patch: PetPatch = serde_json::from_str(r#"{"name": "Mine now"}"#).unwrap();
    assert_forbidden(registry.update(BOB, &f.pet_id, patch), ResourceKind::Pet);
    assert_forbidden(registry.delete(BOB, &f.pet_id), ResourceKind::Pet);
    assert!(registry.list(BOB).unwrap().is_empty());

    assert_eq!(registry.get(ALICE, &f.pet_id).unwrap().name, "Rex");
}

#[test]
fn test_appointments_are_isolated() {
    let f = alice_data();
    let manager = AppointmentManager::new(&f.db);

    assert_forbidden(manager.get(BOB, &f.appointment_id), ResourceKind::Appointment);
    assert_forbidden(
        manager.update(
            BOB,
            &f.appointment_id,
            AppointmentPatch::status(AppointmentStatus::Completed),
        ),
        ResourceKind::Appointment,
    );
    assert_forbidden(manager.delete(BOB, &f.appointment_id), ResourceKind::Appointment);
    assert_forbidden(manager.history(BOB, &f.pet_id), ResourceKind::Pet);
    assert!(manager.list(BOB).unwrap().is_empty());

    let stored = manager.get(ALICE, &f.appointment_id).unwrap();
    assert_eq!(stored.status, AppointmentStatus::Scheduled);
    assert_eq!(f.db.count_records_for_appointment(&f.appointment_id).unwrap(), 0);
}

#[test]
fn test_booking_against_foreign_pet_is_forbidden() {
    let f = alice_data();
    let result = AppointmentManager::new(&f.db).create(
        BOB,
        NewAppointment {
            pet_id: Some(f.pet_id.clone()),
            date: Some("2025-08-09".into()),
            appointment_type: Some("Vaccination".into()),
            ..Default::default()
        },
    );
    assert_forbidden(result, ResourceKind::Pet);
}

#[test]
fn test_moving_own_appointment_to_foreign_pet_is_forbidden() {
    let f = alice_data();
    let bob_pet = PetRegistry::new(&f.db)
        .create(
            BOB,
            NewPet {
                name: Some("Tom".into()),
                species: Some("Cat".into()),
                ..Default::default()
            },
        )
        .unwrap();

    let patch: AppointmentPatch =
        serde_json::from_str(&format!(r#"{{"petId": "{}"}}"#, bob_pet.id)).unwrap();
    assert_forbidden(
        AppointmentManager::new(&f.db).update(ALICE, &f.appointment_id, patch),
        ResourceKind::Pet,
    );
}

#[test]
fn test_tasks_are_isolated() {
    let f = alice_data();
    let board = TaskBoard::new(&f.db);

    assert_forbidden(board.get(BOB, &f.task_id), ResourceKind::Task);
    let patch: TaskPatch = serde_json::from_str(r#"{"status": "Done"}"#).unwrap();
    assert_forbidden(board.update(BOB, &f.task_id, patch), ResourceKind::Task);
    assert_forbidden(board.delete(BOB, &f.task_id), ResourceKind::Task);

    assert_eq!(board.get(ALICE, &f.task_id).unwrap().status, "Pending");
}

#[test]
fn test_missing_ids_are_not_found_not_forbidden() {
    let f = alice_data();
    assert!(matches!(
        PetRegistry::new(&f.db).delete(BOB, "ghost"),
        Err(ClinicError::NotFound { kind: ResourceKind::Pet, .. })
    ));
    assert!(matches!(
        AppointmentManager::new(&f.db).delete(BOB, "ghost"),
        Err(ClinicError::NotFound { kind: ResourceKind::Appointment, .. })
    ));
    assert!(matches!(
        TaskBoard::new(&f.db).delete(BOB, "ghost"),
        Err(ClinicError::NotFound { kind: ResourceKind::Task, .. })
    ));
}
