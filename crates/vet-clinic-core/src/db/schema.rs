//! SQLite schema definition.

/// Complete database schema for vet-clinic.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS pets (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT,
    age INTEGER CHECK (age IS NULL OR age >= 0),
    medical_history TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pets_owner ON pets(owner_id);

-- ============================================================================
-- Appointments
-- ============================================================================

-- pet_id has no foreign key: deleting a pet keeps its appointment history.
CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    pet_id TEXT NOT NULL,
    date TEXT NOT NULL,
    reason TEXT,
    appointment_type TEXT NOT NULL CHECK (appointment_type IN ('treatment', 'vaccination')),
    status TEXT NOT NULL DEFAULT 'scheduled'
        CHECK (status IN ('scheduled', 'completed', 'cancelled')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_appointments_owner ON appointments(owner_id);
CREATE INDEX IF NOT EXISTS idx_appointments_pet ON appointments(pet_id);

-- ============================================================================
-- Derived Clinical Records (Append-Only - Immutable after creation)
-- ============================================================================

-- appointment_id is UNIQUE: at most one record per appointment. No foreign
-- key: deleting an appointment does not retract its record.
CREATE TABLE IF NOT EXISTS treatment_records (
    id TEXT PRIMARY KEY,
    appointment_id TEXT NOT NULL UNIQUE,
    pet_id TEXT NOT NULL,
    treatment_details TEXT NOT NULL,
    digest TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_treatment_records_pet ON treatment_records(pet_id);

CREATE TABLE IF NOT EXISTS vaccination_records (
    id TEXT PRIMARY KEY,
    appointment_id TEXT NOT NULL UNIQUE,
    pet_id TEXT NOT NULL,
    record_type TEXT NOT NULL CHECK (record_type IN ('treatment', 'vaccination')),
    vaccine_name TEXT NOT NULL,
    date TEXT NOT NULL,
    digest TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_vaccination_records_pet ON vaccination_records(pet_id);

CREATE TRIGGER IF NOT EXISTS treatment_records_no_update BEFORE UPDATE ON treatment_records
BEGIN
    SELECT RAISE(ABORT, 'Treatment records are append-only');
END;

CREATE TRIGGER IF NOT EXISTS vaccination_records_no_update BEFORE UPDATE ON vaccination_records
BEGIN
    SELECT RAISE(ABORT, 'Vaccination records are append-only');
END;

-- ============================================================================
-- Tasks
-- ============================================================================

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'Pending',
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO treatment_records (id, appointment_id, pet_id, treatment_details, digest, created_at)
             VALUES ('t1', 'a1', 'p1', 'Stitches', 'abc', '2025-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_records_are_append_only() {
        let conn = seeded();
        let result = conn.execute(
            "UPDATE treatment_records SET treatment_details = 'Changed' WHERE id = 't1'",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_one_record_per_appointment() {
        let conn = seeded();
        let result = conn.execute(
            "INSERT INTO treatment_records (id, appointment_id, pet_id, treatment_details, digest, created_at)
             VALUES ('t2', 'a1', 'p1', 'Again', 'def', '2025-01-01T00:00:00Z')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        let result = conn.execute(
            "INSERT INTO appointments (id, owner_id, pet_id, date, appointment_type, status, created_at, updated_at)
             VALUES ('a1', 'o1', 'p1', '2025-01-01', 'treatment', 'pending', 'x', 'x')",
            [],
        );
        assert!(result.is_err());
    }
}
