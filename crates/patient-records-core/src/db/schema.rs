//! SQLite schema definition.

/// Complete database schema for patient records.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patient (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    ssn TEXT NOT NULL,
    email TEXT NOT NULL,
    age INTEGER NOT NULL,
    height INTEGER NOT NULL,                     -- inches
    weight INTEGER NOT NULL,                     -- pounds
    insurance TEXT NOT NULL,
    gender TEXT NOT NULL,
    street TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    postal TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patient_email ON patient(email);

-- ============================================================================
-- Encounters (no cascade: a patient with encounters cannot be deleted)
-- ============================================================================

CREATE TABLE IF NOT EXISTS encounter (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patient(id),
    notes TEXT,
    visit_code TEXT NOT NULL,
    provider TEXT NOT NULL,
    billing_code TEXT NOT NULL,
    icd10 TEXT NOT NULL,
    total_cost TEXT NOT NULL,                    -- decimal text, scale preserved
    copay TEXT NOT NULL,                         -- decimal text, scale preserved
    chief_complaint TEXT NOT NULL,
    pulse INTEGER,
    systolic INTEGER,
    diastolic INTEGER,
    date TEXT NOT NULL                           -- YYYY-MM-DD
);

CREATE INDEX IF NOT EXISTS idx_encounter_patient ON encounter(patient_id);
"#;
