use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::enums::*;
use crate::models::*;

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|_| DatabaseError::InvalidEnum {
        field: field.into(),
        value: value.into(),
    })
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidTimestamp {
            field: field.into(),
            value: value.into(),
        })
}

// ═══════════════════════════════════════════
// Nurse Repository
// ═══════════════════════════════════════════

pub fn insert_nurse(conn: &Connection, nurse: &Nurse) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO nurses (id, full_name, email, nurse_id, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            nurse.id.to_string(),
            nurse.full_name,
            nurse.email,
            nurse.nurse_id,
            nurse.password_hash,
            nurse.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

// Internal row type for Nurse mapping
struct NurseRow {
    id: String,
    full_name: String,
    email: String,
    nurse_id: String,
    password_hash: String,
    created_at: String,
}

fn nurse_from_row(row: NurseRow) -> Result<Nurse, DatabaseError> {
    Ok(Nurse {
        id: parse_uuid("nurses.id", &row.id)?,
        full_name: row.full_name,
        email: row.email,
        nurse_id: row.nurse_id,
        password_hash: row.password_hash,
        created_at: parse_timestamp("nurses.created_at", &row.created_at)?,
    })
}

fn query_nurse(
    conn: &Connection,
    where_clause: &str,
    value: &str,
) -> Result<Option<Nurse>, DatabaseError> {
    let sql = format!(
        "SELECT id, full_name, email, nurse_id, password_hash, created_at
         FROM nurses WHERE {where_clause} = ?1"
    );
    let mut stmt = conn.prepare(&sql)?;

    let result = stmt.query_row(params![value], |row| {
        Ok(NurseRow {
            id: row.get(0)?,
            full_name: row.get(1)?,
            email: row.get(2)?,
            nurse_id: row.get(3)?,
            password_hash: row.get(4)?,
            created_at: row.get(5)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(nurse_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_nurse(conn: &Connection, id: &Uuid) -> Result<Option<Nurse>, DatabaseError> {
    query_nurse(conn, "id", &id.to_string())
}

pub fn get_nurse_by_email(conn: &Connection, email: &str) -> Result<Option<Nurse>, DatabaseError> {
    query_nurse(conn, "email", email)
}

// ═══════════════════════════════════════════
// Patient Repository
// ═══════════════════════════════════════════

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, first_name, last_name, age, gender, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient.id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.age,
            patient.gender.as_str(),
            patient.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

// Internal row type for Patient mapping
struct PatientRow {
    id: String,
    first_name: String,
    last_name: String,
    age: i64,
    gender: String,
    created_at: String,
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: parse_uuid("patients.id", &row.id)?,
        first_name: row.first_name,
        last_name: row.last_name,
        age: row.age,
        gender: Gender::from_str(&row.gender)?,
        created_at: parse_timestamp("patients.created_at", &row.created_at)?,
    })
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, age, gender, created_at
         FROM patients WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok(PatientRow {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            age: row.get(3)?,
            gender: row.get(4)?,
            created_at: row.get(5)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All patients, newest intake first.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, age, gender, created_at
         FROM patients ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(PatientRow {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            age: row.get(3)?,
            gender: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

// ═══════════════════════════════════════════
// Medical History Repository
// ═══════════════════════════════════════════

pub fn insert_medical_history(
    conn: &Connection,
    history: &MedicalHistory,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medical_history (id, patient_id, condition, diagnosis_date, treatment, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            history.id.to_string(),
            history.patient_id.to_string(),
            history.condition,
            history.diagnosis_date.to_rfc3339(),
            history.treatment,
            history.status.as_str(),
            history.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

// Internal row type for MedicalHistory mapping
struct HistoryRow {
    id: String,
    patient_id: String,
    condition: String,
    diagnosis_date: String,
    treatment: Option<String>,
    status: String,
    created_at: String,
}

fn history_from_row(row: HistoryRow) -> Result<MedicalHistory, DatabaseError> {
    Ok(MedicalHistory {
        id: parse_uuid("medical_history.id", &row.id)?,
        patient_id: parse_uuid("medical_history.patient_id", &row.patient_id)?,
        condition: row.condition,
        diagnosis_date: parse_timestamp("medical_history.diagnosis_date", &row.diagnosis_date)?,
        treatment: row.treatment,
        status: HistoryStatus::from_str(&row.status)?,
        created_at: parse_timestamp("medical_history.created_at", &row.created_at)?,
    })
}

/// History entries for one patient, newest diagnosis first.
pub fn get_medical_history_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<MedicalHistory>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, condition, diagnosis_date, treatment, status, created_at
         FROM medical_history WHERE patient_id = ?1
         ORDER BY diagnosis_date DESC, id DESC",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok(HistoryRow {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            condition: row.get(2)?,
            diagnosis_date: row.get(3)?,
            treatment: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(history_from_row(row?)?);
    }
    Ok(entries)
}

// ═══════════════════════════════════════════
// Triage Record Repository
// ═══════════════════════════════════════════

pub fn insert_triage_record(conn: &Connection, record: &TriageRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO triage_records (id, patient_id, nurse_id, symptoms, priority, diagnosis, confidence, predicted_outcome, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.id.to_string(),
            record.patient_id.map(|id| id.to_string()),
            record.nurse_id.to_string(),
            record.symptoms,
            record.priority.as_str(),
            record.diagnosis,
            record.confidence,
            record.predicted_outcome,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Per-day triage counts for the analytics view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageDailyStats {
    pub date: NaiveDate,
    pub total: i64,
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

/// Count triage records per day over a trailing window ending at `end`
/// (inclusive). Every day in the window appears, zeroed when empty;
/// newest day first.
pub fn triage_daily_counts(
    conn: &Connection,
    end: NaiveDate,
    days: u32,
) -> Result<Vec<TriageDailyStats>, DatabaseError> {
    let days = days.max(1);
    let start = end - Duration::days(i64::from(days) - 1);

    let mut stmt = conn.prepare(
        "SELECT substr(created_at, 1, 10) AS day,
                COUNT(*),
                SUM(CASE WHEN priority = 'high' THEN 1 ELSE 0 END),
                SUM(CASE WHEN priority = 'medium' THEN 1 ELSE 0 END),
                SUM(CASE WHEN priority = 'low' THEN 1 ELSE 0 END)
         FROM triage_records
         WHERE substr(created_at, 1, 10) BETWEEN ?1 AND ?2
         GROUP BY day",
    )?;

    let rows = stmt.query_map(params![start.to_string(), end.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, i64>(3)?,
            row.get::<_, i64>(4)?,
        ))
    })?;

    let mut by_day: HashMap<String, (i64, i64, i64, i64)> = HashMap::new();
    for row in rows {
        let (day, total, high, medium, low) = row?;
        by_day.insert(day, (total, high, medium, low));
    }

    let mut stats = Vec::with_capacity(days as usize);
    for offset in 0..days {
        let date = end - Duration::days(i64::from(offset));
        let (total, high, medium, low) = by_day
            .get(&date.to_string())
            .copied()
            .unwrap_or((0, 0, 0, 0));
        stats.push(TriageDailyStats {
            date,
            total,
            high,
            medium,
            low,
        });
    }
    Ok(stats)
}

// ═══════════════════════════════════════════
// Audit Log Repository
// ═══════════════════════════════════════════

/// Tuples are (timestamp, nurse_id, action, entity).
pub fn insert_audit_entries(
    conn: &Connection,
    entries: &[(String, Option<String>, String, String)],
) -> Result<(), DatabaseError> {
    let mut stmt = conn.prepare(
        "INSERT INTO audit_log (timestamp, nurse_id, action, entity)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (timestamp, nurse_id, action, entity) in entries {
        stmt.execute(params![timestamp, nurse_id, action, entity])?;
    }
    Ok(())
}

/// Delete audit entries older than `keep_days`. Returns the number removed.
pub fn prune_audit_log(conn: &Connection, keep_days: u32) -> Result<usize, DatabaseError> {
    let removed = conn.execute(
        "DELETE FROM audit_log WHERE timestamp < datetime('now', ?1)",
        params![format!("-{keep_days} days")],
    )?;
    Ok(removed)
}

// ═══════════════════════════════════════════
// Prediction Log Repository
// ═══════════════════════════════════════════

/// Tuples are (timestamp, kind, nurse_id, condition, confidence, summary).
pub fn insert_prediction_entries(
    conn: &Connection,
    entries: &[(String, String, Option<String>, Option<String>, f64, String)],
) -> Result<(), DatabaseError> {
    let mut stmt = conn.prepare(
        "INSERT INTO prediction_log (timestamp, kind, nurse_id, condition, confidence, summary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (timestamp, kind, nurse_id, condition, confidence, summary) in entries {
        stmt.execute(params![timestamp, kind, nurse_id, condition, confidence, summary])?;
    }
    Ok(())
}

pub fn count_prediction_entries(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM prediction_log", [], |row| row.get(0))?;
    Ok(count)
}
