pub mod enums;
pub mod medical_history;
pub mod nurse;
pub mod patient;
pub mod triage_record;

pub use medical_history::MedicalHistory;
pub use nurse::Nurse;
pub use patient::Patient;
pub use triage_record::TriageRecord;
