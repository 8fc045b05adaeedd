use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered triage nurse account. Never serialized directly —
/// responses are built field by field so the password hash stays internal.
#[derive(Debug, Clone)]
pub struct Nurse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub nurse_id: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Nurse {
    /// First name for dashboard greetings; falls back to the full name.
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_nurse(full_name: &str) -> Nurse {
        Nurse {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            email: "nurse@example.org".into(),
            nurse_id: "RN-1001".into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn first_name_takes_leading_word() {
        assert_eq!(make_nurse("Joy Okafor").first_name(), "Joy");
    }

    #[test]
    fn first_name_of_single_word_name() {
        assert_eq!(make_nurse("Joy").first_name(), "Joy");
    }

    #[test]
    fn first_name_of_empty_name_is_empty() {
        assert_eq!(make_nurse("").first_name(), "");
    }
}
