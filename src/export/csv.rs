//! CSV export of the user mailing list
//!
//! Report CSVs live next to their reports (`RevenueHistory::export_csv`,
//! `SubscriptionReport::export_csv`).

use std::io::Write;

use crate::error::{BilldeskError, BilldeskResult};
use crate::models::User;

/// Write one email address per row, without a header
pub fn export_emails<W: Write>(users: &[User], writer: W) -> BilldeskResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for user in users {
        csv_writer.write_record([user.email.as_str()])?;
    }

    csv_writer
        .flush()
        .map_err(|e| BilldeskError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;

    fn user(username: &str, email: &str) -> User {
        User::new(
            username,
            "Jane",
            "Doe",
            email,
            UserProfile {
                billing_address: "Nantes".into(),
            },
        )
    }

    #[test]
    fn test_one_email_per_row() {
        let users = vec![
            user("asmith", "alex@example.org"),
            user("jdoe", "jane@example.com"),
        ];

        let mut out = Vec::new();
        export_emails(&users, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "alex@example.org\njane@example.com\n"
        );
    }

    #[test]
    fn test_quotes_when_needed() {
        let mut out = Vec::new();
        export_emails(&[user("odd", "\"odd,one\"@example.com")], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"\"\"odd,one\"\"@example.com\"\n"
        );
    }

    #[test]
    fn test_no_users() {
        let mut out = Vec::new();
        export_emails(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
