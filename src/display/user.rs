//! User display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::User;

use super::report::yes_no;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Full name")]
    full_name: String,
    #[tabled(rename = "Email")]
    email: String,
}

/// Username, full name and email for every user
pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let rows = users.iter().map(|u| UserRow {
        username: u.username.clone(),
        full_name: u.full_name(),
        email: u.email.clone(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

pub fn format_user_details(user: &User, bill_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("User: {}\n", user.label()));
    output.push_str(&format!("  ID:              {}\n", user.id));
    output.push_str(&format!("  Email:           {}\n", user.email));
    output.push_str(&format!(
        "  Billing address: {}\n",
        user.profile.billing_address
    ));
    output.push_str(&format!("  Active:          {}\n", yes_no(user.is_active)));
    output.push_str(&format!("  Staff:           {}\n", yes_no(user.is_staff)));
    output.push_str(&format!(
        "  Joined:          {}\n",
        user.date_joined.format("%Y-%m-%d")
    ));
    if let Some(last_login) = user.last_login {
        output.push_str(&format!(
            "  Last login:      {}\n",
            last_login.format("%Y-%m-%d %H:%M")
        ));
    }
    output.push_str(&format!("  Bills:           {}\n", bill_count));

    output
}
