//! User display formatting

use crate::models::User;

/// Format users as `username  full name  e-mail` rows
pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let login_width = users
        .iter()
        .map(|u| u.username().len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    for user in users {
        let admin = if user.is_admin() { "  (admin)" } else { "" };
        output.push_str(&format!(
            "{:<login_width$}  {}  <{}>{}\n",
            user.username(),
            user.full_name(),
            user.email(),
            admin,
            login_width = login_width,
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_user_list() {
        let users = vec![
            User::new("jsmith", "john@example.com", "John", "Smith", "hash"),
            User::new("admin", "admin@bank.com", "The", "Administrator", "hash").with_admin(true),
        ];
        let output = format_user_list(&users);
        assert!(output.contains("jsmith    John Smith  <john@example.com>"));
        assert!(output.contains("(admin)"));
    }
}
