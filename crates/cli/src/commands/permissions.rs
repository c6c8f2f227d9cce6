//! Print the permission table.
//!
//! # Usage
//!
//! ```bash
//! # Every feature and action with the roles allowed to use it
//! homacuk-cli permissions
//!
//! # Only what editors may do
//! homacuk-cli permissions --role editor
//! ```

use std::collections::BTreeSet;
use std::fmt::Write as _;

use homacuk_admin::services::PermissionTable;
use homacuk_core::{AdminRole, RoleParseError};

/// Print the default permission table, optionally filtered to one role.
///
/// # Errors
///
/// Returns `RoleParseError` if `role` is not a known role.
pub fn show(role: Option<&str>) -> Result<(), RoleParseError> {
    let role = role.map(str::parse::<AdminRole>).transpose()?;
    let rendered = render(&PermissionTable::default(), role);

    #[allow(clippy::print_stdout)]
    {
        print!("{rendered}");
    }
    Ok(())
}

/// Render `table` as two aligned sections.
///
/// With `role`, only the entries that role may use are listed.
pub fn render(table: &PermissionTable, role: Option<AdminRole>) -> String {
    let mut out = String::new();
    section(&mut out, "Features", table.features(), role);
    out.push('\n');
    section(&mut out, "Actions", table.actions(), role);
    out
}

fn section<'a>(
    out: &mut String,
    title: &str,
    entries: impl Iterator<Item = (&'a str, &'a BTreeSet<AdminRole>)>,
    role: Option<AdminRole>,
) {
    let entries: Vec<_> = entries
        .filter(|(_, roles)| role.is_none_or(|role| roles.contains(&role)))
        .collect();
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let _ = writeln!(out, "{title}:");
    if entries.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (name, roles) in entries {
        let roles = roles
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  {name:<width$}  {roles}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_table() {
        let out = render(&PermissionTable::default(), None);
        assert!(out.starts_with("Features:\n"));
        assert!(out.contains("view_audit_log"));
        assert!(out.contains("admin, editor"));
        assert!(out.contains("\nActions:\n"));
    }

    #[test]
    fn test_render_for_editor_hides_admin_only_entries() {
        let out = render(&PermissionTable::default(), Some(AdminRole::Editor));
        assert!(out.contains("publish_course"));
        assert!(!out.contains("delete_user"));
        assert!(!out.contains("view_audit_log"));
    }

    #[test]
    fn test_render_empty_table() {
        let out = render(&PermissionTable::empty(), None);
        assert_eq!(out, "Features:\n  (none)\n\nActions:\n  (none)\n");
    }
}
