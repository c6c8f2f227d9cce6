//! Role-based permission evaluation.
//!
//! Two tables map names to the roles allowed to use them: features (areas
//! of the admin UI) and actions (individual operations). Both are
//! default-deny: anything not listed is refused for every role.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use homacuk_core::AdminRole;
use serde::Serialize;
use thiserror::Error;

use crate::models::AdminSession;

use homacuk_core::AdminRole::{Admin, Editor};

const DEFAULT_FEATURES: &[(&str, &[AdminRole])] = &[
    ("view_dashboard", &[Admin, Editor]),
    ("manage_courses", &[Admin, Editor]),
    ("publish_course", &[Admin, Editor]),
    ("manage_enquiries", &[Admin, Editor]),
    ("manage_testimonials", &[Admin, Editor]),
    ("manage_content", &[Admin, Editor]),
    ("delete_course", &[Admin]),
    ("manage_users", &[Admin]),
    ("manage_settings", &[Admin]),
    ("view_audit_log", &[Admin]),
    ("export_data", &[Admin]),
];

const DEFAULT_ACTIONS: &[(&str, &[AdminRole])] = &[
    ("create_course", &[Admin, Editor]),
    ("edit_course", &[Admin, Editor]),
    ("publish_course", &[Admin, Editor]),
    ("reply_enquiry", &[Admin, Editor]),
    ("edit_page", &[Admin, Editor]),
    ("delete_course", &[Admin]),
    ("delete_enquiry", &[Admin]),
    ("delete_user", &[Admin]),
    ("create_user", &[Admin]),
    ("change_settings", &[Admin]),
    ("export_data", &[Admin]),
    ("view_audit_log", &[Admin]),
];

/// A refused permission check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionDenied {
    #[error("feature `{0}` is not permitted")]
    Feature(String),
    #[error("action `{0}` is not permitted")]
    Action(String),
}

/// Feature and action tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionTable {
    features: BTreeMap<String, BTreeSet<AdminRole>>,
    actions: BTreeMap<String, BTreeSet<AdminRole>>,
}

impl Default for PermissionTable {
    fn default() -> Self {
        let table = DEFAULT_FEATURES
            .iter()
            .fold(Self::empty(), |table, (name, roles)| {
                table.allow_feature(name, roles)
            });
        DEFAULT_ACTIONS
            .iter()
            .fold(table, |table, (name, roles)| table.allow_action(name, roles))
    }
}

impl PermissionTable {
    /// A table that denies everything.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            features: BTreeMap::new(),
            actions: BTreeMap::new(),
        }
    }

    /// Allow `roles` to use `feature` (in addition to any already allowed).
    #[must_use]
    pub fn allow_feature(mut self, feature: &str, roles: &[AdminRole]) -> Self {
        self.features
            .entry(feature.to_owned())
            .or_default()
            .extend(roles.iter().copied());
        self
    }

    /// Allow `roles` to perform `action` (in addition to any already allowed).
    #[must_use]
    pub fn allow_action(mut self, action: &str, roles: &[AdminRole]) -> Self {
        self.actions
            .entry(action.to_owned())
            .or_default()
            .extend(roles.iter().copied());
        self
    }

    /// Roles allowed to use `feature`, if it is listed.
    #[must_use]
    pub fn feature_roles(&self, feature: &str) -> Option<&BTreeSet<AdminRole>> {
        self.features.get(feature)
    }

    /// Roles allowed to perform `action`, if it is listed.
    #[must_use]
    pub fn action_roles(&self, action: &str) -> Option<&BTreeSet<AdminRole>> {
        self.actions.get(action)
    }

    /// All features, sorted by name.
    pub fn features(&self) -> impl Iterator<Item = (&str, &BTreeSet<AdminRole>)> {
        self.features.iter().map(|(name, roles)| (name.as_str(), roles))
    }

    /// All actions, sorted by name.
    pub fn actions(&self) -> impl Iterator<Item = (&str, &BTreeSet<AdminRole>)> {
        self.actions.iter().map(|(name, roles)| (name.as_str(), roles))
    }

    /// Evaluate permissions for a (possibly absent) session at `now`.
    #[must_use]
    pub fn evaluate<'a>(
        &'a self,
        session: Option<&'a AdminSession>,
        now: DateTime<Utc>,
    ) -> PermissionEvaluator<'a> {
        PermissionEvaluator::new(self, session, now)
    }
}

/// Answers permission questions for one session.
///
/// An expired session is dropped at construction, so every check treats it
/// exactly like no session.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    table: &'a PermissionTable,
    role: Option<AdminRole>,
}

impl<'a> PermissionEvaluator<'a> {
    #[must_use]
    pub fn new(
        table: &'a PermissionTable,
        session: Option<&AdminSession>,
        now: DateTime<Utc>,
    ) -> Self {
        let role = session
            .filter(|session| !session.is_expired_at(now))
            .map(AdminSession::role);
        Self { table, role }
    }

    /// Role of the live session, if any.
    #[must_use]
    pub const fn role(&self) -> Option<AdminRole> {
        self.role
    }

    /// Whether a live session exists.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }

    /// Role check. `Admin` satisfies every required role.
    #[must_use]
    pub fn has_role(&self, required: AdminRole) -> bool {
        match self.role {
            None => false,
            Some(Admin) => true,
            Some(role) => role == required,
        }
    }

    /// Whether the session may use `feature`. Unlisted features are denied.
    #[must_use]
    pub fn has_permission(&self, feature: &str) -> bool {
        self.allowed(self.table.feature_roles(feature))
    }

    /// Whether the session may perform `action`. Unlisted actions are denied.
    #[must_use]
    pub fn can_perform_action(&self, action: &str) -> bool {
        self.allowed(self.table.action_roles(action))
    }

    /// [`Self::has_permission`] as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied::Feature` when the check fails.
    pub fn require_permission(&self, feature: &str) -> Result<(), PermissionDenied> {
        if self.has_permission(feature) {
            Ok(())
        } else {
            Err(PermissionDenied::Feature(feature.to_owned()))
        }
    }

    /// [`Self::can_perform_action`] as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied::Action` when the check fails.
    pub fn require_action(&self, action: &str) -> Result<(), PermissionDenied> {
        if self.can_perform_action(action) {
            Ok(())
        } else {
            Err(PermissionDenied::Action(action.to_owned()))
        }
    }

    /// Features the session may use, sorted.
    #[must_use]
    pub fn allowed_features(&self) -> Vec<&'a str> {
        self.table
            .features()
            .filter(|(_, roles)| self.allowed(Some(*roles)))
            .map(|(name, _)| name)
            .collect()
    }

    /// Actions the session may perform, sorted.
    #[must_use]
    pub fn allowed_actions(&self) -> Vec<&'a str> {
        self.table
            .actions()
            .filter(|(_, roles)| self.allowed(Some(*roles)))
            .map(|(name, _)| name)
            .collect()
    }

    fn allowed(&self, roles: Option<&BTreeSet<AdminRole>>) -> bool {
        match (self.role, roles) {
            (Some(role), Some(roles)) => roles.contains(&role),
            _ => false,
        }
    }
}
