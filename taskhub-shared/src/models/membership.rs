/// Project roster model and database operations
///
/// The roster records who owns a project and who participates in it. It is
/// stored as a relation table keyed by project, username and role, so the
/// same user can be both owner and member of a project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_role AS ENUM ('owner', 'member');
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     username VARCHAR(50) NOT NULL
///         REFERENCES users(username) ON UPDATE CASCADE ON DELETE CASCADE,
///     role project_role NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, username, role)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: may edit or delete the project and manage its roster
/// - **member**: may view the project and create tasks in it
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::membership::{ProjectMember, ProjectRole};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid) -> Result<(), sqlx::Error> {
/// let roster = ProjectMember::replace(
///     &pool,
///     project_id,
///     ProjectRole::Member,
///     &["bob".to_string(), "dave".to_string()],
/// ).await?;
///
/// assert!(roster.is_member("bob"));
/// # Ok(())
/// # }
/// ```

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Role of a user within one project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Owner,
    Member,
}

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::Member => "member",
        }
    }
}

/// One roster entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub username: String,
    pub role: ProjectRole,
    pub created_at: DateTime<Utc>,
}

/// Owners and members of a project as username sets
///
/// Membership tests are exact, case-sensitive string comparisons. An empty
/// roster grants nothing to anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRoster {
    pub owners: BTreeSet<String>,
    pub members: BTreeSet<String>,
}

impl ProjectRoster {
    /// Builds a roster from owner and member name lists
    pub fn new<O, M>(owners: O, members: M) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            owners: owners.into_iter().map(Into::into).collect(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_owner(&self, username: &str) -> bool {
        self.owners.contains(username)
    }

    pub fn is_member(&self, username: &str) -> bool {
        self.members.contains(username)
    }

    /// True if the user is an owner or a member
    pub fn is_participant(&self, username: &str) -> bool {
        self.is_owner(username) || self.is_member(username)
    }

    /// Returns the set for one role
    pub fn usernames(&self, role: ProjectRole) -> &BTreeSet<String> {
        match role {
            ProjectRole::Owner => &self.owners,
            ProjectRole::Member => &self.members,
        }
    }

    fn insert(&mut self, username: String, role: ProjectRole) {
        match role {
            ProjectRole::Owner => self.owners.insert(username),
            ProjectRole::Member => self.members.insert(username),
        };
    }
}

impl FromIterator<ProjectMember> for ProjectRoster {
    fn from_iter<I: IntoIterator<Item = ProjectMember>>(iter: I) -> Self {
        let mut roster = ProjectRoster::default();
        for entry in iter {
            roster.insert(entry.username, entry.role);
        }
        roster
    }
}

impl ProjectMember {
    /// Loads the roster of one project
    ///
    /// A project without roster rows (or a missing project) yields an empty
    /// roster; existence of the project is checked by the caller.
    pub async fn roster(pool: &PgPool, project_id: Uuid) -> Result<ProjectRoster, sqlx::Error> {
        let entries = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT project_id, username, role, created_at
            FROM project_members
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(entries.into_iter().collect())
    }

    /// Loads the rosters of several projects in one query
    ///
    /// Every requested ID is present in the result, with an empty roster if
    /// it has no entries.
    pub async fn rosters(
        pool: &PgPool,
        project_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, ProjectRoster>, sqlx::Error> {
        let mut rosters: HashMap<Uuid, ProjectRoster> = project_ids
            .iter()
            .map(|id| (*id, ProjectRoster::default()))
            .collect();

        if project_ids.is_empty() {
            return Ok(rosters);
        }

        let entries = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT project_id, username, role, created_at
            FROM project_members
            WHERE project_id = ANY($1)
            "#,
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await?;

        for entry in entries {
            rosters
                .entry(entry.project_id)
                .or_default()
                .insert(entry.username, entry.role);
        }

        Ok(rosters)
    }

    /// Replaces every entry of `role` on a project with `usernames`
    ///
    /// Duplicate names collapse. Applying the same list twice leaves the
    /// roster unchanged. The delete and the inserts share one transaction.
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if a username has no account.
    pub async fn replace(
        pool: &PgPool,
        project_id: Uuid,
        role: ProjectRole,
        usernames: &[String],
    ) -> Result<ProjectRoster, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let roster = Self::replace_in(&mut tx, project_id, role, usernames).await?;
        tx.commit().await?;

        Ok(roster)
    }

    /// Same as [`replace`](Self::replace), on a connection the caller owns
    ///
    /// Used inside a larger transaction; nothing is committed here.
    pub async fn replace_in(
        conn: &mut PgConnection,
        project_id: Uuid,
        role: ProjectRole,
        usernames: &[String],
    ) -> Result<ProjectRoster, sqlx::Error> {
        let unique: BTreeSet<&String> = usernames.iter().collect();

        sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND role = $2")
            .bind(project_id)
            .bind(role)
            .execute(&mut *conn)
            .await?;

        for username in unique {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, username, role)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(project_id)
            .bind(username)
            .bind(role)
            .execute(&mut *conn)
            .await?;
        }

        let entries = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT project_id, username, role, created_at
            FROM project_members
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(username: &str, role: ProjectRole) -> ProjectMember {
        ProjectMember {
            project_id: Uuid::nil(),
            username: username.to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_roster_from_entries() {
        let roster: ProjectRoster = vec![
            entry("alice", ProjectRole::Owner),
            entry("bob", ProjectRole::Member),
            entry("alice", ProjectRole::Member),
        ]
        .into_iter()
        .collect();

        assert!(roster.is_owner("alice"));
        assert!(roster.is_member("alice"));
        assert!(roster.is_member("bob"));
        assert!(!roster.is_owner("bob"));
        assert_eq!(roster.usernames(ProjectRole::Member).len(), 2);
    }

    #[test]
    fn test_roster_membership_is_case_sensitive() {
        let roster = ProjectRoster::new(["alice"], ["bob"]);

        assert!(!roster.is_owner("Alice"));
        assert!(!roster.is_member("BOB"));
        assert!(!roster.is_participant("alice "));
        assert!(roster.is_participant("bob"));
    }

    #[test]
    fn test_empty_roster_grants_nothing() {
        let roster = ProjectRoster::default();
        assert!(!roster.is_participant("alice"));
        assert!(!roster.is_participant(""));
    }

    #[test]
    fn test_roster_duplicates_collapse() {
        let roster = ProjectRoster::new(["alice", "alice"], Vec::<String>::new());
        assert_eq!(roster.owners.len(), 1);
    }

    #[test]
    fn test_roster_serializes_as_sorted_lists() {
        let roster = ProjectRoster::new(["zoe", "alice"], ["bob"]);
        let json = serde_json::to_value(&roster).unwrap();
        assert_eq!(json["owners"], serde_json::json!(["alice", "zoe"]));
        assert_eq!(json["members"], serde_json::json!(["bob"]));
    }
}
