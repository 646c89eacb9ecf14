use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{Store, StoreError, StoreResult, TagStore, TeamStore, TodoStore, UserStore};
use crate::models::{
    NewTeam, NewTodo, NewUser, Tag, Team, TeamMember, TeamMembership, TeamRole, Todo, User,
};

/// In-process store for `TODO_STORAGE=memory` and for tests.
///
/// Enforces the same uniqueness rules as the SQL schema. A single mutex
/// guards all tables so multi-table writes are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    todos: BTreeMap<i64, Todo>,
    tags: BTreeMap<i64, Tag>,
    teams: BTreeMap<i64, Team>,
    members: Vec<TeamMember>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> Arc<dyn Store> {
        Arc::new(self)
    }
}

fn sorted_by_name(mut tags: Vec<Tag>) -> Vec<Tag> {
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    tags
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn user_exists_by_username(&self, username: &str) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().any(|u| u.username == username))
    }

    async fn user_exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        if tables
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: tables.next_id(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            enabled: user.enabled,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn count_users(&self) -> StoreResult<i64> {
        Ok(self.tables.lock().await.users.len() as i64)
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn find_todo_by_id(&self, id: i64) -> StoreResult<Option<Todo>> {
        Ok(self.tables.lock().await.todos.get(&id).cloned())
    }

    async fn find_todos_by_owner(&self, user_id: i64) -> StoreResult<Vec<Todo>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .todos
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_todos_by_team(&self, team_id: i64) -> StoreResult<Vec<Todo>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .todos
            .values()
            .filter(|t| t.team_id == Some(team_id))
            .cloned()
            .collect())
    }

    async fn insert_todo(&self, todo: NewTodo) -> StoreResult<Todo> {
        let mut tables = self.tables.lock().await;
        let created = Todo {
            id: tables.next_id(),
            name: todo.name,
            description: todo.description,
            due_date: todo.due_date,
            status: todo.status,
            priority: todo.priority,
            user_id: todo.user_id,
            team_id: todo.team_id,
            tags: sorted_by_name(todo.tags),
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        };
        tables.todos.insert(created.id, created.clone());
        Ok(created)
    }

    async fn save_todo(&self, todo: &Todo) -> StoreResult<Todo> {
        let mut tables = self.tables.lock().await;
        let slot = tables
            .todos
            .get_mut(&todo.id)
            .ok_or_else(|| StoreError::NotFound("Todo not found".to_string()))?;

        let mut saved = todo.clone();
        saved.created_at = slot.created_at;
        saved.user_id = slot.user_id;
        saved.tags = sorted_by_name(saved.tags);
        *slot = saved.clone();
        Ok(saved)
    }

    async fn delete_todo(&self, id: i64) -> StoreResult<()> {
        self.tables.lock().await.todos.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn find_tag_by_id(&self, id: i64) -> StoreResult<Option<Tag>> {
        Ok(self.tables.lock().await.tags.get(&id).cloned())
    }

    async fn find_tags_by_ids(&self, ids: &[i64], user_id: i64) -> StoreResult<Vec<Tag>> {
        let tables = self.tables.lock().await;
        let found = tables
            .tags
            .values()
            .filter(|t| t.user_id == user_id && ids.contains(&t.id))
            .cloned()
            .collect();
        Ok(sorted_by_name(found))
    }

    async fn find_tags_by_owner(&self, user_id: i64) -> StoreResult<Vec<Tag>> {
        let tables = self.tables.lock().await;
        let found = tables
            .tags
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        Ok(sorted_by_name(found))
    }

    async fn tag_exists_by_name_and_owner(&self, name: &str, user_id: i64) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .tags
            .values()
            .any(|t| t.user_id == user_id && t.name == name))
    }

    async fn insert_tag(&self, name: &str, user_id: i64) -> StoreResult<Tag> {
        let mut tables = self.tables.lock().await;
        if tables
            .tags
            .values()
            .any(|t| t.user_id == user_id && t.name == name)
        {
            return Err(StoreError::Conflict(
                "A tag with this name already exists".to_string(),
            ));
        }

        let created = Tag {
            id: tables.next_id(),
            name: name.to_string(),
            user_id,
            created_at: Utc::now(),
        };
        tables.tags.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_tag(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;
        tables.tags.remove(&id);
        for todo in tables.todos.values_mut() {
            todo.tags.retain(|t| t.id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    async fn find_team_by_id(&self, id: i64) -> StoreResult<Option<Team>> {
        Ok(self.tables.lock().await.teams.get(&id).cloned())
    }

    async fn team_exists_by_name(&self, name: &str) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.teams.values().any(|t| t.name == name))
    }

    async fn find_teams_by_member(&self, user_id: i64) -> StoreResult<Vec<TeamMembership>> {
        let tables = self.tables.lock().await;
        let mut memberships: Vec<TeamMembership> = tables
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                tables.teams.get(&m.team_id).map(|team| TeamMembership {
                    team: team.clone(),
                    role: m.role,
                })
            })
            .collect();
        memberships.sort_by(|a, b| a.team.name.cmp(&b.team.name));
        Ok(memberships)
    }

    async fn find_team_role(&self, team_id: i64, user_id: i64) -> StoreResult<Option<TeamRole>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .members
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .map(|m| m.role))
    }

    async fn insert_team(&self, team: NewTeam) -> StoreResult<Team> {
        let mut tables = self.tables.lock().await;
        if tables.teams.values().any(|t| t.name == team.name) {
            return Err(StoreError::Conflict(
                "A team with this name already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let created = Team {
            id: tables.next_id(),
            name: team.name,
            description: team.description,
            creator_id: team.creator_id,
            created_at: now,
        };
        tables.teams.insert(created.id, created.clone());
        tables.members.push(TeamMember {
            team_id: created.id,
            user_id: created.creator_id,
            role: TeamRole::Admin,
            joined_at: now,
        });
        Ok(created)
    }

    async fn insert_team_member(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> StoreResult<TeamMember> {
        let mut tables = self.tables.lock().await;
        if tables
            .members
            .iter()
            .any(|m| m.team_id == team_id && m.user_id == user_id)
        {
            return Err(StoreError::Conflict(
                "User is already a member of this team".to_string(),
            ));
        }

        let member = TeamMember {
            team_id,
            user_id,
            role,
            joined_at: Utc::now(),
        };
        tables.members.push(member.clone());
        Ok(member)
    }

    async fn find_team_members(&self, team_id: i64) -> StoreResult<Vec<TeamMember>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .members
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::todo::TodoBuilder;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "hash".to_string(),
            role: UserRole::User,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemoryStore::new();
        store.insert_user(new_user("alice")).await.unwrap();
        let err = store.insert_user(new_user("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn tags_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let mine = store.insert_tag("home", 1).await.unwrap();
        let theirs = store.insert_tag("home", 2).await.unwrap();

        let found = store.find_tags_by_ids(&[mine.id, theirs.id, 999], 1).await.unwrap();
        assert_eq!(found, vec![mine]);
    }

    #[tokio::test]
    async fn team_creator_becomes_admin() {
        let store = MemoryStore::new();
        let team = store
            .insert_team(NewTeam {
                name: "platform".into(),
                description: None,
                creator_id: 5,
            })
            .await
            .unwrap();

        assert_eq!(
            store.find_team_role(team.id, 5).await.unwrap(),
            Some(TeamRole::Admin)
        );
        assert_eq!(store.find_team_members(team.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn saving_a_deleted_todo_is_not_found() {
        let store = MemoryStore::new();
        let todo = store
            .insert_todo(TodoBuilder::new("taxes", Utc::now(), 1).build())
            .await
            .unwrap();
        store.delete_todo(todo.id).await.unwrap();

        let err = store.save_todo(&todo).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref m) if m == "Todo not found"));
    }
}
