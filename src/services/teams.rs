use super::require_non_blank;
use crate::dto::{
    AddMemberRequest, CreateTeamRequest, TeamMemberResponse, TeamResponse, TodoResponse,
};
use crate::error::AppError;
use crate::models::{NewTeam, Team, TeamMembership, TeamRole};
use crate::store::Store;

/// The team and the caller's role in it. Absent team is `NotFound`; a
/// non-member is `AccessDenied`.
async fn require_member(
    store: &dyn Store,
    caller: i64,
    team_id: i64,
) -> Result<(Team, TeamRole), AppError> {
    let team = store
        .find_team_by_id(team_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team not found with id: {team_id}")))?;

    let role = store
        .find_team_role(team_id, caller)
        .await?
        .ok_or_else(|| AppError::AccessDenied("You are not a member of this team".to_string()))?;

    Ok((team, role))
}

pub async fn create(
    store: &dyn Store,
    caller: i64,
    req: CreateTeamRequest,
) -> Result<TeamResponse, AppError> {
    let name = require_non_blank(&req.name, "Team name")?;

    if store.team_exists_by_name(&name).await? {
        return Err(AppError::Duplicate("Team name already exists".to_string()));
    }

    let team = store
        .insert_team(NewTeam {
            name,
            description: req.description,
            creator_id: caller,
        })
        .await?;

    tracing::info!(team_id = team.id, user_id = caller, "Team created");
    Ok(TeamResponse::from(&TeamMembership {
        team,
        role: TeamRole::Admin,
    }))
}

pub async fn list_mine(store: &dyn Store, caller: i64) -> Result<Vec<TeamResponse>, AppError> {
    let teams = store.find_teams_by_member(caller).await?;
    Ok(teams.iter().map(TeamResponse::from).collect())
}

pub async fn members(
    store: &dyn Store,
    caller: i64,
    team_id: i64,
) -> Result<Vec<TeamMemberResponse>, AppError> {
    require_member(store, caller, team_id).await?;
    let members = store.find_team_members(team_id).await?;
    Ok(members.iter().map(TeamMemberResponse::from).collect())
}

pub async fn add_member(
    store: &dyn Store,
    caller: i64,
    team_id: i64,
    req: AddMemberRequest,
) -> Result<TeamMemberResponse, AppError> {
    let (team, caller_role) = require_member(store, caller, team_id).await?;
    if caller_role != TeamRole::Admin {
        return Err(AppError::AccessDenied(
            "Only team admins can add members".to_string(),
        ));
    }

    let role = match req.role.as_deref() {
        Some(r) => r.parse::<TeamRole>()?,
        None => TeamRole::Member,
    };

    if store.find_user_by_id(req.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "User not found with id: {}",
            req.user_id
        )));
    }

    if store.find_team_role(team.id, req.user_id).await?.is_some() {
        return Err(AppError::Duplicate(
            "User is already a member of this team".to_string(),
        ));
    }

    let member = store.insert_team_member(team.id, req.user_id, role).await?;

    tracing::info!(team_id = team.id, user_id = req.user_id, role = %role, "Team member added");
    Ok(TeamMemberResponse::from(&member))
}

/// Every to-do filed under the team, whoever owns it. Members only.
pub async fn todos(
    store: &dyn Store,
    caller: i64,
    team_id: i64,
) -> Result<Vec<TodoResponse>, AppError> {
    require_member(store, caller, team_id).await?;
    let todos = store.find_todos_by_team(team_id).await?;
    Ok(todos.iter().map(TodoResponse::from).collect())
}
