use chrono::{DateTime, TimeZone, Utc};

use todo_server::auth::{jwt, password};
use todo_server::config::{Config, StorageBackend};
use todo_server::dto::{
    AddMemberRequest, CreateTagRequest, CreateTeamRequest, CreateTodoRequest, FilterParams,
    LoginRequest, RegisterRequest, SortParams, TodoResponse, UpdateTodoRequest,
};
use todo_server::error::AppError;
use todo_server::models::{NewUser, UserRole};
use todo_server::rate_limit::LoginRateLimiter;
use todo_server::services::{tags, teams, todos, users};
use todo_server::store::{MemoryStore, UserStore};

fn due(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, day, 9, 0, 0).unwrap()
}

fn config() -> Config {
    Config {
        storage: StorageBackend::Memory,
        database_url: None,
        jwt_secret: "service-test-secret-long-enough".to_string(),
        jwt_expiration_minutes: 30,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        max_body_size: 1024,
        log_level: "warn".to_string(),
    }
}

async fn user(store: &MemoryStore, name: &str) -> i64 {
    users::register(
        store,
        RegisterRequest {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "password123".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_todo(name: &str, day: u32) -> CreateTodoRequest {
    CreateTodoRequest {
        name: name.to_string(),
        description: None,
        due_date: due(day),
        status: None,
        priority: None,
        tag_ids: None,
        team_id: None,
    }
}

async fn todo(store: &MemoryStore, owner: i64, req: CreateTodoRequest) -> TodoResponse {
    todos::create(store, owner, req).await.unwrap()
}

fn ids(list: &[TodoResponse]) -> Vec<i64> {
    list.iter().map(|t| t.id).collect()
}

// ── Users ───────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_username_leaves_user_count_unchanged() {
    let store = MemoryStore::new();
    user(&store, "alice").await;
    let before = store.count_users().await.unwrap();

    let err = users::register(
        &store,
        RegisterRequest {
            username: "alice".into(),
            email: "different@example.com".into(),
            password: "password123".into(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Duplicate(ref m) if m == "Username already exists"));
    assert_eq!(store.count_users().await.unwrap(), before);
}

#[tokio::test]
async fn username_is_checked_before_email() {
    let store = MemoryStore::new();
    user(&store, "alice").await;

    let err = users::register(
        &store,
        RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "password123".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(ref m) if m == "Username already exists"));

    let err = users::register(
        &store,
        RegisterRequest {
            username: "alicia".into(),
            email: "alice@example.com".into(),
            password: "password123".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(ref m) if m == "Email already exists"));
}

#[tokio::test]
async fn stored_password_is_hashed() {
    let store = MemoryStore::new();
    let id = user(&store, "alice").await;

    let stored = store.find_user_by_id(id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "password123");
    assert!(stored.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn login_issues_token_for_the_user() {
    let store = MemoryStore::new();
    let id = user(&store, "alice").await;
    let limiter = LoginRateLimiter::new();
    let config = config();

    let resp = users::login(
        &store,
        &limiter,
        &config,
        LoginRequest {
            username: "alice".into(),
            password: "password123".into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(resp.expires_in, 30 * 60);
    let claims = jwt::decode_token(&resp.token, &config.jwt_secret).unwrap();
    assert_eq!(users::resolve_current_user_id(Some(&claims)).unwrap(), id);
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let store = MemoryStore::new();
    user(&store, "alice").await;

    let err = users::login(
        &store,
        &LoginRateLimiter::new(),
        &config(),
        LoginRequest {
            username: "alice".into(),
            password: "nope-nope-nope".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::AuthenticationRequired(ref m) if m == "Invalid credentials"));
}

#[tokio::test]
async fn disabled_account_is_denied_after_password_check() {
    let store = MemoryStore::new();
    store
        .insert_user(NewUser {
            username: "carol".into(),
            email: "carol@example.com".into(),
            password_hash: password::hash("password123").unwrap(),
            role: UserRole::User,
            enabled: false,
        })
        .await
        .unwrap();
    let limiter = LoginRateLimiter::new();
    let config = config();
    let attempt = |secret: &str| LoginRequest {
        username: "carol".into(),
        password: secret.into(),
    };

    let err = users::login(&store, &limiter, &config, attempt("password123"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(ref m) if m == "Account is disabled"));

    let err = users::login(&store, &limiter, &config, attempt("wrong-password"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthenticationRequired(ref m) if m == "Invalid credentials"));
}

// ── Todo construction ───────────────────────────────────────────

#[tokio::test]
async fn defaults_and_high_priority_rule() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;

    let plain = todo(&store, alice, new_todo("plain", 1)).await;
    assert_eq!(plain.status, "NOT_STARTED");
    assert_eq!(plain.priority, "MEDIUM");
    assert_eq!(plain.user_id, alice);

    let mut req = new_todo("urgent", 1);
    req.priority = Some("High".into());
    let urgent = todo(&store, alice, req).await;
    assert_eq!(urgent.status, "IN_PROGRESS");
    assert_eq!(urgent.priority, "HIGH");

    let mut req = new_todo("low", 1);
    req.priority = Some("low".into());
    let low = todo(&store, alice, req).await;
    assert_eq!(low.status, "NOT_STARTED");
    assert_eq!(low.priority, "LOW");
}

#[tokio::test]
async fn create_for_missing_user_is_not_found() {
    let store = MemoryStore::new();
    let err = todos::create(&store, 404, new_todo("ghost", 1)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn invalid_priority_override_is_rejected() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;

    let mut req = new_todo("x", 1);
    req.priority = Some("CRITICAL".into());
    let err = todos::create(&store, alice, req).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidArgument(ref m) if m == "Invalid priority value: CRITICAL"
    ));
}

// ── Ownership ───────────────────────────────────────────────────

#[tokio::test]
async fn every_operation_checks_ownership() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;
    let t = todo(&store, alice, new_todo("mine", 1)).await;

    let read = todos::get(&store, alice, t.id).await.unwrap();
    assert_eq!(read.user_id, alice);

    let err = todos::get(&store, bob, t.id).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::AccessDenied(ref m) if m == "You are not authorized to access this todo"
    ));

    let err = todos::update(&store, bob, t.id, UpdateTodoRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::AccessDenied(ref m) if m == "You are not authorized to update this todo"
    ));

    let err = todos::delete(&store, bob, t.id).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::AccessDenied(ref m) if m == "You are not authorized to delete this todo"
    ));

    // Still there for the owner
    assert!(todos::get(&store, alice, t.id).await.is_ok());
}

#[tokio::test]
async fn unknown_id_is_not_found_for_everyone() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;

    assert!(matches!(todos::get(&store, alice, 777).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        todos::update(&store, alice, 777, UpdateTodoRequest::default()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(todos::delete(&store, alice, 777).await, Err(AppError::NotFound(_))));
}

// ── Update ──────────────────────────────────────────────────────

#[tokio::test]
async fn name_only_update_leaves_other_fields() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let tag = tags::create(&store, alice, CreateTagRequest { name: "work".into() })
        .await
        .unwrap();

    let mut req = new_todo("draft", 3);
    req.description = Some("notes".into());
    req.status = Some("IN_PROGRESS".into());
    req.priority = Some("LOW".into());
    req.tag_ids = Some(vec![tag.id]);
    let before = todo(&store, alice, req).await;

    let after = todos::update(
        &store,
        alice,
        before.id,
        UpdateTodoRequest {
            name: Some("final".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(after.name, "final");
    assert_eq!(after.description, before.description);
    assert_eq!(after.due_date, before.due_date);
    assert_eq!(after.status, before.status);
    assert_eq!(after.priority, before.priority);
    assert_eq!(after.tags, vec!["work".to_string()]);
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn blank_name_update_is_rejected() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let t = todo(&store, alice, new_todo("x", 1)).await;

    let err = todos::update(
        &store,
        alice,
        t.id,
        UpdateTodoRequest {
            name: Some("  ".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
}

#[tokio::test]
async fn overlong_description_is_rejected() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;

    let mut req = new_todo("long", 1);
    req.description = Some("é".repeat(501));
    let err = todos::create(&store, alice, req).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let mut req = new_todo("fits", 1);
    req.description = Some("é".repeat(500));
    let t = todo(&store, alice, req).await;

    let err = todos::update(
        &store,
        alice,
        t.id,
        UpdateTodoRequest {
            description: Some("x".repeat(501)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let unchanged = todos::get(&store, alice, t.id).await.unwrap();
    assert_eq!(unchanged.description.map(|d| d.chars().count()), Some(500));
}

#[tokio::test]
async fn empty_tag_ids_clear_tags() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let tag = tags::create(&store, alice, CreateTagRequest { name: "home".into() })
        .await
        .unwrap();

    let mut req = new_todo("x", 1);
    req.tag_ids = Some(vec![tag.id]);
    let t = todo(&store, alice, req).await;
    assert_eq!(t.tags, vec!["home".to_string()]);

    let cleared = todos::update(
        &store,
        alice,
        t.id,
        UpdateTodoRequest {
            tag_ids: Some(vec![]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(cleared.tags.is_empty());
}

// ── Filter & sort ───────────────────────────────────────────────

#[tokio::test]
async fn filter_keeps_relative_order() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;

    let mut created = Vec::new();
    for (i, status) in ["COMPLETED", "NOT_STARTED", "COMPLETED", "IN_PROGRESS", "COMPLETED"]
        .into_iter()
        .enumerate()
    {
        let mut req = new_todo(&format!("t{i}"), 1);
        req.status = Some(status.into());
        created.push(todo(&store, alice, req).await);
    }
    // Someone else's completed to-do must not leak in
    let mut req = new_todo("bobs", 1);
    req.status = Some("COMPLETED".into());
    todo(&store, bob, req).await;

    let params = FilterParams {
        filter_type: "status".into(),
        filter_value: "completed".into(),
    };
    let done = todos::filter(&store, alice, &params).await.unwrap();
    assert_eq!(ids(&done), vec![created[0].id, created[2].id, created[4].id]);

    let params = FilterParams {
        filter_type: "status".into(),
        filter_value: "finished".into(),
    };
    let err = todos::filter(&store, alice, &params).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidArgument(ref m) if m == "Invalid status value: finished"
    ));
}

#[tokio::test]
async fn unsupported_strategy_keys_are_rejected() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;

    let err = todos::filter(
        &store,
        alice,
        &FilterParams {
            filter_type: "owner".into(),
            filter_value: "x".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidArgument(ref m) if m == "Unsupported filter type: owner"
    ));

    let err = todos::sort(
        &store,
        alice,
        &SortParams {
            sort_type: "createdAt".into(),
            sort_direction: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidArgument(ref m) if m == "Unsupported sort type: createdAt"
    ));
}

#[tokio::test]
async fn due_date_sort_directions_are_mirror_images() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;

    for day in [5, 2, 9, 1, 7] {
        todo(&store, alice, new_todo(&format!("d{day}"), day)).await;
    }

    let asc = todos::sort(
        &store,
        alice,
        &SortParams {
            sort_type: "dueDate".into(),
            sort_direction: Some("asc".into()),
        },
    )
    .await
    .unwrap();
    let desc = todos::sort(
        &store,
        alice,
        &SortParams {
            sort_type: "dueDate".into(),
            sort_direction: Some("desc".into()),
        },
    )
    .await
    .unwrap();

    assert!(asc.windows(2).all(|w| w[0].due_date <= w[1].due_date));
    let mut reversed = ids(&desc);
    reversed.reverse();
    assert_eq!(ids(&asc), reversed);
}

// ── Tags ────────────────────────────────────────────────────────

#[tokio::test]
async fn foreign_and_unknown_tag_ids_are_ignored() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;

    let own = tags::create(&store, alice, CreateTagRequest { name: "mine".into() })
        .await
        .unwrap();
    let foreign = tags::create(&store, bob, CreateTagRequest { name: "theirs".into() })
        .await
        .unwrap();

    let mut req = new_todo("x", 1);
    req.tag_ids = Some(vec![own.id, foreign.id, 12345]);
    let t = todo(&store, alice, req).await;
    assert_eq!(t.tags, vec!["mine".to_string()]);
}

#[tokio::test]
async fn tag_names_are_unique_per_owner() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;

    tags::create(&store, alice, CreateTagRequest { name: "work".into() })
        .await
        .unwrap();
    let err = tags::create(&store, alice, CreateTagRequest { name: "work".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));

    // Same name, different owner
    assert!(tags::create(&store, bob, CreateTagRequest { name: "work".into() })
        .await
        .is_ok());
}

#[tokio::test]
async fn deleting_a_todo_keeps_its_tags() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let tag = tags::create(&store, alice, CreateTagRequest { name: "keep".into() })
        .await
        .unwrap();

    let mut req = new_todo("x", 1);
    req.tag_ids = Some(vec![tag.id]);
    let t = todo(&store, alice, req).await;

    todos::delete(&store, alice, t.id).await.unwrap();

    let remaining = tags::list(&store, alice).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "keep");
}

#[tokio::test]
async fn deleting_a_tag_unlinks_it() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let tag = tags::create(&store, alice, CreateTagRequest { name: "gone".into() })
        .await
        .unwrap();

    let mut req = new_todo("x", 1);
    req.tag_ids = Some(vec![tag.id]);
    let t = todo(&store, alice, req).await;

    tags::delete(&store, alice, tag.id).await.unwrap();

    let after = todos::get(&store, alice, t.id).await.unwrap();
    assert!(after.tags.is_empty());
}

// ── Teams ───────────────────────────────────────────────────────

#[tokio::test]
async fn team_creator_is_admin_and_can_add_members() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;
    let carol = user(&store, "carol").await;

    let team = teams::create(
        &store,
        alice,
        CreateTeamRequest {
            name: "core".into(),
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(team.role, "ADMIN");
    assert_eq!(team.creator_id, alice);

    let member = teams::add_member(
        &store,
        alice,
        team.id,
        AddMemberRequest {
            user_id: bob,
            role: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(member.role, "MEMBER");

    let err = teams::add_member(
        &store,
        bob,
        team.id,
        AddMemberRequest {
            user_id: carol,
            role: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));

    let err = teams::add_member(
        &store,
        alice,
        team.id,
        AddMemberRequest {
            user_id: 999,
            role: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let members = teams::members(&store, bob, team.id).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn team_todos_are_for_members_only() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let outsider = user(&store, "mallory").await;

    let team = teams::create(
        &store,
        alice,
        CreateTeamRequest {
            name: "core".into(),
            description: Some("the core team".into()),
        },
    )
    .await
    .unwrap();

    let mut req = new_todo("shared", 1);
    req.team_id = Some(team.id);
    let t = todo(&store, alice, req).await;
    assert_eq!(t.team_id, Some(team.id));

    let listed = teams::todos(&store, alice, team.id).await.unwrap();
    assert_eq!(ids(&listed), vec![t.id]);

    let err = teams::todos(&store, outsider, team.id).await.unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));

    let err = teams::todos(&store, alice, 4242).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let mut req = new_todo("sneaky", 1);
    req.team_id = Some(team.id);
    let err = todos::create(&store, outsider, req).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Team not found or not accessible"));
}

#[tokio::test]
async fn team_names_are_globally_unique() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;

    teams::create(
        &store,
        alice,
        CreateTeamRequest {
            name: "core".into(),
            description: None,
        },
    )
    .await
    .unwrap();

    let err = teams::create(
        &store,
        bob,
        CreateTeamRequest {
            name: "core".into(),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));

    assert!(teams::list_mine(&store, bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_returns_only_own_todos() {
    let store = MemoryStore::new();
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;

    let a = todo(&store, alice, new_todo("a", 1)).await;
    todo(&store, bob, new_todo("b", 2)).await;

    let mine = todos::list(&store, alice).await.unwrap();
    assert_eq!(ids(&mine), vec![a.id]);
}
