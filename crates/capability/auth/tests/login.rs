use domain::Role;
use rental_auth::{AuthError, AuthService, JwtManager};
use rental_storage::{ActorRecord, ActorStore, InMemoryBackend};

async fn service_with_legacy_actor() -> (InMemoryBackend, AuthService) {
    let backend = InMemoryBackend::new();
    backend
        .actors
        .create_actor(ActorRecord {
            actor_id: "actor-1".to_string(),
            username: "admin".to_string(),
            password_hash: "admin123".to_string(),
            role: Role::Manager,
            created_at_ms: 0,
        })
        .await
        .expect("create")
        .expect("created");
    let jwt = JwtManager::new("secret".to_string(), 3600);
    let service = AuthService::new(backend.actors.clone(), jwt);
    (backend, service)
}

#[tokio::test]
async fn login_upgrades_legacy_password() {
    let (backend, auth) = service_with_legacy_actor().await;

    let (profile, tokens) = auth.login("admin", "admin123").await.expect("login");
    assert_eq!(profile.role, Role::Manager);

    let stored = backend
        .actors
        .find_by_username("admin")
        .await
        .expect("find")
        .expect("actor");
    assert!(stored.password_hash.starts_with("$argon2"));

    let ctx = auth.verify_access_token(&tokens.access_token).expect("verify");
    assert_eq!(ctx.actor_id, "actor-1");

    // 升级后仍可用原口令登录
    auth.login("admin", "admin123").await.expect("login again");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (_backend, auth) = service_with_legacy_actor().await;
    let wrong = auth.login("admin", "nope").await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    let unknown = auth.login("ghost", "admin123").await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
}
