use domain::{ActorContext, Role};
use rental_auth::{AuthError, JwtManager};
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn token_round_trips_actor_context() {
    let jwt = JwtManager::new("secret".to_string(), 3600);
    let ctx = ActorContext::worker("actor-1", "bob");

    let tokens = jwt.issue_access(&ctx).expect("tokens");
    let decoded = jwt.verify_access(&tokens.access_token).expect("access");

    assert_eq!(decoded, ctx);
    assert_eq!(decoded.role, Role::Worker);
}

#[test]
fn expiry_follows_ttl() {
    let jwt = JwtManager::new("secret".to_string(), 900);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let tokens = jwt
        .issue_access(&ActorContext::manager("actor-1", "alice"))
        .expect("tokens");
    assert!(tokens.expires_at >= now + 900);
    assert!(tokens.expires_at <= now + 901);
}

#[test]
fn foreign_secret_is_rejected() {
    let issuer = JwtManager::new("secret".to_string(), 3600);
    let verifier = JwtManager::new("other".to_string(), 3600);
    let tokens = issuer
        .issue_access(&ActorContext::manager("actor-1", "alice"))
        .expect("tokens");
    let result = verifier.verify_access(&tokens.access_token);
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[test]
fn garbage_is_rejected() {
    let jwt = JwtManager::new("secret".to_string(), 3600);
    assert!(matches!(
        jwt.verify_access("not-a-token"),
        Err(AuthError::TokenInvalid)
    ));
}
