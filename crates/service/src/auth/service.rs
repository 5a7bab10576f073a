use std::sync::Arc;

use models::user;
use tracing::{debug, info, instrument, warn};

use super::domain::{AccessToken, Claims, LoginInput, RegisterInput, TokenPurpose, Verification};
use super::errors::AuthError;
use super::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use super::repository::UserRepository;
use super::token::TokenIssuer;
use crate::mail::{verification_email, verification_link, Mailer};

/// Auth business service independent of web framework
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
    mailer: Arc<dyn Mailer>,
    base_url: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenIssuer, mailer: Arc<dyn Mailer>, base_url: impl Into<String>) -> Self {
        Self { users, tokens, mailer, base_url: base_url.into() }
    }

    pub fn tokens(&self) -> &TokenIssuer { &self.tokens }

    /// Register a new user (and their business) and mail a verification link.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, domain::RegisterInput, token::TokenIssuer};
    /// use service::mock::{MockStore, RecordingMailer};
    /// let store = Arc::new(MockStore::default());
    /// let tokens = TokenIssuer::new("secret", chrono::Duration::hours(12), chrono::Duration::hours(24));
    /// let svc = AuthService::new(store.clone(), tokens, Arc::new(RecordingMailer::default()), "http://localhost:8000");
    /// let input = RegisterInput { username: "bee".into(), email: "bee@example.com".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.username, "bee");
    /// assert!(!user.is_verified);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<user::Model, AuthError> {
        user::validate_username(&input.username)?;
        user::validate_email(&input.email)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        if let Some(existing) = self.users.find_user_by_username(&input.username).await? {
            debug!("username taken: {}", existing.username);
            return Err(AuthError::Conflict("Username already exists".into()));
        }
        if self.users.find_user_by_email(&input.email).await?.is_some() {
            return Err(AuthError::Conflict("Email already exists".into()));
        }

        let hash = hash_password(&input.password)?;
        let user = self.users.create_user(&input.username, &input.email, &hash).await?;
        info!(user_id = user.id, username = %user.username, "user_registered");

        self.send_verification(&user)?;
        Ok(user)
    }

    /// Queue the verification mail on a detached task; delivery failures are only logged.
    pub fn send_verification(&self, user: &user::Model) -> Result<(), AuthError> {
        let token = self.tokens.issue_verification(user)?;
        let mail = verification_email(&user.email, &verification_link(&self.base_url, &token));
        let mailer = Arc::clone(&self.mailer);
        let user_id = user.id;
        tokio::spawn(async move {
            match mailer.send(mail).await {
                Ok(()) => debug!(user_id, "verification_mail_dispatched"),
                Err(e) => warn!(user_id, error = %e, "verification_mail_failed"),
            }
        });
        Ok(())
    }

    /// Check a username/password pair and issue an access token.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AccessToken, AuthError> {
        let user = self.users
            .find_user_by_username(&input.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = user.id, "user_logged_in");
        Ok(AccessToken::bearer(token))
    }

    /// Resolve a bearer token to the user it was issued for.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<user::Model, AuthError> {
        let claims = self.tokens.decode_for(token, TokenPurpose::Access)?;
        self.user_for(&claims).await
    }

    async fn user_for(&self, claims: &Claims) -> Result<user::Model, AuthError> {
        self.users
            .find_user_by_id(claims.id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    #[instrument(skip_all)]
    pub async fn verify_email(&self, token: &str) -> Result<Verification, AuthError> {
        let claims = self.tokens.decode_for(token, TokenPurpose::Verification)?;
        let user = self.user_for(&claims).await?;
        if user.is_verified {
            return Ok(Verification::AlreadyVerified(user));
        }
        let verified = self.users.mark_verified(user.id).await?;
        info!(user_id = verified.id, "email_verified");
        Ok(Verification::Verified(verified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockStore, RecordingMailer};
    use crate::business::repository::BusinessRepository;
    use chrono::Duration;

    struct Fixture {
        svc: AuthService,
        store: Arc<MockStore>,
        mailer: Arc<RecordingMailer>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MockStore::default());
        let mailer = Arc::new(RecordingMailer::default());
        let tokens = TokenIssuer::new("test-secret", Duration::hours(12), Duration::hours(24));
        let svc = AuthService::new(store.clone(), tokens, mailer.clone(), "http://bee.test");
        Fixture { svc, store, mailer }
    }

    fn input(username: &str, email: &str) -> RegisterInput {
        RegisterInput { username: username.into(), email: email.into(), password: "Passw0rd!".into() }
    }

    #[tokio::test]
    async fn register_creates_user_business_and_mail() {
        let f = fixture();
        let user = f.svc.register(input("alice", "alice@example.com")).await.unwrap();
        assert_ne!(user.password, "Passw0rd!");

        let biz = f.store.find_business_by_owner(user.id).await.unwrap().unwrap();
        assert_eq!(biz.name, "Business by alice");

        let sent = f.mailer.wait_for(1).await;
        assert_eq!(sent[0].to, "alice@example.com");
        assert!(sent[0].html.contains("http://bee.test/verification?token="));
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_bad_input() {
        let f = fixture();
        f.svc.register(input("alice", "alice@example.com")).await.unwrap();

        let dup_name = f.svc.register(input("alice", "other@example.com")).await.unwrap_err();
        assert!(matches!(dup_name, AuthError::Conflict(_)));
        let dup_mail = f.svc.register(input("bob", "alice@example.com")).await.unwrap_err();
        assert!(matches!(dup_mail, AuthError::Conflict(_)));

        let mut short = input("carol", "carol@example.com");
        short.password = "short".into();
        assert!(matches!(f.svc.register(short).await, Err(AuthError::Validation(_))));
        assert!(matches!(f.svc.register(input("dave", "dave.example.com")).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn login_then_authenticate() {
        let f = fixture();
        let user = f.svc.register(input("alice", "alice@example.com")).await.unwrap();

        let token = f.svc
            .login(LoginInput { username: "alice".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();
        assert_eq!(token.token_type, "bearer");

        let me = f.svc.authenticate(&token.access_token).await.unwrap();
        assert_eq!(me.id, user.id);
    }

    #[tokio::test]
    async fn login_failures_look_identical() {
        let f = fixture();
        f.svc.register(input("alice", "alice@example.com")).await.unwrap();

        let wrong = f.svc.login(LoginInput { username: "alice".into(), password: "nope-nope".into() }).await.unwrap_err();
        let unknown = f.svc.login(LoginInput { username: "mallory".into(), password: "Passw0rd!".into() }).await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn token_for_missing_user_is_rejected() {
        let f = fixture();
        let ghost = user::Model {
            id: 999,
            username: "ghost".into(),
            email: "ghost@example.com".into(),
            password: String::new(),
            is_verified: false,
            join_date: chrono::Utc::now().into(),
        };
        let token = f.svc.tokens().issue(&ghost).unwrap();
        assert!(matches!(f.svc.authenticate(&token).await, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn verification_flips_flag_once() {
        let f = fixture();
        let user = f.svc.register(input("alice", "alice@example.com")).await.unwrap();
        let token = f.svc.tokens().issue_verification(&user).unwrap();

        match f.svc.verify_email(&token).await.unwrap() {
            Verification::Verified(u) => assert!(u.is_verified),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(f.svc.verify_email(&token).await.unwrap(), Verification::AlreadyVerified(_)));
        assert!(matches!(f.svc.verify_email("garbage").await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn verification_link_is_not_a_bearer_token() {
        let f = fixture();
        let user = f.svc.register(input("alice", "alice@example.com")).await.unwrap();
        let link = f.svc.tokens().issue_verification(&user).unwrap();
        assert!(matches!(f.svc.authenticate(&link).await, Err(AuthError::InvalidToken)));

        let access = f.svc.tokens().issue(&user).unwrap();
        assert!(matches!(f.svc.verify_email(&access).await, Err(AuthError::InvalidToken)));
        assert!(!f.svc.authenticate(&access).await.unwrap().is_verified);
    }
}
