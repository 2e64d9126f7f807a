//! Unit tests for the membership crate
//!
//! Use-case tests run against an in-memory repository; router tests drive
//! the real router through `tower::ServiceExt::oneshot`.

mod support {
    use std::sync::{Arc, Mutex};

    use uuid::Uuid;

    use crate::domain::entity::{
        session::Session,
        user::{User, UserProjection},
    };
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::domain::value_object::{
        display_name::DisplayName,
        email::Email,
        public_id::PublicId,
        user_id::UserId,
        user_password::{PasswordHash, RawPassword},
        user_role::Role,
    };
    use crate::error::{MembershipError, MembershipResult};

    /// In-memory repository standing in for the PostgreSQL store.
    /// Enforces email uniqueness on insert, like the real unique index.
    #[derive(Clone, Default)]
    pub struct MemRepo {
        pub users: Arc<Mutex<Vec<User>>>,
        pub sessions: Arc<Mutex<Vec<Session>>>,
    }

    impl MemRepo {
        pub fn user_count(&self) -> usize {
            self.users.lock().unwrap().len()
        }

        pub fn role_of(&self, public_id: &PublicId) -> Option<Role> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.public_id == *public_id)
                .map(|u| u.role)
        }

        pub fn session_count(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }
    }

    impl UserRepository for MemRepo {
        async fn create(&self, user: &User) -> MembershipResult<()> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email.as_str() == user.email.as_str()) {
                return Err(MembershipError::DuplicateUser);
            }
            users.push(user.clone());
            Ok(())
        }

        async fn find_by_email(&self, email: &str) -> MembershipResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email.as_str() == email)
                .cloned())
        }

        async fn find_by_public_id(&self, public_id: &PublicId) -> MembershipResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.public_id == *public_id)
                .cloned())
        }

        async fn exists_by_email(&self, email: &str) -> MembershipResult<bool> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .any(|u| u.email.as_str() == email))
        }

        async fn update_role(&self, user_id: &UserId, role: Role) -> MembershipResult<()> {
            // Like an UPDATE, a missing row is not an error here
            if let Some(user) = self
                .users
                .lock()
                .unwrap()
                .iter_mut()
                .find(|u| u.user_id == *user_id)
            {
                user.set_role(role);
            }
            Ok(())
        }

        async fn list_projections(&self) -> MembershipResult<Vec<UserProjection>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .map(|u| u.projection())
                .collect())
        }
    }

    impl SessionRepository for MemRepo {
        async fn create(&self, session: &Session) -> MembershipResult<()> {
            self.sessions.lock().unwrap().push(session.clone());
            Ok(())
        }

        async fn find_by_id(&self, session_id: Uuid) -> MembershipResult<Option<Session>> {
            // No store-side TTL filter here; expiry is detected by the
            // check-session use case, which also removes the row
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.session_id == session_id)
                .cloned())
        }

        async fn delete(&self, session_id: Uuid) -> MembershipResult<()> {
            self.sessions
                .lock()
                .unwrap()
                .retain(|s| s.session_id != session_id);
            Ok(())
        }

        async fn cleanup_expired(&self) -> MembershipResult<u64> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|s| !s.is_expired());
            Ok((before - sessions.len()) as u64)
        }
    }

    /// Create a user directly in the store, bypassing signup
    pub fn seed_user(repo: &MemRepo, name: &str, email: &str, password: &str, role: Role) -> User {
        let raw = RawPassword::new(password.to_string()).unwrap();
        let hash = PasswordHash::from_raw(&raw, None).unwrap();
        let mut user = User::new(
            DisplayName::new(name).unwrap(),
            Email::new(email).unwrap(),
            hash,
        );
        user.set_role(role);
        repo.users.lock().unwrap().push(user.clone());
        user
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use super::support::{MemRepo, seed_user};
    use crate::application::{
        ChangeRoleInput, ChangeRoleUseCase, CheckSessionUseCase, MembershipConfig, SignInInput,
        SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
    };
    use crate::domain::entity::session::Session;
    use crate::domain::value_object::{public_id::PublicId, user_role::Role};
    use crate::error::MembershipError;

    fn setup() -> (MemRepo, Arc<MembershipConfig>) {
        (MemRepo::default(), Arc::new(MembershipConfig::development()))
    }

    fn sign_up_use_case(
        repo: &MemRepo,
        config: &Arc<MembershipConfig>,
    ) -> SignUpUseCase<MemRepo, MemRepo> {
        SignUpUseCase::new(Arc::new(repo.clone()), Arc::new(repo.clone()), config.clone())
    }

    fn sign_in_use_case(
        repo: &MemRepo,
        config: &Arc<MembershipConfig>,
    ) -> SignInUseCase<MemRepo, MemRepo> {
        SignInUseCase::new(Arc::new(repo.clone()), Arc::new(repo.clone()), config.clone())
    }

    fn sign_up_input(name: &str, email: &str, password: &str) -> SignUpInput {
        SignUpInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            requested_role: None,
        }
    }

    #[tokio::test]
    async fn test_signup_then_login_succeeds() {
        let (repo, config) = setup();

        sign_up_use_case(&repo, &config)
            .execute(sign_up_input("Alice", "alice@example.com", "secret123"))
            .await
            .unwrap();

        let output = sign_in_use_case(&repo, &config)
            .execute(SignInInput {
                email: "alice@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        // The login established a session for the same user
        let session = CheckSessionUseCase::new(Arc::new(repo.clone()), config.clone())
            .get_session(&output.session_token)
            .await
            .unwrap();
        assert_eq!(session.public_id.to_string(), output.public_id);
    }

    #[tokio::test]
    async fn test_session_payload_excludes_password_hash() {
        let (repo, config) = setup();

        let output = sign_up_use_case(&repo, &config)
            .execute(sign_up_input("Alice", "alice@example.com", "secret123"))
            .await
            .unwrap();

        let session = CheckSessionUseCase::new(Arc::new(repo.clone()), config.clone())
            .get_session(&output.session_token)
            .await
            .unwrap();

        // Serialize the projection; no Argon2 PHC material may appear
        let json = serde_json::to_string(&session.projection()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[tokio::test]
    async fn test_duplicate_signup_leaves_count_unchanged() {
        let (repo, config) = setup();
        let use_case = sign_up_use_case(&repo, &config);

        use_case
            .execute(sign_up_input("Alice", "alice@example.com", "secret123"))
            .await
            .unwrap();
        assert_eq!(repo.user_count(), 1);
        let sessions_before = repo.session_count();

        let err = use_case
            .execute(sign_up_input("Mallory", "alice@example.com", "other456"))
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::DuplicateUser));

        // No record created, no session created
        assert_eq!(repo.user_count(), 1);
        assert_eq!(repo.session_count(), sessions_before);
    }

    #[tokio::test]
    async fn test_login_errors_are_indistinguishable() {
        let (repo, config) = setup();

        sign_up_use_case(&repo, &config)
            .execute(sign_up_input("Alice", "alice@example.com", "secret123"))
            .await
            .unwrap();

        let use_case = sign_in_use_case(&repo, &config);

        let unknown_email = use_case
            .execute(SignInInput {
                email: "nobody@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();

        let wrong_password = use_case
            .execute(SignInInput {
                email: "alice@example.com".to_string(),
                password: "wrong-pass".to_string(),
            })
            .await
            .unwrap_err();

        // Identical wording for both failure causes
        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
        assert_eq!(unknown_email.to_string(), "Invalid email/password combination");
    }

    #[tokio::test]
    async fn test_login_shape_error_is_generic() {
        let (repo, config) = setup();

        let err = sign_in_use_case(&repo, &config)
            .execute(SignInInput {
                email: "not-an-email".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();

        // The format message never leaks which rule was violated
        assert!(matches!(err, MembershipError::CredentialFormat));
        assert!(!err.to_string().contains("@"));
    }

    #[tokio::test]
    async fn test_signup_validation_names_field() {
        let (repo, config) = setup();
        let use_case = sign_up_use_case(&repo, &config);

        let err = use_case
            .execute(sign_up_input("", "alice@example.com", "secret123"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("name"));

        let err = use_case
            .execute(sign_up_input("Alice", "not-an-email", "secret123"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("email"));

        let err = use_case
            .execute(sign_up_input("Alice", "alice@example.com", "short"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("password"));

        assert_eq!(repo.user_count(), 0);
    }

    #[tokio::test]
    async fn test_signup_password_length_boundary() {
        let (repo, config) = setup();
        let use_case = sign_up_use_case(&repo, &config);

        // Length 5 rejected
        let err = use_case
            .execute(sign_up_input("Alice", "five@example.com", "abcde"))
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::Validation { .. }));

        // Length 6 accepted (inclusive min bound)
        use_case
            .execute(sign_up_input("Alice", "six@example.com", "abcdef"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_signup_forces_role_to_user() {
        let (repo, config) = setup();

        let output = sign_up_use_case(&repo, &config)
            .execute(SignUpInput {
                name: "A".to_string(),
                email: "a@a.com".to_string(),
                password: "secret".to_string(),
                requested_role: Some("admin".to_string()),
            })
            .await
            .unwrap();

        let public_id = PublicId::parse_str(&output.public_id).unwrap();
        assert_eq!(repo.role_of(&public_id), Some(Role::User));
    }

    #[tokio::test]
    async fn test_promote_demote_roundtrip() {
        let (repo, _config) = setup();
        let admin = seed_user(&repo, "Root", "root@example.com", "rootpass", Role::Admin);
        let target = seed_user(&repo, "Bob", "bob@example.com", "bobpass1", Role::User);

        let use_case = ChangeRoleUseCase::new(Arc::new(repo.clone()));
        let acting = admin.projection();

        // promote then demote restores "user"
        use_case
            .execute(
                ChangeRoleInput {
                    user_id: target.public_id.to_string(),
                    action: "promote".to_string(),
                },
                &acting,
            )
            .await
            .unwrap();
        assert_eq!(repo.role_of(&target.public_id), Some(Role::Admin));

        use_case
            .execute(
                ChangeRoleInput {
                    user_id: target.public_id.to_string(),
                    action: "demote".to_string(),
                },
                &acting,
            )
            .await
            .unwrap();
        assert_eq!(repo.role_of(&target.public_id), Some(Role::User));

        // demote then promote restores "admin"
        let second = seed_user(&repo, "Carol", "carol@example.com", "carolpw1", Role::Admin);
        use_case
            .execute(
                ChangeRoleInput {
                    user_id: second.public_id.to_string(),
                    action: "demote".to_string(),
                },
                &acting,
            )
            .await
            .unwrap();
        use_case
            .execute(
                ChangeRoleInput {
                    user_id: second.public_id.to_string(),
                    action: "promote".to_string(),
                },
                &acting,
            )
            .await
            .unwrap();
        assert_eq!(repo.role_of(&second.public_id), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_self_demotion_always_fails() {
        let (repo, _config) = setup();
        let admin = seed_user(&repo, "Root", "root@example.com", "rootpass", Role::Admin);

        let use_case = ChangeRoleUseCase::new(Arc::new(repo.clone()));
        let acting = admin.projection();

        let err = use_case
            .execute(
                ChangeRoleInput {
                    user_id: admin.public_id.to_string(),
                    action: "demote".to_string(),
                },
                &acting,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::SelfDemotion));
        // Role unchanged
        assert_eq!(repo.role_of(&admin.public_id), Some(Role::Admin));

        // Self-promotion is a no-op role-wise but not an error
        use_case
            .execute(
                ChangeRoleInput {
                    user_id: admin.public_id.to_string(),
                    action: "promote".to_string(),
                },
                &acting,
            )
            .await
            .unwrap();
        assert_eq!(repo.role_of(&admin.public_id), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_change_role_rejects_malformed_input() {
        let (repo, _config) = setup();
        let admin = seed_user(&repo, "Root", "root@example.com", "rootpass", Role::Admin);
        let acting = admin.projection();

        let use_case = ChangeRoleUseCase::new(Arc::new(repo.clone()));

        let err = use_case
            .execute(
                ChangeRoleInput {
                    user_id: "***not-a-nanoid***".to_string(),
                    action: "promote".to_string(),
                },
                &acting,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("userId"));

        let err = use_case
            .execute(
                ChangeRoleInput {
                    user_id: admin.public_id.to_string(),
                    action: "destroy".to_string(),
                },
                &acting,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("action"));
    }

    #[tokio::test]
    async fn test_change_role_unknown_target() {
        let (repo, _config) = setup();
        let admin = seed_user(&repo, "Root", "root@example.com", "rootpass", Role::Admin);
        let acting = admin.projection();

        let err = ChangeRoleUseCase::new(Arc::new(repo.clone()))
            .execute(
                ChangeRoleInput {
                    user_id: PublicId::new().to_string(),
                    action: "promote".to_string(),
                },
                &acting,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::UserNotFound));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_removed() {
        let (repo, config) = setup();
        let user = seed_user(&repo, "Alice", "alice@example.com", "secret123", Role::User);

        // Already expired at creation
        let session = Session::new(&user, chrono::Duration::seconds(-1));
        repo.sessions.lock().unwrap().push(session.clone());

        let token =
            crate::application::token::generate_session_token(session.session_id, &config.session_secret);

        let err = CheckSessionUseCase::new(Arc::new(repo.clone()), config.clone())
            .get_session(&token)
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::SessionInvalid));
        assert_eq!(repo.session_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (repo, config) = setup();

        let output = sign_up_use_case(&repo, &config)
            .execute(sign_up_input("Alice", "alice@example.com", "secret123"))
            .await
            .unwrap();

        let use_case = SignOutUseCase::new(Arc::new(repo.clone()), config.clone());

        use_case.execute(&output.session_token).await.unwrap();
        assert_eq!(repo.session_count(), 0);

        // Logging out again, or with garbage, is still fine
        use_case.execute(&output.session_token).await.unwrap();
        use_case.execute("not-a-token").await.unwrap();
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::support::{MemRepo, seed_user};
    use crate::application::MembershipConfig;
    use crate::domain::value_object::user_role::Role;
    use crate::presentation::router::membership_router_generic;

    fn app(repo: &MemRepo, config: &MembershipConfig) -> Router {
        membership_router_generic(repo.clone(), config.clone())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Extract the `name=value` pair from a Set-Cookie header
    fn session_cookie(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Set-Cookie header")
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_home_renders_anonymous() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();

        let response = app(&repo, &config).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_anonymous_members_redirects_to_login() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();

        let response = app(&repo, &config).oneshot(get("/members")).await.unwrap();

        // Soft fail: redirect, no content rendered
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_anonymous_admin_redirects_to_login() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();

        let response = app(&repo, &config).oneshot(get("/admin")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_signup_sets_cookie_and_gates_open() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();
        let router = app(&repo, &config);

        let response = router
            .clone()
            .oneshot(post_form(
                "/signup",
                "name=Alice&email=alice%40example.com&password=secret123",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookie = session_cookie(&response);

        // The session cookie opens the members gate
        let response = router
            .oneshot(get_with_cookie("/members", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_admin_gets_forbidden_on_admin() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();
        let router = app(&repo, &config);

        let response = router
            .clone()
            .oneshot(post_form(
                "/signup",
                "name=Bob&email=bob%40example.com&password=secret123",
            ))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        // Hard fail: authenticated but wrong role
        let response = router
            .oneshot(get_with_cookie("/admin", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_can_reach_admin_view() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();
        seed_user(&repo, "Root", "root@example.com", "rootpass", Role::Admin);
        let router = app(&repo, &config);

        let response = router
            .clone()
            .oneshot(post_form(
                "/login",
                "email=root%40example.com&password=rootpass",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&response);

        let response = router
            .oneshot(get_with_cookie("/admin", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_duplicate_signup_rerenders_with_conflict() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();
        let router = app(&repo, &config);

        router
            .clone()
            .oneshot(post_form(
                "/signup",
                "name=Alice&email=alice%40example.com&password=secret123",
            ))
            .await
            .unwrap();

        let response = router
            .oneshot(post_form(
                "/signup",
                "name=Eve&email=alice%40example.com&password=secret123",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_bad_login_rerenders_login_view() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();

        let response = app(&repo, &config)
            .oneshot(post_form(
                "/login",
                "email=ghost%40example.com&password=whatever1",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // Re-render, not a redirect
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_and_redirects_home() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();
        let router = app(&repo, &config);

        let response = router
            .clone()
            .oneshot(post_form(
                "/signup",
                "name=Alice&email=alice%40example.com&password=secret123",
            ))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let response = router
            .clone()
            .oneshot(get_with_cookie("/logout", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));
        assert_eq!(repo.session_count(), 0);

        // Logging out again without a session is not an error
        let response = router.oneshot(get("/logout")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_unmatched_route_is_not_found() {
        let repo = MemRepo::default();
        let config = MembershipConfig::development();

        let response = app(&repo, &config)
            .oneshot(get("/no-such-page"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
