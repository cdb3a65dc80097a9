// =====================================================
// 인증 흐름 통합 테스트
// =====================================================
// 가입 -> 이메일 인증 -> 로그인 -> 토큰 갱신 -> 비밀번호 재설정
// =====================================================

mod common;

use chrono::{Duration, Utc};
use common::*;
use recipe_server::domains::auth::models::{
    ResetPasswordRequest, SigninRequest, TokenKind, UserPayload,
};
use recipe_server::domains::auth::services::RefreshOutcome;
use recipe_server::shared::clients::MailKind;
use recipe_server::shared::errors::AppError;
use recipe_server::shared::utils::hash_token;

#[tokio::test]
async fn test_signup_stores_only_the_token_hash() {
    let app = TestApp::new();

    let user = app.register("Jane@Example.com", "password123").await;

    assert_eq!(user.email, "jane@example.com");
    assert!(!user.verified);

    let token = app
        .mailer
        .last_verification_token("jane@example.com")
        .expect("verification mail");
    let stored = app.users.get("jane@example.com").expect("user row");

    assert_ne!(stored.verification_token.as_deref(), Some(token.as_str()));
    assert_eq!(stored.verification_token, Some(hash_token(&token)));
    assert_ne!(stored.password_hash, "password123");
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected_case_insensitively() {
    let app = TestApp::new();
    app.register("jane@example.com", "password123").await;

    let result = app
        .state
        .auth_state
        .auth_service
        .signup(signup_request("Other", "JANE@example.COM", "password456"))
        .await;

    assert!(matches!(result, Err(AppError::UserExists)));
    assert_eq!(app.users.len(), 1);
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_signup_is_rolled_back_when_mail_fails() {
    let app = TestApp::new();
    app.mailer.set_failing(true);

    let result = app
        .state
        .auth_state
        .auth_service
        .signup(signup_request("Jane", "jane@example.com", "password123"))
        .await;

    assert!(matches!(result, Err(AppError::Unexpected(_))));
    assert!(app.users.is_empty());

    // 메일이 복구되면 같은 이메일로 다시 가입 가능
    app.mailer.set_failing(false);
    app.register("jane@example.com", "password123").await;
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let app = TestApp::new();
    let mut request = signup_request("Jane", "jane@example.com", "password123");
    request.confirm_password = "password124".to_string();

    let err = app
        .state
        .auth_state
        .auth_service
        .signup(request)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), 997);
    assert!(err.to_string().contains("Passwords don't match"));
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn test_verification_token_is_single_use() {
    let app = TestApp::new();
    app.register("jane@example.com", "password123").await;
    let token = app.mailer.last_verification_token("jane@example.com").unwrap();
    let auth = &app.state.auth_state.auth_service;

    let user = auth.verify_email(Some(&token)).await.unwrap();
    assert!(user.verified);

    let stored = app.users.get("jane@example.com").unwrap();
    assert!(stored.verification_token.is_none());
    assert!(stored.verification_token_expires_at.is_none());

    let second = auth.verify_email(Some(&token)).await;
    assert!(matches!(second, Err(AppError::InvalidToken)));
}

#[tokio::test]
async fn test_verify_email_requires_token_and_expiry() {
    let app = TestApp::new();
    let auth = &app.state.auth_state.auth_service;

    let missing = auth.verify_email(None).await.unwrap_err();
    assert!(matches!(missing, AppError::NotProvided(_)));
    assert_eq!(missing.to_string(), "Token not provided");

    app.register("jane@example.com", "password123").await;
    let token = app.mailer.last_verification_token("jane@example.com").unwrap();
    app.users.update("jane@example.com", |u| {
        u.verification_token_expires_at = Some(Utc::now() - Duration::seconds(1));
    });

    let expired = auth.verify_email(Some(&token)).await;
    assert!(matches!(expired, Err(AppError::InvalidToken)));
    assert!(!app.users.get("jane@example.com").unwrap().verified);
}

#[tokio::test]
async fn test_regenerate_verification_token() {
    let app = TestApp::new();
    let auth = &app.state.auth_state.auth_service;

    let missing = auth.regenerate_verification_token("nobody@example.com").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    app.register("jane@example.com", "password123").await;
    let first = app.mailer.last_verification_token("jane@example.com").unwrap();

    auth.regenerate_verification_token("jane@example.com").await.unwrap();
    let second = app.mailer.last_verification_token("jane@example.com").unwrap();
    assert_ne!(first, second);

    // 이전 토큰은 덮어써져서 더 이상 사용 불가
    assert!(matches!(
        auth.verify_email(Some(&first)).await,
        Err(AppError::InvalidToken)
    ));
    auth.verify_email(Some(&second)).await.unwrap();

    let verified = auth.regenerate_verification_token("jane@example.com").await;
    assert!(matches!(verified, Err(AppError::AlreadyVerified)));
}

#[tokio::test]
async fn test_login_errors_do_not_reveal_which_part_was_wrong() {
    let app = TestApp::new();
    app.register_verified("jane@example.com", "password123").await;
    let auth = &app.state.auth_state.auth_service;

    let wrong_password = auth
        .login(SigninRequest {
            email: "jane@example.com".to_string(),
            password: "password999".to_string(),
        })
        .await
        .unwrap_err();
    let unknown_user = auth
        .login(SigninRequest {
            email: "nobody@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert_eq!(wrong_password.error_code(), 1000);
    assert_eq!(unknown_user.error_code(), 1000);
    assert_eq!(wrong_password.status_code(), unknown_user.status_code());
}

#[tokio::test]
async fn test_login_issues_tokens_of_each_kind() {
    let app = TestApp::new();
    let user = app.register_verified("jane@example.com", "password123").await;

    let tokens = app.login("JANE@example.com", "password123").await;

    let access = app
        .jwt_service
        .verify(&tokens.access_token, TokenKind::Access)
        .claims()
        .expect("access token verifies");
    assert_eq!(access.user.user_id, user.id);
    assert_eq!(access.user.role, "USER");

    assert!(app
        .jwt_service
        .verify(&tokens.refresh_token, TokenKind::Refresh)
        .is_verified());
    assert!(!app
        .jwt_service
        .verify(&tokens.refresh_token, TokenKind::Access)
        .is_verified());
}

#[tokio::test]
async fn test_refresh_access_token_outcomes() {
    let app = TestApp::new();
    let user = app.register_verified("jane@example.com", "password123").await;
    let tokens = app.login("jane@example.com", "password123").await;
    let auth = &app.state.auth_state.auth_service;

    // 누락
    assert!(matches!(
        auth.refresh_access_token(None, Some(&tokens.refresh_token)),
        Err(AppError::NotProvided(_))
    ));
    assert!(matches!(
        auth.refresh_access_token(Some(&tokens.access_token), None),
        Err(AppError::NotProvided(_))
    ));

    // 아직 유효
    assert_eq!(
        auth.refresh_access_token(Some(&tokens.access_token), Some(&tokens.refresh_token))
            .unwrap(),
        RefreshOutcome::StillValid
    );

    // 만료된 Access Token + 유효한 Refresh Token -> 재발급
    let payload = UserPayload {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role.clone(),
    };
    let expired = app
        .jwt_service
        .issue(&payload, TokenKind::Access, Some(Duration::seconds(-60)))
        .unwrap();

    match auth
        .refresh_access_token(Some(&expired), Some(&tokens.refresh_token))
        .unwrap()
    {
        RefreshOutcome::Renewed(access_token) => {
            let claims = app
                .jwt_service
                .verify(&access_token, TokenKind::Access)
                .claims()
                .expect("renewed token verifies");
            assert_eq!(claims.user, payload);
        }
        other => panic!("expected a renewed token, got {:?}", other),
    }

    // 잘못된 Refresh Token -> invalid session
    let err = auth
        .refresh_access_token(Some(&expired), Some(&tokens.access_token))
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidSession));
    assert_eq!(err.status_code().as_u16(), 403);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = TestApp::new();
    app.register_verified("jane@example.com", "password123").await;
    let auth = &app.state.auth_state.auth_service;

    let missing = auth.forget_password("nobody@example.com").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    auth.forget_password("jane@example.com").await.unwrap();
    let reset_url = app.mailer.last_reset_url("jane@example.com").unwrap();
    assert!(reset_url.starts_with("http://localhost:5173/reset-password?token="));
    assert!(reset_url.ends_with("&email=jane%40example.com"));

    let token = reset_url
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .unwrap()
        .to_string();
    let stored = app.users.get("jane@example.com").unwrap();
    assert_eq!(stored.reset_token, Some(hash_token(&token)));

    auth.reset_password(ResetPasswordRequest {
        email: "jane@example.com".to_string(),
        password_token: token.clone(),
        new_password: "new-password".to_string(),
    })
    .await
    .unwrap();

    let stored = app.users.get("jane@example.com").unwrap();
    assert!(stored.reset_token.is_none());
    assert!(stored.reset_token_expires_at.is_none());

    app.login("jane@example.com", "new-password").await;

    // 토큰은 한 번만 사용 가능
    let reused = auth
        .reset_password(ResetPasswordRequest {
            email: "jane@example.com".to_string(),
            password_token: token,
            new_password: "another-password".to_string(),
        })
        .await;
    assert!(matches!(reused, Err(AppError::InvalidToken)));
}

#[tokio::test]
async fn test_reset_password_rejects_wrong_or_expired_token() {
    let app = TestApp::new();
    app.register_verified("jane@example.com", "password123").await;
    let auth = &app.state.auth_state.auth_service;
    auth.forget_password("jane@example.com").await.unwrap();

    let before = app.users.get("jane@example.com").unwrap().password_hash;

    let wrong = auth
        .reset_password(ResetPasswordRequest {
            email: "jane@example.com".to_string(),
            password_token: "not-the-token".to_string(),
            new_password: "new-password".to_string(),
        })
        .await;
    assert!(matches!(wrong, Err(AppError::InvalidToken)));

    let reset_url = app.mailer.last_reset_url("jane@example.com").unwrap();
    let token = reset_url
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .unwrap()
        .to_string();
    app.users.update("jane@example.com", |u| {
        u.reset_token_expires_at = Some(Utc::now() - Duration::seconds(1));
    });

    let expired = auth
        .reset_password(ResetPasswordRequest {
            email: "jane@example.com".to_string(),
            password_token: token,
            new_password: "new-password".to_string(),
        })
        .await;
    assert!(matches!(expired, Err(AppError::InvalidToken)));

    assert_eq!(app.users.get("jane@example.com").unwrap().password_hash, before);
}

#[tokio::test]
async fn test_mailed_links_carry_encoded_query() {
    let app = TestApp::new();
    app.register_verified("jane+chef@example.com", "password123")
        .await;

    let token = app
        .mailer
        .last_verification_token("jane+chef@example.com")
        .unwrap();
    let link = app
        .mailer
        .sent()
        .into_iter()
        .find_map(|mail| match mail.kind {
            MailKind::EmailVerification { link, .. } => Some(link),
            _ => None,
        })
        .unwrap();
    assert_eq!(link, format!("{}/verify-email?token={}", CLIENT_URL, token));

    app.state
        .auth_state
        .auth_service
        .forget_password("jane+chef@example.com")
        .await
        .unwrap();
    let reset_url = app.mailer.last_reset_url("jane+chef@example.com").unwrap();
    assert!(reset_url.ends_with("&email=jane%2Bchef%40example.com"));
}
