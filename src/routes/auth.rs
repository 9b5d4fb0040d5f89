use crate::{
    auth::{
        password::{hash_password_blocking, verify_password_blocking},
        AuthResponse, JwtKeys, LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::{normalize_email, User, UserCredentials},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new account and returns a token, so the caller is logged in immediately.
///
/// ## Responses:
/// - `201 Created`: `AuthResponse` with the token and the new user.
/// - `400 Bad Request`: Missing fields, invalid email, bad password length, or email already registered.
/// - `500 Internal Server Error`: For database or hashing failures.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest { email, password } = register_data.into_inner();
    let email = normalize_email(&email);

    let existing_user = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let password_hash = hash_password_blocking(password).await?;

    // A concurrent registration can still win between the check and the insert.
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id, email, created_at",
    )
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await
    .map_err(|error| match error {
        sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
            AppError::BadRequest("User already exists".into())
        }
        other => AppError::from(other),
    })?;

    let token = keys.issue(user.id)?;
    log::info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(AuthResponse { token, user }))
}

/// Login user
///
/// Checks the password against the stored hash and returns a fresh token.
///
/// ## Responses:
/// - `200 OK`: `AuthResponse` with the token and the user.
/// - `400 Bad Request`: Missing fields or invalid email format.
/// - `401 Unauthorized`: Unknown email or wrong password. Both give the same message.
/// - `500 Internal Server Error`: For database or hashing failures.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let LoginRequest { email, password } = login_data.into_inner();

    let credentials = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(normalize_email(&email))
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(invalid_credentials)?;

    if !verify_password_blocking(password, credentials.password_hash.clone()).await? {
        log::debug!("Failed login for user {}", credentials.id);
        return Err(invalid_credentials());
    }

    let user = User::from(credentials);
    let token = keys.issue(user.id)?;
    log::info!("User {} logged in", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}
