use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sqlx::FromRow;
use uuid::Uuid;

use crate::dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest};
use crate::{
    audit::log_audit,
    db::DbPool,
    error::{AppError, AppResult},
    models::Customer,
    response::{ApiResponse, Meta},
};

#[derive(FromRow)]
struct CustomerRow {
    id: Uuid,
    password_hash: String,
    role: String,
}

pub async fn register_customer(
    pool: &DbPool,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<Customer>> {
    let RegisterRequest {
        email,
        password,
        address,
    } = payload;
    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM customers WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let customer: Customer = sqlx::query_as(
        r#"
        INSERT INTO customers (id, email, password_hash, address)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, address, role, created_at
        "#,
    )
    .bind(id)
    .bind(email.as_str())
    .bind(password_hash)
    .bind(address)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(customer.id),
        "customer_register",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": customer.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
    Ok(ApiResponse::success("Customer created", customer, None))
}

pub async fn login_customer(
    pool: &DbPool,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let customer: Option<CustomerRow> = sqlx::query_as::<_, CustomerRow>(
        "SELECT id, password_hash, role FROM customers WHERE email = $1",
    )
    .bind(email.as_str())
    .fetch_optional(pool)
    .await?;

    // An unknown email is a lookup miss, a bad password is a validation
    // failure; the two surface differently.
    let customer = match customer {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let parsed_hash = PasswordHash::new(&customer.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid password".into()));
    }

    let token = issue_token(customer.id, &customer.role, Utc::now())?;
    let resp = LoginResponse { token };

    if let Err(err) = log_audit(
        pool,
        Some(customer.id),
        "customer_login",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": customer.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Login Successful",
        resp,
        Some(Meta::empty()),
    ))
}

fn issue_token(customer_id: Uuid, role: &str, now: DateTime<Utc>) -> AppResult<String> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: customer_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok(format!("Bearer {}", token))
}
