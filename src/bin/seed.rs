use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_cakeshop_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_admin(&pool, "admin@cakeshop.example", "admin123").await?;
    let customer_id = ensure_customer(&pool, "customer@cakeshop.example", "customer123").await?;
    seed_cakes(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Customer ID: {customer_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    ensure_customer_with_role(pool, email, password, "admin").await
}

async fn ensure_customer(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    ensure_customer_with_role(pool, email, password, "customer").await
}

async fn ensure_customer_with_role(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO customers (id, email, password_hash, address, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind("1 Bakery Lane")
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If the customer already exists, fetch the id
    let customer_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM customers WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured customer {email} (role={role})");
    Ok(customer_id)
}

async fn seed_cakes(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let cakes = vec![
        ("Black Forest", "Cherries, cream, dark chocolate", 45000, true),
        ("Red Velvet", "Cream cheese frosting", 52000, true),
        ("Classic Vanilla", "Plain sponge with buttercream", 30000, true),
        ("Seasonal Mango", "Only while mangoes last", 60000, false),
    ];

    for (name, desc, price, available) in cakes {
        sqlx::query(
            r#"
            INSERT INTO cakes (id, name, description, price, available)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(available)
        .execute(pool)
        .await?;
    }

    println!("Seeded cakes");
    Ok(())
}
