//! Mint an access token for local development against the dashboard.
//!
//! Usage: `cargo run --bin dev_token -- [username] [role]`
//!
//! Requires `JWT_SECRET` (reads .env). Role defaults to `admin`.

use library_dashboard::models::user::UserRole;
use library_dashboard::services::auth::generate_access_token;

/// Token lifetime: one working day.
const EXPIRY_SECS: i64 = 8 * 60 * 60;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let mut args = std::env::args().skip(1);
    let username = args.next().unwrap_or_else(|| "admin".to_string());
    let role = UserRole::from(args.next().unwrap_or_else(|| "admin".to_string()));

    let token = generate_access_token(&username, "0", &role, &secret, EXPIRY_SECS)?;

    println!("=== Library Dashboard dev token ===");
    println!("user: {username} ({role}), expires in {}h", EXPIRY_SECS / 3600);
    println!("Authorization: Bearer {token}");

    Ok(())
}
