//! Seed binary: loads the demo catalog and ensures an admin account exists.
//!
//! Idempotent - sweets are matched by name and only inserted when missing,
//! and the admin account is created (or re-elevated) rather than duplicated.
//!
//! ```text
//! DATABASE_PATH=sweetshop.db ADMIN_EMAIL=admin@sweetshop.com \
//!     ADMIN_PASSWORD=... cargo run --bin seed
//! ```

use std::collections::HashSet;
use std::env;

use tracing::info;

use sweet_api::auth::hash_password;
use sweet_core::{NewSweet, Role};
use sweet_db::{Database, DbConfig};

fn catalog() -> Vec<NewSweet> {
    let entry = |name: &str, category: &str, price: f64, quantity: i64, image: &str, description: &str| NewSweet {
        name: name.to_string(),
        category: category.to_string(),
        price,
        quantity,
        image: Some(image.to_string()),
        description: Some(description.to_string()),
    };

    vec![
        entry(
            "Dairy Milk",
            "Chocolate",
            45.0,
            100,
            "https://images.unsplash.com/photo-1623660053975-cf75a8be0908?w=400",
            "Classic creamy milk chocolate bar",
        ),
        entry(
            "5 Star",
            "Chocolate",
            20.0,
            150,
            "https://images.unsplash.com/photo-1606312619070-d48b4c652a52?w=400",
            "Caramel and nougat covered in chocolate",
        ),
        entry(
            "Munch",
            "Wafer",
            10.0,
            200,
            "https://images.unsplash.com/photo-1548907040-4baa42d10919?w=400",
            "Crunchy wafer layered with chocolate",
        ),
        entry(
            "KitKat",
            "Wafer",
            25.0,
            120,
            "https://images.unsplash.com/photo-1582058091505-f87a2e55a40f?w=400",
            "Crisp wafer fingers in milk chocolate",
        ),
        entry(
            "Gems",
            "Candy",
            5.0,
            300,
            "https://images.unsplash.com/photo-1581798459219-318e68f60ae5?w=400",
            "Colorful chocolate buttons",
        ),
        entry(
            "Amul Dark",
            "Chocolate",
            150.0,
            50,
            "https://images.unsplash.com/photo-1511381939415-e44015466834?w=400",
            "Rich 55% cocoa dark chocolate",
        ),
        entry(
            "Ferrero Rocher",
            "Premium",
            149.0,
            40,
            "https://images.unsplash.com/photo-1590080875515-8a3a8dc5735e?w=400",
            "Hazelnut chocolate wrapped in gold",
        ),
        entry(
            "Parle Melody",
            "Toffee",
            2.0,
            500,
            "https://images.unsplash.com/photo-1575377427642-087cf684f29d?w=400",
            "Chocolate-filled caramel toffee",
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "sweetshop.db".to_string());
    let admin_email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@sweetshop.com".to_string());
    let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let db = Database::new(DbConfig::new(&database_path)).await?;

    // Catalog: insert-if-missing, keyed by name.
    let existing: HashSet<String> = db
        .sweets()
        .list()
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect();

    let mut inserted = 0;
    for sweet in catalog() {
        if existing.contains(&sweet.name) {
            info!(name = %sweet.name, "Sweet already present, skipping");
            continue;
        }
        let created = db.sweets().insert(&sweet).await?;
        info!(name = %created.name, price = created.price, quantity = created.quantity, "Seeded sweet");
        inserted += 1;
    }

    // Admin account: create if missing, re-elevate if present.
    let admin = match db.users().find_by_email(&admin_email).await? {
        Some(user) => user,
        None => {
            let hash = hash_password(&admin_password)
                .map_err(|e| format!("Failed to hash admin password: {e}"))?;
            db.users().insert(&admin_email, &hash).await?
        }
    };
    db.users().set_role(&admin.id, Role::Admin).await?;
    info!(email = %admin_email, "Admin account ready");

    info!(inserted, "Seed complete");

    db.close().await;
    Ok(())
}
