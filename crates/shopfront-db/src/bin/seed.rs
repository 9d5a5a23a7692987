//! Development data seeder.
//!
//! Populates the database with a few categories, demo products (through the
//! SKU generator, so the seeded catalog exercises the real code path) and a
//! default admin account.
//!
//! ```text
//! cargo run -p shopfront-db --bin seed -- [database-path]
//! ```
//!
//! Defaults to `./shopfront.db`. Re-running against a seeded database fails
//! on the first duplicate category; wipe the file to reseed.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use tracing::info;

use shopfront_core::Role;
use shopfront_db::{Database, DbConfig, NewProduct};

const DEFAULT_DB_PATH: &str = "./shopfront.db";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

struct SeedProduct {
    name: &'static str,
    category: &'static str,
    price_cents: i64,
    stock: i64,
    brand: Option<&'static str>,
    tags: Option<&'static str>,
    featured: bool,
}

const CATEGORIES: &[(&str, &str, &str)] = &[
    ("Electronics", "ELEC", "Computers, peripherals and accessories"),
    ("Groceries", "GRO", "Food and household staples"),
    ("Stationery", "STA", "Office and school supplies"),
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "USB-C Cable 1m",
        category: "ELEC",
        price_cents: 999,
        stock: 120,
        brand: Some("Voltic"),
        tags: Some("cable,usb,charging"),
        featured: true,
    },
    SeedProduct {
        name: "Wireless Mouse",
        category: "ELEC",
        price_cents: 2499,
        stock: 35,
        brand: Some("Voltic"),
        tags: Some("mouse,wireless"),
        featured: false,
    },
    SeedProduct {
        name: "Mechanical Keyboard",
        category: "ELEC",
        price_cents: 8999,
        stock: 8,
        brand: Some("KeyWorks"),
        tags: Some("keyboard,mechanical"),
        featured: true,
    },
    SeedProduct {
        name: "Arabica Coffee Beans 500g",
        category: "GRO",
        price_cents: 1450,
        stock: 60,
        brand: None,
        tags: Some("coffee,beans"),
        featured: false,
    },
    SeedProduct {
        name: "A5 Notebook",
        category: "STA",
        price_cents: 350,
        stock: 200,
        brand: None,
        tags: Some("notebook,paper"),
        featured: false,
    },
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    info!(path = %path, "Seeding database");

    let db = Database::new(DbConfig::new(&path)).await?;

    for &(name, code, description) in CATEGORIES {
        db.categories()
            .insert(name, code, Some(description), None)
            .await?;
        info!(code, "Seeded category");
    }

    for seed in PRODUCTS {
        let mut new = NewProduct::new(seed.name, seed.category, seed.price_cents);
        new.stock_quantity = seed.stock;
        new.brand = seed.brand.map(str::to_string);
        new.tags = seed.tags.map(str::to_string);
        new.is_featured = seed.featured;

        let product = db.products().insert_with_generated_sku(&new).await?;
        info!(sku = %product.sku, name = %product.name, "Seeded product");
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(DEFAULT_ADMIN_PASSWORD.as_bytes(), &salt)
        .map_err(|e| format!("password hashing failed: {e}"))?
        .to_string();

    db.users()
        .insert(DEFAULT_ADMIN_USERNAME, &hash, Role::Admin)
        .await?;
    info!(username = DEFAULT_ADMIN_USERNAME, "Seeded admin user");

    db.close().await;
    info!("Seeding complete");
    Ok(())
}
