//! # Seed Data Generator
//!
//! Populates the database with a pharmacy catalogue for development.
//!
//! ## Usage
//! ```bash
//! # Generate 150 products (default)
//! cargo run -p rx-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p rx-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p rx-db --bin seed -- --db ./data/rx_ledger.db
//! ```
//!
//! ## Generated Data
//! - Products across therapeutic classes and strengths, numeric IDs
//! - Opening stock booked as purchases (so some products stay at 0)
//! - A handful of suppliers and an `admin` account
//! - A few sales so the dashboard has something to show

use rx_core::{Money, NewProduct, Role, SaleItemInput};
use rx_db::{Database, DbConfig};
use std::env;

/// Drug classes for realistic test data
const CLASSES: &[(&str, &[&str])] = &[
    (
        "Analgesic",
        &[
            "Paracetamol",
            "Ibuprofen",
            "Aspirin",
            "Naproxen",
            "Diclofenac",
            "Mefenamic Acid",
        ],
    ),
    (
        "Antibiotic",
        &[
            "Amoxicillin",
            "Azithromycin",
            "Ciprofloxacin",
            "Doxycycline",
            "Cephalexin",
            "Clarithromycin",
        ],
    ),
    (
        "Antihistamine",
        &[
            "Cetirizine",
            "Loratadine",
            "Fexofenadine",
            "Chlorpheniramine",
        ],
    ),
    (
        "Gastro",
        &[
            "Omeprazole",
            "Esomeprazole",
            "Ranitidine",
            "Loperamide",
            "Domperidone",
        ],
    ),
    (
        "Supplement",
        &[
            "Vitamin C",
            "Vitamin D3",
            "Folic Acid",
            "Iron",
            "Calcium",
            "Zinc",
        ],
    ),
];

/// Strength/pack variants and their price add-on in cents
const VARIANTS: &[(&str, i64)] = &[
    ("100mg x10", 0),
    ("250mg x10", 150),
    ("500mg x10", 300),
    ("500mg x20", 550),
    ("1g x10", 700),
    ("Syrup 60ml", 250),
    ("Syrup 120ml", 400),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("MediSupply Co", "0300-1112233"),
    ("PharmaDist", "0321-4445566"),
    ("HealthLine Wholesale", "0333-7778899"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 150;
    let mut db_path = String::from("./rx_ledger_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(150);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Rx Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 150)");
                println!("  -d, --db <PATH>    Database file path (default: ./rx_ledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Rx Ledger Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let ledger = db.ledger();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut supplier_ids = Vec::new();
    for (name, contact) in SUPPLIERS {
        let supplier = db.suppliers().create(None, name, Some(*contact)).await?;
        supplier_ids.push(supplier.supp_id);
    }
    println!("✓ Created {} suppliers", supplier_ids.len());

    db.users().create("admin", "admin-change-me", Role::Admin).await?;
    if db
        .users()
        .verify_credentials("admin", "admin-change-me")
        .await?
        .is_none()
    {
        return Err("stored admin password hash does not verify".into());
    }
    println!("✓ Created user 'admin' (password: admin-change-me)");

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (class_idx, (_, drugs)) in CLASSES.iter().enumerate() {
        for (drug_idx, drug) in drugs.iter().enumerate() {
            for (variant_idx, (variant, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = class_idx * 1000 + drug_idx * 20 + variant_idx;

                // Base price 1.50 - 9.49 plus the variant add-on
                let price = Money::from_cents(150 + ((seed * 17) % 800) as i64 + price_addon);

                let product = match ledger
                    .insert_product(NewProduct {
                        product_id: None,
                        name: format!("{} {}", drug, variant),
                        sale_price: Some(price),
                    })
                    .await
                {
                    Ok(product) => product,
                    Err(e) => {
                        eprintln!("Failed to insert {} {}: {}", drug, variant, e);
                        continue;
                    }
                };

                // Opening stock 0-100; every 101st lands on zero
                let opening = (seed % 101) as i64;
                if opening > 0 {
                    let supplier = &supplier_ids[seed % supplier_ids.len()];
                    ledger
                        .record_purchase(&product.product_id, opening, Some(supplier.as_str()))
                        .await?;
                }

                generated += 1;

                if generated % 50 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // A few sales against the best-stocked products
    let stocked: Vec<_> = db
        .products()
        .list_with_stock()
        .await?
        .into_iter()
        .filter(|p| p.quantity_available >= 10)
        .take(5)
        .collect();

    for (n, product) in stocked.iter().enumerate() {
        let items = [SaleItemInput {
            product_id: product.product_id.clone(),
            quantity: (n as i64 % 3) + 1,
        }];
        ledger.record_sale(&format!("SEED-{:04}", n + 1), &items).await?;
    }
    println!("✓ Recorded {} sample sales", stocked.len());

    let stats = db.dashboard().stats().await?;
    println!();
    println!("Dashboard:");
    println!("  Products:        {}", stats.total_products);
    println!("  Low stock:       {}", stats.low_stock_count);
    println!("  Total sales:     {}", stats.total_sales());
    println!("  Inventory value: {}", stats.inventory_value());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
