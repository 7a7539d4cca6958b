//! # Seed Data Generator
//!
//! Populates the database with demo users and sales for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p canvass-db --bin seed
//!
//! # Specify database path
//! cargo run -p canvass-db --bin seed -- --db ./data/portal.db
//! ```
//!
//! Creates one admin, one operations user, one sales manager, four reps,
//! and a spread of pending/approved/rejected sales across the catalog so
//! the dashboard and leaderboard have something to show.

use chrono::{Duration, Utc};
use std::env;

use canvass_core::submit::build_sale;
use canvass_core::{
    Catalog, ProductSelection, Role, SaleStatus, SaleSubmission, SalesSettings, User,
};
use canvass_db::{Database, DbConfig};

const REPS: &[(&str, &str)] = &[
    ("rep-avery", "Avery Quinn"),
    ("rep-blake", "Blake Orr"),
    ("rep-casey", "Casey Lane"),
    ("rep-devon", "Devon Reyes"),
];

/// Plan id rotations per rep so the leaderboard is not uniform.
const PLAN_ROTATION: &[&str] = &[
    "att-1gig",
    "frontier-500",
    "spectrum-internet",
    "vivint-core",
    "att-2gig",
    "frontier-1gig",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = parse_db_path().unwrap_or_else(|| "./canvass-portal.db".to_string());
    println!("Seeding database at {db_path}");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let catalog = Catalog::builtin();
    let settings = SalesSettings::default();
    let now = Utc::now();

    // Staff
    seed_user(&db, "admin-1", "Jordan Wells", Role::Admin).await?;
    seed_user(&db, "ops-1", "Riley Voss", Role::Operations).await?;
    seed_user(&db, "mgr-1", "Morgan Hale", Role::SalesManager).await?;
    for (id, name) in REPS {
        seed_user(&db, id, name, Role::SalesRep).await?;
    }

    // Sales: each rep gets a different volume; most get approved by the
    // manager, a few stay pending, one in ten gets rejected.
    let mut total = 0usize;
    for (rep_index, (rep_id, rep_name)) in REPS.iter().enumerate() {
        let sale_count = 3 + rep_index * 2;
        for sale_index in 0..sale_count {
            let plan_id = PLAN_ROTATION[(rep_index + sale_index) % PLAN_ROTATION.len()];
            let sale_date = now - Duration::days((sale_index % 20) as i64);

            let submission = SaleSubmission {
                sales_rep_id: rep_id.to_string(),
                sales_rep_name: rep_name.to_string(),
                manager_id: Some("mgr-1".to_string()),
                customer_address: format!("{} Maple Dr, Austin TX", 100 + total),
                customer_name: Some(format!("Customer {}", total + 1)),
                customer_phone: None,
                customer_email: None,
                sale_type: None,
                notes: None,
                products: vec![ProductSelection::new(plan_id, 1)],
            };

            let built = build_sale(submission, &catalog, &settings, sale_date)?;
            db.sales().insert_sale(&built.sale, &built.products).await?;

            match sale_index % 10 {
                // Leave some sales pending for the approval queue.
                2 | 5 | 8 => {}
                9 => {
                    db.sales()
                        .decide(
                            &built.sale.id,
                            SaleStatus::Rejected,
                            "mgr-1",
                            "Morgan Hale",
                            Some("duplicate entry"),
                            sale_date + Duration::hours(2),
                        )
                        .await?;
                }
                _ => {
                    db.sales()
                        .decide(
                            &built.sale.id,
                            SaleStatus::Approved,
                            "mgr-1",
                            "Morgan Hale",
                            None,
                            sale_date + Duration::hours(2),
                        )
                        .await?;
                }
            }

            total += 1;
        }
    }

    println!("Seeded {} users and {total} sales", 3 + REPS.len());
    Ok(())
}

async fn seed_user(
    db: &Database,
    id: &str,
    name: &str,
    role: Role,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let user = User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{id}@canvass.example"),
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.users().insert(&user).await?;
    Ok(())
}

/// Parses `--db <path>` from argv.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1).cloned())
}
