//! # Seed Data Generator
//!
//! Populates the snapshot store with a demo tire catalog.
//!
//! ## Usage
//! ```bash
//! # 100 SKUs into ./gulong_dev.db (default)
//! cargo run -p gulong-data --bin seed
//!
//! # Custom amount / path
//! cargo run -p gulong-data --bin seed -- --count 500 --db ./data/gulong.db
//! ```
//!
//! ## Generated Catalog
//! Every make × pattern × size combination, in order, until `count` is
//! reached. Values are derived from the index, so two runs produce the
//! same catalog:
//! - Model: `{MAKE}-{PATTERN}-{WIDTH}{ASPECT}R{RIM}`
//! - Cost: size base price × make factor
//! - Every 4th SKU on sale, every 9th without a cost
//! - GoGulong and TireManila prices near the listed price; every 5th
//!   model also gets a "Gulong Express" price

use chrono::Utc;
use std::env;

use gulong_data::{CatalogReplacement, CompetitorRow, DataConfig, Database, SkuRow};

/// (code, make, patterns, price factor %)
const MAKES: &[(&str, &str, &[&str], i64)] = &[
    ("BS", "Bridgestone", &["Turanza T005", "Ecopia EP300", "Dueler H/T 684"], 115),
    ("MI", "Michelin", &["Primacy 4", "Pilot Sport 4", "LTX Trail"], 125),
    ("YK", "Yokohama", &["BluEarth-GT", "Geolandar A/T G015"], 100),
    ("DL", "Dunlop", &["SP Sport LM705", "Grandtrek AT5"], 95),
    ("GY", "Goodyear", &["Assurance TripleMax 2", "Wrangler AT SilentTrac"], 105),
    ("AR", "Arivo", &["Premio ARZ1", "Terramax ARV H/T"], 60),
];

/// (width, aspect, rim, base cost in pesos)
const SIZES: &[(u32, u32, u32, i64)] = &[
    (175, 65, 14, 2450),
    (185, 65, 15, 2900),
    (195, 55, 16, 3600),
    (205, 55, 16, 3900),
    (215, 60, 16, 4300),
    (225, 45, 17, 5200),
    (235, 60, 18, 6800),
    (265, 70, 16, 7100),
];

const YEARS: &[&str] = &["2023", "2024", "2025"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 100;
    let mut db_path = String::from("./gulong_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse()?;
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
                println!("Gulong Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of SKUs to generate (default: 100)");
                println!("  -d, --db <PATH>    Database file path (default: ./gulong_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Gulong Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_path);
    println!("SKUs:     {}", count);
    println!();

    let db = Database::new(DataConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.skus().count().await?;
    if existing > 0 {
        println!("⚠ Replacing {} existing SKUs", existing);
    }

    let (skus, competitors) = generate(count);
    let today = Utc::now().date_naive();

    let summary = db
        .replace_catalog(&CatalogReplacement {
            skus,
            competitors,
            backend_date: today,
            competitor_date: today,
        })
        .await?;

    println!();
    println!(
        "✓ Wrote {} SKUs and {} competitor prices",
        summary.skus, summary.competitor_prices
    );
    println!("✓ Update dates stamped {}", today);

    db.close().await;
    Ok(())
}

fn generate(count: usize) -> (Vec<SkuRow>, Vec<CompetitorRow>) {
    let mut skus = Vec::new();
    let mut competitors = Vec::new();

    let combos = MAKES.iter().flat_map(|make| {
        make.2
            .iter()
            .enumerate()
            .flat_map(move |(p, pattern)| SIZES.iter().map(move |size| (make, p, *pattern, size)))
    });

    for (index, ((code, make, _, factor), p, pattern, (width, aspect, rim, base))) in combos.take(count).enumerate() {
        let model = format!("{}-{}-{}{}R{}", code, p + 1, width, aspect, rim);
        let dimensions = format!("{}/{} R{}", width, aspect, rim);
        let cost = base * factor / 100;
        let listed = cost * 125 / 100;

        skus.push(SkuRow {
            model: model.clone(),
            sku_name: format!("{} {} {}", make, pattern, dimensions),
            make: make.to_string(),
            pattern: pattern.to_string(),
            dimensions,
            year: Some(YEARS[index % YEARS.len()].to_string()),
            supplier_max_price: (index % 9 != 8).then(|| cost.to_string()),
            sale_tag: index % 4 == 0,
            listed_price: Some(listed.to_string()),
            selection_max_price: Some((cost + 150).to_string()),
            qty_tiremanila: Some(((index * 7) % 40).to_string()),
        });

        // Spread competitor prices from 10% under to 10% over listed
        let spread = (index as i64 % 21) - 10;
        let go_gulong = listed + listed * spread / 100;
        competitors.push(CompetitorRow::new(&model, "GoGulong", Some(&go_gulong.to_string())));
        competitors.push(CompetitorRow::new(
            &model,
            "TireManila",
            Some(&(go_gulong + 90).to_string()),
        ));
        if index % 5 == 0 {
            competitors.push(CompetitorRow::new(
                &model,
                "Gulong Express",
                Some(&(listed - 120).to_string()),
            ));
        }
    }

    (skus, competitors)
}
