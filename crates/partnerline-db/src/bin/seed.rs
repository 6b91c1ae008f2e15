//! # Seed Data Generator
//!
//! Populates the database with demo reference data, partners and sales.
//!
//! ## Usage
//! ```bash
//! # Seed ./partnerline_dev.db
//! cargo run -p partnerline-db --bin seed
//!
//! # Specify database path
//! cargo run -p partnerline-db --bin seed -- --db ./data/partnerline.db
//! ```
//!
//! ## Generated Data
//! - Partner types: wholesale, retail, online store, distributor
//! - Product types with their coefficients, material types with defect rates
//! - A handful of products and partners
//! - Sales spread so partners land in different discount tiers

use chrono::NaiveDate;
use partnerline_core::{NewSaleItem, PartnerInput};
use partnerline_db::{Database, DbConfig};
use std::env;

const PARTNER_TYPES: &[&str] = &["Distributor", "Online store", "Retail", "Wholesale"];

const PRODUCT_TYPES: &[(&str, f64)] = &[
    ("Laminate", 2.35),
    ("Parquet board", 5.15),
    ("Engineered board", 4.34),
    ("Cork", 1.5),
];

const MATERIAL_TYPES: &[(&str, f64)] = &[
    ("Paper", 0.7),
    ("Glue", 0.5),
    ("Oak veneer", 2.5),
    ("Pine timber", 1.2),
];

/// (product type index, name, article, min price)
const PRODUCTS: &[(usize, &str, &str, f64)] = &[
    (0, "Laminate Oak Classic 33", "8758385", 4456.90),
    (0, "Laminate Grey Ash 32", "8858958", 1799.33),
    (1, "Parquet Nordic Walnut", "7750282", 7330.99),
    (2, "Engineered Natural Oak", "7028748", 3750.00),
    (3, "Cork Floor Sand", "5012543", 5450.59),
];

/// (partner type index, name, director, address, tax id, email, phone, rating)
const PARTNERS: &[(usize, &str, &str, &str, &str, &str, &str, i64)] = &[
    (
        3,
        "Base Stroy",
        "Ivanova Alexandra Ivanovna",
        "652050, Kemerovo region, Yurga, Lesnaya 15",
        "2222455179",
        "aleksandraivanova@ml.ru",
        "+7 493 123 45 67",
        7,
    ),
    (
        2,
        "Parket 29",
        "Petrov Vasiliy Petrovich",
        "164500, Arkhangelsk region, Severodvinsk, Stroiteley 18",
        "3333888520",
        "vppetrov@vl.ru",
        "+7 987 123 56 78",
        7,
    ),
    (
        0,
        "Floor Master",
        "Solovyev Andrey Nikolaevich",
        "188910, Leningrad region, Primorsk, Parkovaya 21",
        "4440391035",
        "ansolovev@st.ru",
        "+7 812 223 32 00",
        5,
    ),
    (
        1,
        "Remont Online",
        "Voronova Daria Sergeevna",
        "143960, Moscow region, Reutov, Svobody 51",
        "111222333444",
        "",
        "+7 444 222 33 11",
        10,
    ),
];

/// (partner index, product index, date, quantity)
const SALES: &[(usize, usize, (i32, u32, u32), i64)] = &[
    (0, 0, (2023, 3, 23), 15_500),
    (0, 2, (2023, 12, 18), 12_350),
    (0, 3, (2024, 6, 7), 37_400),
    (1, 1, (2022, 12, 2), 35_000),
    (1, 4, (2023, 5, 17), 59_050),
    (1, 2, (2024, 6, 7), 37_200),
    (1, 0, (2024, 7, 1), 4_500),
    (2, 0, (2023, 1, 22), 50_000),
    (2, 1, (2024, 7, 5), 670_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./partnerline_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Partnerline Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./partnerline_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Partnerline Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.partners().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} partners", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut partner_type_ids = Vec::new();
    for name in PARTNER_TYPES {
        partner_type_ids.push(db.partners().insert_type(name).await?.id);
    }
    println!("✓ {} partner types", partner_type_ids.len());

    let mut product_type_ids = Vec::new();
    for (name, coefficient) in PRODUCT_TYPES {
        let product_type = db
            .catalog()
            .insert_product_type(name, Some(*coefficient))
            .await?;
        product_type_ids.push(product_type.id);
    }
    for (name, defect) in MATERIAL_TYPES {
        db.catalog().insert_material_type(name, Some(*defect)).await?;
    }
    println!(
        "✓ {} product types, {} material types",
        PRODUCT_TYPES.len(),
        MATERIAL_TYPES.len()
    );

    let mut product_ids = Vec::new();
    for (type_idx, name, article, price) in PRODUCTS {
        let product = db
            .catalog()
            .insert_product(&product_type_ids[*type_idx], name, article, *price)
            .await?;
        product_ids.push(product.id);
    }
    println!("✓ {} products", product_ids.len());

    let mut partner_ids = Vec::new();
    for (type_idx, name, director, address, tax_id, email, phone, rating) in PARTNERS {
        let input = PartnerInput {
            partner_type_id: partner_type_ids[*type_idx].clone(),
            name: name.to_string(),
            director_full_name: director.to_string(),
            legal_address: address.to_string(),
            tax_id: tax_id.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            rating: Some(*rating),
        };
        match db.partners().upsert(None, &input).await {
            Ok(details) => partner_ids.push(details.partner.id),
            Err(e) => {
                eprintln!("Failed to insert {}: {}", name, e);
                return Err(e.into());
            }
        }
    }
    println!("✓ {} partners", partner_ids.len());

    let mut recorded = 0;
    for (partner_idx, product_idx, (y, m, d), quantity) in SALES {
        let Some(sale_date) = NaiveDate::from_ymd_opt(*y, *m, *d) else {
            eprintln!("Skipping sale with invalid date {y}-{m}-{d}");
            continue;
        };
        db.sales()
            .record_sale(
                &partner_ids[*partner_idx],
                sale_date,
                &[NewSaleItem {
                    product_id: product_ids[*product_idx].clone(),
                    quantity: *quantity,
                }],
            )
            .await?;
        recorded += 1;
    }
    println!("✓ {} sales", recorded);

    println!();
    println!("Partners by rating:");
    for partner in db.partners().list_overview().await? {
        println!(
            "  {:<16} rating {:>2}  sold {:>8}  discount {:>2}%",
            partner.name,
            partner.rating,
            partner.total_quantity,
            partner.discount_percent()
        );
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
