//! # Command Line
//!
//! clap definitions and dispatch to the command handlers.
//!
//! ## Commands
//! ```text
//! partnerline [--db <path>] [--json] <command>
//!
//!   partners list | show <id> | add ... | edit <id> ... | delete <id> | types
//!   sales <partner-id>
//!   catalog products | product-types | material-types
//!   calc --product-type <t> --material-type <m> --quantity <n> --param1 <a> --param2 <b>
//!   report partner <id> --output <path> [--format text|json]
//!   report material ... --output <path> [--format text|json]
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::commands::{self, material::CalcInput, partner::PartnerPatch};
use crate::error::ApiError;
use crate::report::ReportFormat;
use crate::state::{ConfigState, DbState};

#[derive(Debug, Parser)]
#[command(name = "partnerline")]
#[command(about = "Partner records, sales history and material planning")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides PARTNERLINE_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage partners
    #[command(subcommand)]
    Partners(PartnersCommand),

    /// Show a partner's sales history with total and discount
    Sales {
        partner_id: String,
    },

    /// Show reference data
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Calculate the material needed for a production run
    Calc(CalcArgs),

    /// Write a report file
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Debug, Subcommand)]
pub enum PartnersCommand {
    /// List partners, highest rating first
    List,
    /// Show one partner
    Show { id: String },
    /// Add a partner
    Add(PartnerArgs),
    /// Edit a partner; omitted fields keep their values
    Edit {
        id: String,
        #[command(flatten)]
        fields: PartnerArgs,
    },
    /// Delete a partner that has no sales
    Delete { id: String },
    /// List partner types
    Types,
}

/// Partner form fields. Values are taken as typed and validated on save.
#[derive(Debug, Clone, Default, Args)]
pub struct PartnerArgs {
    /// Partner type id or name
    #[arg(long = "type")]
    pub partner_type: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    /// Director's full name
    #[arg(long)]
    pub director: Option<String>,
    /// Legal address
    #[arg(long)]
    pub address: Option<String>,
    /// Tax ID (10 or 12 digits)
    #[arg(long)]
    pub tax_id: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Phone starting with +7
    #[arg(long)]
    pub phone: Option<String>,
    /// Rating from 0 to 10
    #[arg(long, allow_hyphen_values = true)]
    pub rating: Option<String>,
}

impl From<PartnerArgs> for PartnerPatch {
    fn from(args: PartnerArgs) -> Self {
        PartnerPatch {
            partner_type: args.partner_type,
            name: args.name,
            director_full_name: args.director,
            legal_address: args.address,
            tax_id: args.tax_id,
            email: args.email,
            phone: args.phone,
            rating: args.rating,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List products with their article and minimum partner price
    Products,
    /// List product types with their coefficients
    ProductTypes,
    /// List material types with their defect percent
    MaterialTypes,
}

/// Calculation inputs, taken as typed.
#[derive(Debug, Clone, Args)]
pub struct CalcArgs {
    /// Product type id or name
    #[arg(long)]
    pub product_type: String,
    /// Material type id or name
    #[arg(long)]
    pub material_type: String,
    #[arg(long, allow_hyphen_values = true)]
    pub quantity: String,
    #[arg(long, allow_hyphen_values = true)]
    pub param1: String,
    #[arg(long, allow_hyphen_values = true)]
    pub param2: String,
}

impl From<CalcArgs> for CalcInput {
    fn from(args: CalcArgs) -> Self {
        CalcInput {
            product_type: args.product_type,
            material_type: args.material_type,
            quantity: args.quantity,
            param1: args.param1,
            param2: args.param2,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReportOutput {
    /// File to write
    #[arg(long, short)]
    pub output: PathBuf,
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Partner card with its sales history
    Partner {
        partner_id: String,
        #[command(flatten)]
        output: ReportOutput,
    },
    /// Material calculation with its inputs
    Material {
        #[command(flatten)]
        calc: CalcArgs,
        #[command(flatten)]
        output: ReportOutput,
    },
}

// =============================================================================
// Dispatch
// =============================================================================

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| ApiError::internal(format!("Could not serialize output: {}", e)))
}

/// Renders a DTO as JSON or through its text renderer.
fn output<T: Serialize>(
    value: &T,
    json: bool,
    text: impl FnOnce(&T) -> String,
) -> Result<String, ApiError> {
    if json {
        to_json(value)
    } else {
        Ok(text(value))
    }
}

/// Runs one command and returns what to print.
pub async fn execute(
    command: Command,
    db: &DbState,
    config: &ConfigState,
    json: bool,
) -> Result<String, ApiError> {
    match command {
        Command::Partners(cmd) => match cmd {
            PartnersCommand::List => {
                let cards = commands::partner::list_partners(db).await?;
                output(&cards, json, |c| commands::partner::render_cards(c))
            }
            PartnersCommand::Show { id } => {
                let partner = commands::partner::get_partner(db, &id).await?;
                output(&partner, json, |p| p.render_text())
            }
            PartnersCommand::Add(fields) => {
                let partner = commands::partner::create_partner(db, fields.into()).await?;
                output(&partner, json, |p| format!("Partner saved\n{}", p.render_text()))
            }
            PartnersCommand::Edit { id, fields } => {
                let partner = commands::partner::update_partner(db, &id, fields.into()).await?;
                output(&partner, json, |p| format!("Partner saved\n{}", p.render_text()))
            }
            PartnersCommand::Delete { id } => {
                let deleted = commands::partner::delete_partner(db, &id).await?;
                output(&deleted, json, |d| format!("Deleted partner {} ({})\n", d.name, d.id))
            }
            PartnersCommand::Types => {
                let types = commands::partner::list_partner_types(db).await?;
                output(&types, json, |t| commands::catalog::render_partner_types(t))
            }
        },
        Command::Sales { partner_id } => {
            let history = commands::sales::partner_sales(db, config, &partner_id).await?;
            output(&history, json, |h| h.render_text())
        }
        Command::Catalog(cmd) => match cmd {
            CatalogCommand::Products => {
                let products = commands::catalog::list_products(db).await?;
                output(&products, json, |p| commands::catalog::render_products(p))
            }
            CatalogCommand::ProductTypes => {
                let types = commands::catalog::list_product_types(db).await?;
                output(&types, json, |t| commands::catalog::render_product_types(t))
            }
            CatalogCommand::MaterialTypes => {
                let types = commands::catalog::list_material_types(db).await?;
                output(&types, json, |t| commands::catalog::render_material_types(t))
            }
        },
        Command::Calc(args) => {
            let result = commands::material::calculate(db, config, args.into()).await;
            output(&result, json, |r| r.render_text())
        }
        Command::Report(cmd) => {
            let written = match cmd {
                ReportCommand::Partner { partner_id, output: target } => {
                    commands::report::partner_report(
                        db,
                        config,
                        &partner_id,
                        &target.output,
                        target.format,
                    )
                    .await?
                }
                ReportCommand::Material { calc, output: target } => {
                    commands::report::material_report(
                        db,
                        config,
                        calc.into(),
                        &target.output,
                        target.format,
                    )
                    .await?
                }
            };
            output(&written, json, |w| w.render_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_state;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("partnerline").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_partner_edit() {
        let cli = parse(&["--db", "/tmp/p.db", "partners", "edit", "abc", "--rating", "-1"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/p.db")));
        match cli.command {
            Command::Partners(PartnersCommand::Edit { id, fields }) => {
                assert_eq!(id, "abc");
                assert_eq!(fields.rating.as_deref(), Some("-1"));
                assert_eq!(fields.name, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_material_report() {
        let cli = parse(&[
            "report", "material", "--product-type", "Laminate", "--material-type", "Paper",
            "--quantity", "10", "--param1", "2", "--param2", "1.5", "--output", "r.json",
            "--format", "json", "--json",
        ]);
        assert!(cli.json);
        match cli.command {
            Command::Report(ReportCommand::Material { calc, output }) => {
                assert_eq!(calc.quantity, "10");
                assert_eq!(output.format, ReportFormat::Json);
                assert_eq!(output.output, PathBuf::from("r.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_text_and_json() {
        let (state, seeded) = seeded_state().await;
        let config = ConfigState::default();

        let text = execute(
            parse(&["sales", &seeded.partner_id]).command,
            &state,
            &config,
            false,
        )
        .await
        .unwrap();
        assert!(text.contains("Total: 8 m²"));

        let json = execute(
            parse(&[
                "calc", "--product-type", "Laminate", "--material-type", "Paper",
                "--quantity", "10", "--param1", "2", "--param2", "1.5",
            ])
            .command,
            &state,
            &config,
            true,
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"]["result"], 38);
    }

    #[tokio::test]
    async fn test_execute_catalog_products() {
        let (state, _) = seeded_state().await;
        let json = execute(
            parse(&["catalog", "products"]).command,
            &state,
            &ConfigState::default(),
            true,
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["article"], "ART-A");
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_execute_surfaces_api_errors() {
        let (state, _) = seeded_state().await;
        let err = execute(
            parse(&["partners", "show", "nobody"]).command,
            &state,
            &ConfigState::default(),
            false,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
