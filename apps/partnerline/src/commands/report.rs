//! # Report Commands
//!
//! Builds a report, renders it and writes it to the chosen file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::database;
use crate::commands::material::CalcInput;
use crate::error::ApiError;
use crate::report::{
    build_material_report, build_partner_report, write_report, Report, ReportFormat,
};
use crate::state::{ConfigState, DbState};

/// Where a report went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWrittenDto {
    pub path: String,
    pub format: ReportFormat,
}

impl ReportWrittenDto {
    fn new(path: &Path, format: ReportFormat) -> Self {
        ReportWrittenDto {
            path: path.display().to_string(),
            format,
        }
    }

    pub fn render_text(&self) -> String {
        format!("Report saved to {} ({})\n", self.path, self.format.as_str())
    }
}

/// Writes the sales report of one partner.
pub async fn partner_report(
    db: &DbState,
    config: &ConfigState,
    partner_id: &str,
    output: &Path,
    format: ReportFormat,
) -> Result<ReportWrittenDto, ApiError> {
    debug!(partner_id = %partner_id, output = %output.display(), "partner_report command");
    let db = database(db)?;

    let report = build_partner_report(db, config, partner_id).await?;
    write_report(output, &report.render(format)?)?;
    Ok(ReportWrittenDto::new(output, format))
}

/// Writes a material calculation report, including failed calculations.
pub async fn material_report(
    db: &DbState,
    config: &ConfigState,
    input: CalcInput,
    output: &Path,
    format: ReportFormat,
) -> Result<ReportWrittenDto, ApiError> {
    debug!(?input, output = %output.display(), "material_report command");
    let live = db.inner().filter(|_| !db.is_closed());

    let report = build_material_report(live, config, &input).await;
    write_report(output, &report.render(format)?)?;
    Ok(ReportWrittenDto::new(output, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_state;
    use crate::error::ErrorCode;

    fn temp_report(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("partnerline-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_partner_report_file() {
        let (state, seeded) = seeded_state().await;
        let path = temp_report("partner.json");

        let written = partner_report(
            &state,
            &ConfigState::default(),
            &seeded.partner_id,
            &path,
            ReportFormat::Json,
        )
        .await
        .unwrap();
        assert_eq!(written.format, ReportFormat::Json);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["totalQuantity"], 8);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_failed_calculation_still_writes_report() {
        let (state, seeded) = seeded_state().await;
        let path = temp_report("material.txt");

        let input = CalcInput {
            product_type: seeded.product_type_id,
            material_type: seeded.material_type_id,
            quantity: "0".to_string(),
            param1: "2".to_string(),
            param2: "1.5".to_string(),
        };
        material_report(&state, &ConfigState::default(), input, &path, ReportFormat::Text)
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Product quantity: 0"));
        assert!(text.contains("not possible"));
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_unwritable_path_is_report_error() {
        let (state, seeded) = seeded_state().await;
        let path = temp_report("missing-dir").join("partner.txt");

        let err = partner_report(
            &state,
            &ConfigState::default(),
            &seeded.partner_id,
            &path,
            ReportFormat::Text,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReportError);
    }
}
