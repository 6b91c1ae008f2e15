//! # Partner Commands
//!
//! Partner list, partner card, create/edit and delete.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  partners edit <id> --rating 9                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  get_details(id) ──► current form values (phone back in +7 form)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PartnerPatch::apply ──► only the given flags change                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  upsert(Some(&partner), &input) ──► validated, one transaction         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::{database, resolve_key};
use crate::error::ApiError;
use crate::state::DbState;
use partnerline_core::phone::display_phone;
use partnerline_core::{PartnerDetails, PartnerInput, PartnerOverview, PartnerType};
use partnerline_db::Database;

// =============================================================================
// DTOs
// =============================================================================

/// One card of the partner list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerCardDto {
    pub id: String,
    pub partner_type_name: String,
    pub name: String,
    pub director_full_name: String,
    /// `+7XXXXXXXXXX`, or empty.
    pub phone: String,
    pub email: String,
    pub rating: i64,
    pub total_quantity: i64,
    pub discount_percent: u8,
}

impl From<PartnerOverview> for PartnerCardDto {
    fn from(p: PartnerOverview) -> Self {
        let discount_percent = p.discount_percent();
        PartnerCardDto {
            id: p.id,
            partner_type_name: p.partner_type_name,
            name: p.name,
            director_full_name: p.director_full_name,
            phone: p.phone.as_deref().map(display_phone).unwrap_or_default(),
            email: p.email.unwrap_or_default(),
            rating: p.rating,
            total_quantity: p.total_quantity,
            discount_percent,
        }
    }
}

impl PartnerCardDto {
    pub fn render_text(&self) -> String {
        format!(
            "{} «{}»  {}%\n  Director: {}\n  Phone: {}\n  Rating: {}  Sold: {}\n  Id: {}\n",
            self.partner_type_name,
            self.name,
            self.discount_percent,
            self.director_full_name,
            self.phone,
            self.rating,
            self.total_quantity,
            self.id
        )
    }
}

/// Renders the whole partner list.
pub fn render_cards(cards: &[PartnerCardDto]) -> String {
    if cards.is_empty() {
        return "No partners\n".to_string();
    }
    cards
        .iter()
        .map(PartnerCardDto::render_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A partner with its contact, as shown in the edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDetailsDto {
    pub id: String,
    pub partner_type_id: String,
    pub name: String,
    pub director_full_name: String,
    pub legal_address: String,
    pub tax_id: String,
    pub rating: i64,
    pub email: String,
    /// `+7XXXXXXXXXX`, or empty.
    pub phone: String,
}

impl From<PartnerDetails> for PartnerDetailsDto {
    fn from(d: PartnerDetails) -> Self {
        let (email, phone) = match d.contact {
            Some(c) => (c.email, display_phone(&c.phone)),
            None => (String::new(), String::new()),
        };
        PartnerDetailsDto {
            id: d.partner.id,
            partner_type_id: d.partner.partner_type_id,
            name: d.partner.name,
            director_full_name: d.partner.director_full_name,
            legal_address: d.partner.legal_address,
            tax_id: d.partner.tax_id,
            rating: d.partner.rating,
            email,
            phone,
        }
    }
}

impl PartnerDetailsDto {
    pub fn render_text(&self) -> String {
        format!(
            "Id: {}\nType: {}\nName: {}\nDirector: {}\nLegal address: {}\nTax ID: {}\nRating: {}\nEmail: {}\nPhone: {}\n",
            self.id,
            self.partner_type_id,
            self.name,
            self.director_full_name,
            self.legal_address,
            self.tax_id,
            self.rating,
            self.email,
            self.phone
        )
    }
}

/// Result of a delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPartnerDto {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Form Input
// =============================================================================

/// Raw form fields from the command line. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartnerPatch {
    /// Partner type id or name.
    pub partner_type: Option<String>,
    pub name: Option<String>,
    pub director_full_name: Option<String>,
    pub legal_address: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Unparsed; anything that is not an integer reads as missing.
    pub rating: Option<String>,
}

impl PartnerPatch {
    /// Overlays the given fields on `base`.
    pub fn apply(self, base: PartnerInput) -> PartnerInput {
        PartnerInput {
            partner_type_id: self.partner_type.unwrap_or(base.partner_type_id),
            name: self.name.unwrap_or(base.name),
            director_full_name: self.director_full_name.unwrap_or(base.director_full_name),
            legal_address: self.legal_address.unwrap_or(base.legal_address),
            tax_id: self.tax_id.unwrap_or(base.tax_id),
            email: self.email.unwrap_or(base.email),
            phone: self.phone.unwrap_or(base.phone),
            rating: match self.rating {
                Some(raw) => raw.trim().parse::<i64>().ok(),
                None => base.rating,
            },
        }
    }
}

/// Current values of a stored partner as form input.
fn form_values(details: &PartnerDetails) -> PartnerInput {
    let (email, phone) = match &details.contact {
        Some(c) => (c.email.clone(), display_phone(&c.phone)),
        None => (String::new(), String::new()),
    };
    PartnerInput {
        partner_type_id: details.partner.partner_type_id.clone(),
        name: details.partner.name.clone(),
        director_full_name: details.partner.director_full_name.clone(),
        legal_address: details.partner.legal_address.clone(),
        tax_id: details.partner.tax_id.clone(),
        email,
        phone,
        rating: Some(details.partner.rating),
    }
}

/// Accepts a partner type name in place of its id.
async fn resolve_partner_type(db: &Database, key: &str) -> Result<String, ApiError> {
    let types = db.partners().list_types().await?;
    Ok(resolve_key(&types, key, |t| t.id.as_str(), |t| t.name.as_str()).to_string())
}

// =============================================================================
// Commands
// =============================================================================

/// Lists partners, highest rating first.
pub async fn list_partners(db: &DbState) -> Result<Vec<PartnerCardDto>, ApiError> {
    debug!("list_partners command");
    let partners = database(db)?.partners().list_overview().await?;
    Ok(partners.into_iter().map(PartnerCardDto::from).collect())
}

/// Gets a partner with its contact.
pub async fn get_partner(db: &DbState, id: &str) -> Result<PartnerDetailsDto, ApiError> {
    debug!(id = %id, "get_partner command");
    let details = database(db)?
        .partners()
        .get_details(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner", id))?;
    Ok(PartnerDetailsDto::from(details))
}

/// Lists partner types.
pub async fn list_partner_types(db: &DbState) -> Result<Vec<PartnerType>, ApiError> {
    Ok(database(db)?.partners().list_types().await?)
}

/// Creates a partner from form fields.
pub async fn create_partner(
    db: &DbState,
    patch: PartnerPatch,
) -> Result<PartnerDetailsDto, ApiError> {
    debug!("create_partner command");
    let db = database(db)?;

    let mut input = patch.apply(PartnerInput::default());
    input.partner_type_id = resolve_partner_type(db, &input.partner_type_id).await?;

    let saved = db.partners().upsert(None, &input).await?;
    Ok(PartnerDetailsDto::from(saved))
}

/// Edits a partner; fields not given keep their stored values.
pub async fn update_partner(
    db: &DbState,
    id: &str,
    patch: PartnerPatch,
) -> Result<PartnerDetailsDto, ApiError> {
    debug!(id = %id, "update_partner command");
    let db = database(db)?;

    let current = db
        .partners()
        .get_details(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner", id))?;

    let mut input = patch.apply(form_values(&current));
    input.partner_type_id = resolve_partner_type(db, &input.partner_type_id).await?;

    let saved = db.partners().upsert(Some(&current.partner), &input).await?;
    Ok(PartnerDetailsDto::from(saved))
}

/// Deletes a partner without sales.
pub async fn delete_partner(db: &DbState, id: &str) -> Result<DeletedPartnerDto, ApiError> {
    debug!(id = %id, "delete_partner command");
    let db = database(db)?;

    let partner = db
        .partners()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner", id))?;

    db.partners().delete(id).await?;

    Ok(DeletedPartnerDto {
        id: partner.id,
        name: partner.name,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_state;
    use crate::error::ErrorCode;

    fn full_patch(partner_type: &str) -> PartnerPatch {
        PartnerPatch {
            partner_type: Some(partner_type.to_string()),
            name: Some("Parket 29".to_string()),
            director_full_name: Some("Petrov Vasiliy".to_string()),
            legal_address: Some("Severodvinsk, Stroiteley 18".to_string()),
            tax_id: Some("3333888520".to_string()),
            email: Some("vppetrov@vl.ru".to_string()),
            phone: Some("+7 987 123 56 78".to_string()),
            rating: Some("7".to_string()),
        }
    }

    #[test]
    fn test_patch_overrides_only_given_fields() {
        let base = PartnerInput {
            name: "Old".to_string(),
            rating: Some(4),
            ..Default::default()
        };
        let patch = PartnerPatch {
            rating: Some("abc".to_string()),
            ..Default::default()
        };
        let input = patch.apply(base);
        assert_eq!(input.name, "Old");
        assert_eq!(input.rating, None);
    }

    #[tokio::test]
    async fn test_create_by_type_name_and_list() {
        let (state, _) = seeded_state().await;

        let created = create_partner(&state, full_patch("wholesale")).await.unwrap();
        assert_eq!(created.phone, "+79871235678");

        let cards = list_partners(&state).await.unwrap();
        assert_eq!(cards.len(), 2);
        // Same rating: ordered by name
        assert_eq!(cards[0].name, "Base Stroy");
        assert_eq!(cards[0].total_quantity, 8);
        assert_eq!(cards[0].discount_percent, 0);
        assert_eq!(cards[1].name, "Parket 29");
        assert_eq!(cards[1].partner_type_name, "Wholesale");
    }

    #[tokio::test]
    async fn test_create_reports_every_violation() {
        let (state, seeded) = seeded_state().await;

        let patch = PartnerPatch {
            partner_type: Some(seeded.partner_type_id),
            tax_id: Some("12345".to_string()),
            phone: Some("89991234567".to_string()),
            rating: Some("11".to_string()),
            ..Default::default()
        };
        let err = create_partner(&state, patch).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        for field in ["name", "director_full_name", "legal_address", "tax_id", "phone", "rating"] {
            assert!(err.message.contains(field), "missing {field} in {}", err.message);
        }
    }

    #[tokio::test]
    async fn test_duplicate_tax_id_is_conflict() {
        let (state, seeded) = seeded_state().await;

        let mut patch = full_patch(&seeded.partner_type_id);
        patch.tax_id = Some("2222455179".to_string());

        let err = create_partner(&state, patch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(err.message.contains("tax ID already exists"));
    }

    #[tokio::test]
    async fn test_edit_keeps_unchanged_fields() {
        let (state, seeded) = seeded_state().await;

        let patch = PartnerPatch {
            rating: Some("10".to_string()),
            ..Default::default()
        };
        let updated = update_partner(&state, &seeded.partner_id, patch).await.unwrap();

        assert_eq!(updated.rating, 10);
        assert_eq!(updated.name, "Base Stroy");
        assert_eq!(updated.phone, "+74931234567");
        assert_eq!(updated.email, "ivanova@ml.ru");

        let fetched = get_partner(&state, &seeded.partner_id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_missing_partner_is_not_found() {
        let (state, _) = seeded_state().await;

        let err = get_partner(&state, "nobody").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = update_partner(&state, "nobody", PartnerPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = delete_partner(&state, "nobody").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delete_with_sales_is_conflict_then_plain_delete_works() {
        let (state, seeded) = seeded_state().await;

        let err = delete_partner(&state, &seeded.partner_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let created = create_partner(&state, full_patch(&seeded.partner_type_id))
            .await
            .unwrap();
        let deleted = delete_partner(&state, &created.id).await.unwrap();
        assert_eq!(deleted.name, "Parket 29");
        assert_eq!(list_partners(&state).await.unwrap().len(), 1);
    }

    #[test]
    fn test_render_cards() {
        assert_eq!(render_cards(&[]), "No partners\n");

        let card = PartnerCardDto {
            id: "p-1".to_string(),
            partner_type_name: "Wholesale".to_string(),
            name: "Base Stroy".to_string(),
            director_full_name: "Ivanova".to_string(),
            phone: "+74931234567".to_string(),
            email: String::new(),
            rating: 7,
            total_quantity: 65_250,
            discount_percent: 5,
        };
        let text = render_cards(&[card]);
        assert!(text.starts_with("Wholesale «Base Stroy»  5%"));
        assert!(text.contains("Sold: 65250"));
    }
}
