//! The plan row type and its table contract.

use serde::Serialize;
use sqlx::FromRow;

/// Table holding the CMS Medicare Advantage landscape rows.
pub const PLAN_TABLE: &str = "cms_landscape_2025";

/// Column-level description of [`PLAN_TABLE`], phrased for LLM prompts.
///
/// This is the single durable contract between generated queries and the
/// database; keep it in sync with the table loaded out-of-band.
pub const SCHEMA_SUMMARY: &str = "\
Table cms_landscape_2025 (Medicare Advantage landscape, CMS 2025):
- id: unique row identifier
- contract_id: contract code (e.g. \"H1234\")
- plan_id: plan code within the contract (e.g. \"001\")
- org_name: organization name (e.g. \"Humana\", \"UnitedHealthcare\", \"Aetna\")
- plan_name: full plan name
- state: two-letter state code (e.g. \"IL\", \"FL\")
- county: county name (e.g. \"Cook\", \"Miami-Dade\")
- monthly_premium: monthly premium amount in dollars
- drug_deductible: drug deductible amount in dollars
- star_rating: star rating on a 1-5 scale, may be null";

/// One row of the plan table.
///
/// `star_rating` is nullable in the source data; everything else is always
/// present. Serialized as-is when rows are handed to the summarization
/// stage, so field names here are also the names the model sees.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlanRecord {
    pub id: i64,
    pub contract_id: String,
    pub plan_id: String,
    pub org_name: String,
    pub plan_name: String,
    pub state: String,
    pub county: String,
    pub monthly_premium: f64,
    pub drug_deductible: f64,
    pub star_rating: Option<f64>,
}
