//! Data transfer objects for the quote API's JSON responses

use serde::Deserialize;

use crate::models::CompanyInfo;

/// Company overview payload. Every field is optional: once the API quota is
/// exhausted the response omits them entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyInfoDto {
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
}

impl CompanyInfoDto {
    /// Map to the domain model, substituting empty strings for absent fields
    pub fn into_company_info(self) -> CompanyInfo {
        CompanyInfo {
            symbol: self.symbol.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            industry: self.industry.unwrap_or_default(),
        }
    }
}
