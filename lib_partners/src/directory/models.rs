//! Upstream record models and the joined output shapes.

use super::html::{deserialize_stripped, deserialize_text, strip_html};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// # Directory Record
///
/// A record type that lives at `contentJson.<WRAPPER_KEY>.<RECORD_KEY>` inside each
/// asset of an upstream listing envelope.
pub trait DirectoryRecord: DeserializeOwned + Send + 'static {
    /// Key of the wrapper object directly under `contentJson`.
    const WRAPPER_KEY: &'static str;
    /// Key of the record object inside the wrapper.
    const RECORD_KEY: &'static str;
    /// Plural label used in log lines.
    const KIND: &'static str;
}

/// A partner as published by the partner-directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPartner {
    #[serde(rename = "Id", default, deserialize_with = "deserialize_text")]
    pub id: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "deserialize_text")]
    pub name: Option<String>,
    #[serde(rename = "PartnerLevel__c", default, deserialize_with = "deserialize_text")]
    pub partner_level: Option<String>,
    #[serde(rename = "PartnerType__c", default, deserialize_with = "deserialize_text")]
    pub partner_type: Option<String>,
    #[serde(rename = "Short_Description", default, deserialize_with = "deserialize_stripped")]
    pub short_description: Option<String>,
    #[serde(
        rename = "PartnerCompanyOverview__c",
        default,
        deserialize_with = "deserialize_stripped"
    )]
    pub company_overview: Option<String>,
}

impl RawPartner {
    /// Builds a partner, stripping markup from both description fields.
    pub fn new(
        id: Option<String>,
        name: Option<String>,
        partner_level: Option<String>,
        partner_type: Option<String>,
        short_description: Option<String>,
        company_overview: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            partner_level,
            partner_type,
            short_description: short_description.map(|s| strip_html(&s)),
            company_overview: company_overview.map(|s| strip_html(&s)),
        }
    }
}

impl DirectoryRecord for RawPartner {
    const WRAPPER_KEY: &'static str = "Partners";
    const RECORD_KEY: &'static str = "Partner";
    const KIND: &'static str = "partners";
}

/// A solution as published by the application marketplace listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSolution {
    #[serde(rename = "solutionpartnername", default, deserialize_with = "deserialize_text")]
    pub partner_name: Option<String>,
    #[serde(rename = "solutiondisplayname", default, deserialize_with = "deserialize_text")]
    pub display_name: Option<String>,
    #[serde(
        rename = "urlsolutionshortdescription",
        default,
        deserialize_with = "deserialize_stripped"
    )]
    pub short_description: Option<String>,
}

impl RawSolution {
    /// Builds a solution, stripping markup from the description.
    pub fn new(
        partner_name: Option<String>,
        display_name: Option<String>,
        short_description: Option<String>,
    ) -> Self {
        Self {
            partner_name,
            display_name,
            short_description: short_description.map(|s| strip_html(&s)),
        }
    }
}

impl DirectoryRecord for RawSolution {
    const WRAPPER_KEY: &'static str = "Solutions";
    const RECORD_KEY: &'static str = "Solution";
    const KIND: &'static str = "solutions";
}

/// A solution as nested under its partner in the joined output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub display_name: Option<String>,
    pub short_description: Option<String>,
}

impl From<&RawSolution> for Solution {
    fn from(raw: &RawSolution) -> Self {
        Self {
            display_name: raw.display_name.clone(),
            short_description: raw.short_description.clone(),
        }
    }
}

/// One partner with every solution that names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerSolution {
    pub partner_name: Option<String>,
    pub partner_id: Option<String>,
    pub partner_level: Option<String>,
    pub partner_type: Option<String>,
    pub short_description: Option<String>,
    pub company_overview: Option<String>,
    pub solutions: Vec<Solution>,
}

impl PartnerSolution {
    pub fn has_solutions(&self) -> bool {
        !self.solutions.is_empty()
    }
}
