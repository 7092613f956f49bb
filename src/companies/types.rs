//! Company type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Surrogate key assigned by the store
    pub id: i64,
    /// Display name, matched case-insensitively during upserts
    pub name: String,
    /// Free text description
    #[serde(default)]
    pub description: String,
    /// Country the company originates from
    #[serde(default)]
    pub country_of_origin: String,
    /// Normalized economic sector
    #[serde(default)]
    pub economic_sector: String,
    /// Last time an ingestion run wrote this company
    #[serde(default)]
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl Company {
    /// Overwrite fields with the non-empty values of a candidate.
    ///
    /// Returns `true` if any field changed.
    pub fn apply(&mut self, record: &CandidateRecord) -> bool {
        let mut changed = overwrite(&mut self.name, Some(record.name.as_str()));
        changed |= overwrite(&mut self.description, record.description.as_deref());
        changed |= overwrite(
            &mut self.country_of_origin,
            record.country_of_origin.as_deref(),
        );
        changed |= overwrite(&mut self.economic_sector, record.economic_sector.as_deref());
        changed
    }

    /// Case-insensitive name comparison
    pub fn matches_name(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }

    /// List projection of this company
    pub fn summary(&self) -> CompanySummary {
        CompanySummary::from(self)
    }
}

/// Identity key of a company name: the full Unicode lowercase
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

fn overwrite(field: &mut String, value: Option<&str>) -> bool {
    match value {
        Some(v) if !v.trim().is_empty() && field != v => {
            *field = v.to_string();
            true
        }
        _ => false,
    }
}

/// Fields for a company that has not been stored yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub country_of_origin: String,
    #[serde(default)]
    pub economic_sector: String,
    #[serde(skip)]
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl NewCompany {
    /// Build a new company from a candidate, missing fields left empty
    pub fn from_candidate(record: &CandidateRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone().unwrap_or_default(),
            country_of_origin: record.country_of_origin.clone().unwrap_or_default(),
            economic_sector: record.economic_sector.clone().unwrap_or_default(),
            last_fetched_at: None,
        }
    }

    /// Attach the company id assigned by a store
    pub fn into_company(self, id: i64) -> Company {
        Company {
            id,
            name: self.name,
            description: self.description,
            country_of_origin: self.country_of_origin,
            economic_sector: self.economic_sector,
            last_fetched_at: self.last_fetched_at,
        }
    }

    /// Check the fields required by the API boundary
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Company name cannot be empty.".to_string());
        }
        if self.economic_sector.trim().is_empty() {
            return Err("Economic sector cannot be empty.".to_string());
        }
        Ok(())
    }
}

/// Unpersisted company data produced by a source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub description: Option<String>,
    pub country_of_origin: Option<String>,
    pub economic_sector: Option<String>,
}

impl CandidateRecord {
    /// Create a candidate with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country_of_origin = Some(country.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.economic_sector = Some(sector.into());
        self
    }

    /// Whether the name is usable as an identity key
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// List projection: everything but the description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: i64,
    pub name: String,
    pub country_of_origin: String,
    pub economic_sector: String,
}

impl From<&Company> for CompanySummary {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            country_of_origin: company.country_of_origin.clone(),
            economic_sector: company.economic_sector.clone(),
        }
    }
}

/// Number of companies sharing one field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Aggregate figures over all stored companies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyStats {
    pub total_companies: usize,
    pub companies_by_country: Vec<ValueCount>,
    pub companies_by_sector: Vec<ValueCount>,
    pub recent_companies: Vec<CompanySummary>,
    pub unique_countries: usize,
    pub unique_sectors: usize,
}

impl CompanyStats {
    /// Number of recent companies included in the stats
    pub const RECENT: usize = 5;

    /// Compute stats from a full listing of companies
    pub fn from_companies(companies: &[Company]) -> Self {
        let companies_by_country = count_by(companies, |c| &c.country_of_origin);
        let companies_by_sector = count_by(companies, |c| &c.economic_sector);

        let mut recent: Vec<&Company> = companies.iter().collect();
        recent.sort_by(|a, b| b.id.cmp(&a.id));

        Self {
            total_companies: companies.len(),
            unique_countries: companies_by_country.len(),
            unique_sectors: companies_by_sector.len(),
            companies_by_country,
            companies_by_sector,
            recent_companies: recent
                .into_iter()
                .take(Self::RECENT)
                .map(CompanySummary::from)
                .collect(),
        }
    }
}

fn count_by<F>(companies: &[Company], field: F) -> Vec<ValueCount>
where
    F: Fn(&Company) -> &String,
{
    let mut counts: Vec<ValueCount> = Vec::new();
    for company in companies {
        let value = field(company);
        match counts.iter_mut().find(|c| &c.value == value) {
            Some(entry) => entry.count += 1,
            None => counts.push(ValueCount {
                value: value.clone(),
                count: 1,
            }),
        }
    }
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
