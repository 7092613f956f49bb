//! Filtering and ordering of stored companies

use super::types::Company;
use serde::{Deserialize, Serialize};

/// Query filter over stored companies
///
/// Substring filters are case-insensitive, `*_exact` filters compare the
/// whole value, and the plural filters accept a comma-separated list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub country: Option<String>,
    pub sector: Option<String>,
    pub description: Option<String>,
    pub country_exact: Option<String>,
    pub sector_exact: Option<String>,
    pub countries: Option<String>,
    pub sectors: Option<String>,
    /// Free text search over every text field
    pub search: Option<String>,
    /// Field to order by, `-` prefix for descending
    pub ordering: Option<String>,
}

impl CompanyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter matching any company mentioning `text`
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }

    /// Check whether a company passes every configured filter
    pub fn matches(&self, company: &Company) -> bool {
        contains(&company.name, &self.name)
            && contains(&company.country_of_origin, &self.country)
            && contains(&company.economic_sector, &self.sector)
            && contains(&company.description, &self.description)
            && exact(&company.country_of_origin, &self.country_exact)
            && exact(&company.economic_sector, &self.sector_exact)
            && one_of(&company.country_of_origin, &self.countries)
            && one_of(&company.economic_sector, &self.sectors)
            && self.matches_search(company)
    }

    fn matches_search(&self, company: &Company) -> bool {
        let Some(text) = non_empty(&self.search) else {
            return true;
        };
        let text = text.to_lowercase();
        [
            &company.name,
            &company.description,
            &company.country_of_origin,
            &company.economic_sector,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&text))
    }

    /// Parsed ordering, defaulting to ascending by name
    pub fn order(&self) -> Ordering {
        non_empty(&self.ordering)
            .and_then(Ordering::parse)
            .unwrap_or_default()
    }

    /// Filter and sort a listing of companies
    pub fn apply(&self, companies: impl IntoIterator<Item = Company>) -> Vec<Company> {
        let mut matched: Vec<Company> = companies
            .into_iter()
            .filter(|c| self.matches(c))
            .collect();
        self.order().sort(&mut matched);
        matched
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains(field: &str, needle: &Option<String>) -> bool {
    match non_empty(needle) {
        Some(n) => field.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}

fn exact(field: &str, value: &Option<String>) -> bool {
    match non_empty(value) {
        Some(v) => field == v,
        None => true,
    }
}

fn one_of(field: &str, list: &Option<String>) -> bool {
    match non_empty(list) {
        Some(list) => list.split(',').map(str::trim).any(|v| v == field),
        None => true,
    }
}

/// Orderable company fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingField {
    Id,
    #[default]
    Name,
    Country,
    Sector,
}

/// Sort order for company listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ordering {
    pub field: OrderingField,
    pub descending: bool,
}

impl Ordering {
    /// Parse `name`, `-id`, `country_of_origin`, ...
    pub fn parse(value: &str) -> Option<Self> {
        let (descending, column) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        let field = match column {
            "id" => OrderingField::Id,
            "name" => OrderingField::Name,
            "country_of_origin" => OrderingField::Country,
            "economic_sector" => OrderingField::Sector,
            _ => return None,
        };
        Some(Self { field, descending })
    }

    pub fn sort(&self, companies: &mut [Company]) {
        companies.sort_by(|a, b| {
            let ord = match self.field {
                OrderingField::Id => a.id.cmp(&b.id),
                OrderingField::Name => a.name.cmp(&b.name),
                OrderingField::Country => a.country_of_origin.cmp(&b.country_of_origin),
                OrderingField::Sector => a.economic_sector.cmp(&b.economic_sector),
            }
            .then(a.id.cmp(&b.id));
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(id: i64, name: &str, country: &str, sector: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            country_of_origin: country.to_string(),
            economic_sector: sector.to_string(),
            last_fetched_at: None,
        }
    }

    fn fixtures() -> Vec<Company> {
        vec![
            company(1, "TechNova Solutions", "United States", "Technology"),
            company(2, "GreenEnergy Corp", "Germany", "Energy"),
            company(3, "FinanceFlow Ltd", "United Kingdom", "Finance"),
        ]
    }

    #[test]
    fn test_default_orders_by_name() {
        let names: Vec<_> = CompanyFilter::new()
            .apply(fixtures())
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec!["FinanceFlow Ltd", "GreenEnergy Corp", "TechNova Solutions"]
        );
    }

    #[test]
    fn test_substring_and_exact_filters() {
        let filter = CompanyFilter {
            country: Some("united".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(fixtures()).len(), 2);

        let filter = CompanyFilter {
            country_exact: Some("united".to_string()),
            ..Default::default()
        };
        assert!(filter.apply(fixtures()).is_empty());
    }

    #[test]
    fn test_membership_filter() {
        let filter = CompanyFilter {
            sectors: Some("Energy, Finance".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(fixtures()).len(), 2);
    }

    #[test]
    fn test_search_and_descending_order() {
        let filter = CompanyFilter::search("corp").with_ordering("-id");
        let results = filter.apply(fixtures());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 2);

        let ids: Vec<_> = CompanyFilter::new()
            .with_ordering("-id")
            .apply(fixtures())
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_unknown_ordering_falls_back_to_name() {
        let filter = CompanyFilter::new().with_ordering("revenue");
        assert_eq!(filter.order(), Ordering::default());
    }
}
