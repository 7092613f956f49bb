//! Sector normalization and country inference helpers

use crate::config::SectorRule;

/// Keyword table mapping free-form categories onto canonical sectors
#[derive(Debug, Clone)]
pub struct SectorTable {
    rules: Vec<SectorRule>,
    default: String,
}

impl SectorTable {
    /// Build a table; keywords are lowercased, order is kept
    pub fn new(rules: &[SectorRule], default: impl Into<String>) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| SectorRule::new(r.keyword.to_lowercase(), r.sector.clone()))
                .collect(),
            default: default.into(),
        }
    }

    /// Put adapter-specific rules ahead of the shared ones
    pub fn with_leading(mut self, rules: &[(&str, &str)]) -> Self {
        let mut leading: Vec<SectorRule> = rules
            .iter()
            .map(|(k, s)| SectorRule::new(k.to_lowercase(), *s))
            .collect();
        leading.append(&mut self.rules);
        self.rules = leading;
        self
    }

    /// Sector of the first keyword found in `category`, else the default
    pub fn normalize(&self, category: &str) -> String {
        let category = category.to_lowercase();
        self.rules
            .iter()
            .find(|r| category.contains(&r.keyword))
            .map(|r| r.sector.clone())
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn default_sector(&self) -> &str {
        &self.default
    }
}

/// Country for an OpenCorporates-style jurisdiction code
pub fn country_from_jurisdiction(code: &str) -> Option<&'static str> {
    const JURISDICTIONS: [(&str, &str); 7] = [
        ("us_", "United States"),
        ("gb", "United Kingdom"),
        ("ca_", "Canada"),
        ("de", "Germany"),
        ("fr", "France"),
        ("au_", "Australia"),
        ("jp", "Japan"),
    ];

    let code = code.to_lowercase();
    JURISDICTIONS
        .iter()
        .find(|(prefix, _)| code.starts_with(prefix))
        .map(|(_, country)| *country)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_first_match_wins() {
        let table = SectorTable::new(&Settings::default().sectors, "Unknown");
        assert_eq!(table.normalize("Fintech startup"), "Finance");
        assert_eq!(table.normalize("Biotechnology"), "Healthcare");
        assert_eq!(table.normalize("Software Development"), "Technology");
        assert_eq!(table.normalize("Retail stores"), "Retail");
        assert_eq!(table.normalize("Plumbing"), "Unknown");
    }

    #[test]
    fn test_leading_rules() {
        let table = SectorTable::new(&Settings::default().sectors, "Services")
            .with_leading(&[("restaurant", "Food & Beverage")]);
        assert_eq!(table.normalize("Restaurants"), "Food & Beverage");
        assert_eq!(table.normalize("Lawyers"), "Services");
    }

    #[test]
    fn test_jurisdictions() {
        assert_eq!(country_from_jurisdiction("us_de"), Some("United States"));
        assert_eq!(country_from_jurisdiction("GB"), Some("United Kingdom"));
        assert_eq!(country_from_jurisdiction("ca_bc"), Some("Canada"));
        assert_eq!(country_from_jurisdiction("nl"), None);
        assert_eq!(country_from_jurisdiction(""), None);
    }
}
