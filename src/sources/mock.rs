//! Demonstration source backed by the JSONPlaceholder users API

use super::traits::*;
use crate::companies::CandidateRecord;
use crate::network::HttpClient;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Duration;

const SECTORS: [&str; 8] = [
    "Technology",
    "Finance",
    "Healthcare",
    "Manufacturing",
    "Retail",
    "Energy",
    "Transportation",
    "Education",
];

#[derive(Debug, Deserialize)]
struct User {
    name: String,
    #[serde(default)]
    company: Option<UserCompany>,
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct UserCompany {
    name: Option<String>,
    #[serde(rename = "catchPhrase")]
    catch_phrase: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Address {
    city: Option<String>,
}

/// Turns placeholder users into companies with a random sector
pub struct MockApi {
    client: HttpClient,
    base_url: String,
    timeout: Option<Duration>,
}

impl MockApi {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn to_record(user: User) -> CandidateRecord {
        let company = user.company.unwrap_or(UserCompany {
            name: None,
            catch_phrase: None,
        });
        let name = company
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("{} Corp", user.name));
        let sector = SECTORS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Technology");

        CandidateRecord::new(name)
            .with_description(
                company
                    .catch_phrase
                    .unwrap_or_else(|| "An innovative company".to_string()),
            )
            .with_country(
                user.address
                    .and_then(|a| a.city)
                    .unwrap_or_else(|| "Unknown".to_string()),
            )
            .with_sector(sector)
    }
}

#[async_trait]
impl Source for MockApi {
    fn name(&self) -> &str {
        "mock"
    }

    fn about(&self) -> SourceAbout {
        SourceAbout::new()
            .website("https://jsonplaceholder.typicode.com")
            .official_api(true)
            .results_format("JSON")
    }

    async fn fetch_records(
        &self,
        _query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, FetchError> {
        let url = format!("{}/users", self.base_url.trim_end_matches('/'));
        let response = self.client.get_json(&url, &[], self.timeout).await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        let users: Vec<User> = response.json()?;
        Ok(users.into_iter().take(limit).map(Self::to_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USERS: &str = r#"[
        {"name": "Leanne Graham", "address": {"city": "Gwenborough"},
         "company": {"name": "Romaguera-Crona", "catchPhrase": "Multi-layered client-server neural-net"}},
        {"name": "Ervin Howell", "address": {"city": "Wisokyburgh"}},
        {"name": "Clementine Bauch", "company": {"name": "Romaguera-Jacobson"}}
    ]"#;

    async fn source_for(server: &MockServer) -> MockApi {
        MockApi::new(HttpClient::new().unwrap()).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_maps_users_to_companies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USERS))
            .mount(&server)
            .await;

        let records = source_for(&server).await.fetch(None, 10).await;
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].name, "Romaguera-Crona");
        assert_eq!(records[0].country_of_origin.as_deref(), Some("Gwenborough"));
        assert!(SECTORS.contains(&records[0].economic_sector.as_deref().unwrap()));

        assert_eq!(records[1].name, "Ervin Howell Corp");
        assert_eq!(
            records[1].description.as_deref(),
            Some("An innovative company")
        );
        assert_eq!(records[2].country_of_origin.as_deref(), Some("Unknown"));
    }

    #[tokio::test]
    async fn test_respects_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USERS))
            .mount(&server)
            .await;

        assert_eq!(source_for(&server).await.fetch(None, 2).await.len(), 2);
    }

    #[tokio::test]
    async fn test_http_error_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(source_for(&server).await.fetch(None, 5).await.is_empty());
    }
}
