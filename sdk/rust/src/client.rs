use reqwest::{Client, StatusCode};

pub struct ConfigClient {
    client: Client,
    api_url: String,
}

impl ConfigClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Names of all stored configurations.
    pub async fn list_configs(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let resp = self.client
            .get(format!("{}/configs", self.api_url))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("API returned error status {}: {}", status, resp.text().await?).into());
        }
        Ok(resp.json().await?)
    }

    /// Fetch a stored document. `Ok(None)` when the name is unknown.
    pub async fn get_config(&self, name: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let resp = self.client
            .get(format!("{}/configs/{}", self.api_url, name))
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("API returned error status {}: {}", status, text).into());
        }
        Ok(Some(text))
    }

    /// Validate and store a new document under `name`.
    pub async fn save_config(&self, name: &str, document: &str) -> Result<(), Box<dyn std::error::Error>> {
        let resp = self.client
            .post(format!("{}/configs", self.api_url))
            .query(&[("name", name)])
            .body(document.to_string())
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            return Err(format!("API returned error status {}: {}", status, resp.text().await?).into());
        }
        Ok(())
    }

    /// Delete a stored document.
    pub async fn delete_config(&self, name: &str) -> Result<(), Box<dyn std::error::Error>> {
        let resp = self.client
            .delete(format!("{}/configs", self.api_url))
            .query(&[("name", name)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("API returned error status {}: {}", status, resp.text().await?).into());
        }
        Ok(())
    }
}
