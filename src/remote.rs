use anyhow::{Context, Result};

use crate::model::{Category, RemoteConfig};

pub struct RemoteClient {
    remote: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(remote: RemoteConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("favdash")
            .build()
            .context("build reqwest client")?;
        Ok(Self { remote, client })
    }

    pub fn remote(&self) -> &RemoteConfig {
        &self.remote
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.remote.base_url, path)
    }

    fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!(
                "unauthorized (token invalid/expired; run `favdash login --url ... --email ...`)"
            );
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }

    /// Login exchange: posts the configured identity, returns the bearer
    /// token from the response.
    pub fn login(&self, senha: &str) -> Result<String> {
        let resp = self
            .client
            .post(self.url("/usuarios/login"))
            .json(&serde_json::json!({
                "email": self.remote.email,
                "senha": senha,
            }))
            .send()
            .context("login request")?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!("login rejected (check email and senha)");
        }

        let body: serde_json::Value = resp
            .error_for_status()
            .context("login status")?
            .json()
            .context("parse login response")?;

        let token = body
            .get("token")
            .and_then(|v| v.as_str())
            .context("login response missing token")?;
        Ok(token.to_string())
    }

    /// Authenticated fetch of the engagement dataset.
    pub fn fetch_categories(&self, token: &str) -> Result<Vec<Category>> {
        let resp = self
            .client
            .get(self.url("/ofertas/categorias-mais-engajadas"))
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .context("fetch categories")?;

        let body: serde_json::Value = self
            .ensure_ok(resp, "fetch categories")?
            .json()
            .context("parse categories response")?;

        parse_categories(body)
    }
}

/// The backend contract is a JSON array of `{nome, favoritos}` objects.
/// Anything else is rejected before element decoding.
pub fn parse_categories(body: serde_json::Value) -> Result<Vec<Category>> {
    if !body.is_array() {
        anyhow::bail!("categories response is not an array");
    }
    serde_json::from_value(body).context("decode category records")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_record_arrays() -> Result<()> {
        let got = parse_categories(serde_json::json!([
            {"nome": "Moda", "favoritos": 10},
            {"nome": "Beleza", "favoritos": 30},
        ]))?;
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].name, "Moda");
        assert_eq!(got[1].favorites, 30);
        Ok(())
    }

    #[test]
    fn parse_rejects_non_arrays_without_panicking() {
        assert!(parse_categories(serde_json::json!({"erro": "nope"})).is_err());
        assert!(parse_categories(serde_json::Value::Null).is_err());
        assert!(parse_categories(serde_json::json!("categorias")).is_err());
    }

    #[test]
    fn parse_accepts_empty_arrays() -> Result<()> {
        assert!(parse_categories(serde_json::json!([]))?.is_empty());
        Ok(())
    }
}
