//! Gitee API 연동 구현.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::json;

use crate::application::ports::HostingGateway;
use crate::domain::hosting::{ProviderKind, RemoteOrg, RemoteRepo, RemoteUser};

use super::{OrgResponse, REQUEST_TIMEOUT, RepoResponse, UserResponse};

const API_BASE: &str = "https://gitee.com/api/v5";

pub struct GiteeClient {
    client: Client,
    token: String,
}

impl GiteeClient {
    pub fn new(token: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, token }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        // Gitee는 access_token 쿼리 파라미터로 인증한다.
        self.client
            .request(method, format!("{API_BASE}{path}"))
            .header("User-Agent", "shippilot")
            .query(&[("access_token", self.token.as_str())])
    }

    async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>> {
        let resp = self
            .request(Method::GET, path)
            .send()
            .await
            .with_context(|| format!("gitee: request to {path} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "gitee: read request failed");
            return Ok(None);
        }

        let value = resp
            .json()
            .await
            .with_context(|| format!("gitee: invalid JSON from {path}"))?;
        Ok(Some(value))
    }

    async fn post_repo(&self, path: &str, body: serde_json::Value) -> Result<RemoteRepo> {
        let resp = self
            .request(Method::POST, path)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("gitee: request to {path} failed"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("gitee: failed to read create-repo body")?;
        if !status.is_success() {
            anyhow::bail!("gitee: repository creation failed ({status}): {text}");
        }

        let repo: RepoResponse =
            serde_json::from_str(&text).context("gitee: invalid create-repo JSON")?;
        Ok(repo.into())
    }
}

#[async_trait]
impl HostingGateway for GiteeClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gitee
    }

    async fn fetch_user(&self) -> Result<Option<RemoteUser>> {
        Ok(self
            .get_optional::<UserResponse>("/user")
            .await?
            .map(Into::into))
    }

    async fn fetch_orgs(&self, login: &str) -> Result<Option<Vec<RemoteOrg>>> {
        let orgs = self
            .get_optional::<Vec<OrgResponse>>(&format!(
                "/users/{login}/orgs?page=1&per_page=100"
            ))
            .await?;
        Ok(orgs.map(|list| list.into_iter().map(Into::into).collect()))
    }

    async fn fetch_repo(&self, login: &str, name: &str) -> Result<Option<RemoteRepo>> {
        Ok(self
            .get_optional::<RepoResponse>(&format!("/repos/{login}/{name}"))
            .await?
            .map(Into::into))
    }

    async fn create_user_repo(&self, name: &str) -> Result<RemoteRepo> {
        self.post_repo("/user/repos", json!({ "name": name })).await
    }

    async fn create_org_repo(&self, name: &str, org: &str) -> Result<RemoteRepo> {
        // Gitee는 본문에도 조직 로그인을 요구한다.
        self.post_repo(&format!("/orgs/{org}/repos"), json!({ "name": name, "org": org }))
            .await
    }

    fn remote_url(&self, login: &str, name: &str) -> String {
        format!("git@gitee.com:{login}/{name}.git")
    }
}
