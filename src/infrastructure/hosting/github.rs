//! GitHub API 연동 구현.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::json;

use crate::application::ports::HostingGateway;
use crate::domain::hosting::{ProviderKind, RemoteOrg, RemoteRepo, RemoteUser};

use super::{OrgResponse, REQUEST_TIMEOUT, RepoResponse, UserResponse};

const API_BASE: &str = "https://api.github.com";

pub struct GitHubClient {
    client: Client,
    token: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, token }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        // 공통 헤더/인증 적용. GitHub은 Authorization 헤더로 토큰을 받는다.
        self.client
            .request(method, format!("{API_BASE}{path}"))
            .header("User-Agent", "shippilot")
            .header("Authorization", format!("token {}", self.token))
    }

    /// 읽기 호출 공통 처리: 비정상 응답은 None으로 낮춘다.
    async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>> {
        let resp = self
            .request(Method::GET, path)
            .send()
            .await
            .with_context(|| format!("github: request to {path} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "github: read request failed");
            return Ok(None);
        }

        let value = resp
            .json()
            .await
            .with_context(|| format!("github: invalid JSON from {path}"))?;
        Ok(Some(value))
    }

    async fn post_repo(&self, path: &str, body: serde_json::Value) -> Result<RemoteRepo> {
        let resp = self
            .request(Method::POST, path)
            .header("Accept", "application/vnd.github.v3+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("github: request to {path} failed"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("github: failed to read create-repo body")?;
        if !status.is_success() {
            anyhow::bail!("github: repository creation failed ({status}): {text}");
        }

        let repo: RepoResponse =
            serde_json::from_str(&text).context("github: invalid create-repo JSON")?;
        Ok(repo.into())
    }
}

#[async_trait]
impl HostingGateway for GitHubClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Github
    }

    async fn fetch_user(&self) -> Result<Option<RemoteUser>> {
        Ok(self
            .get_optional::<UserResponse>("/user")
            .await?
            .map(Into::into))
    }

    async fn fetch_orgs(&self, _login: &str) -> Result<Option<Vec<RemoteOrg>>> {
        let orgs = self
            .get_optional::<Vec<OrgResponse>>("/user/orgs?page=1&per_page=100")
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
        self.post_repo(&format!("/orgs/{org}/repos"), json!({ "name": name }))
            .await
    }

    fn remote_url(&self, login: &str, name: &str) -> String {
        format!("git@github.com:{login}/{name}.git")
    }
}
