//! 호스팅 제공자 연동 계층.
//! GitHub/Gitee별 REST 구현을 공통 포트로 묶는다. 두 변형은 베이스 주소,
//! 인증 전달 방식, 조직 저장소 생성 요청 모양만 다르다.

pub mod gitee;
pub mod github;

use std::time::Duration;

use serde::Deserialize;

use crate::application::ports::HostingGateway;
use crate::domain::hosting::{ProviderKind, RemoteOrg, RemoteRepo, RemoteUser};

/// 제공자 호출이 무한정 매달리지 않도록 요청 단위 제한을 둔다. 초과는 실패이며 재시도하지 않는다.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// 저장된 제공자 종류에 맞는 클라이언트를 만든다.
pub fn build_hosting_client(kind: ProviderKind, token: String) -> Box<dyn HostingGateway> {
    match kind {
        ProviderKind::Github => Box::new(github::GitHubClient::new(token)),
        ProviderKind::Gitee => Box::new(gitee::GiteeClient::new(token)),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrgResponse {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepoResponse {
    pub name: String,
    pub full_name: Option<String>,
}

impl From<UserResponse> for RemoteUser {
    fn from(raw: UserResponse) -> Self {
        Self { login: raw.login }
    }
}

impl From<OrgResponse> for RemoteOrg {
    fn from(raw: OrgResponse) -> Self {
        Self { login: raw.login }
    }
}

impl From<RepoResponse> for RemoteRepo {
    fn from(raw: RepoResponse) -> Self {
        Self {
            name: raw.name,
            full_name: raw.full_name,
        }
    }
}
