//! 호스팅 제공자 도메인 어휘(제공자 종류/소유 형태/원격 계정 값 객체).

use anyhow::{Result, bail};
use serde::Serialize;

/// 릴리스 대상 코드를 호스팅하는 플랫폼 종류.
/// 캐시 슬롯에 저장된 문자열 값으로 선택된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Github,
    Gitee,
}

impl ProviderKind {
    /// 캐시 슬롯에 기록되는 코드값.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitee => "gitee",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Github => "Github",
            Self::Gitee => "Gitee",
        }
    }

    /// 개인 액세스 토큰 발급 안내 페이지.
    pub fn token_help_url(self) -> &'static str {
        match self {
            Self::Github => "https://github.com/settings/tokens",
            Self::Gitee => "https://gitee.com/personal_access_tokens",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "github" => Ok(Self::Github),
            "gitee" => Ok(Self::Gitee),
            other => bail!("unknown hosting provider kind '{other}'"),
        }
    }
}

/// 원격 저장소가 개인 계정 아래인지 조직 아래인지.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    User,
    Org,
}

impl OwnerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Org => "org",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "user" => Ok(Self::User),
            "org" => Ok(Self::Org),
            other => bail!("unknown owner kind '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteUser {
    pub login: String,
}

#[derive(Debug, Clone)]
pub struct RemoteOrg {
    pub login: String,
}

#[derive(Debug, Clone)]
pub struct RemoteRepo {
    pub name: String,
    pub full_name: Option<String>,
}

/// 한 번의 릴리스 실행 동안 부트스트랩이 소유하는 제공자 세션.
/// 토큰이 비어 있으면 어떤 제공자 호출도 보내면 안 된다.
#[derive(Debug, Clone)]
pub struct HostingSession {
    pub kind: ProviderKind,
    pub token: String,
    pub user: RemoteUser,
    pub orgs: Vec<RemoteOrg>,
    pub owner: OwnerKind,
    pub login: String,
}
