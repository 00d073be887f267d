//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::build::BuildRequest;
use crate::domain::hosting::{ProviderKind, RemoteOrg, RemoteRepo, RemoteUser};
use crate::domain::worktree::WorkTreeStatus;
use crate::infrastructure::config::ConfigSlot;

/// 슬롯 단위 캐시 저장소 포트.
/// 슬롯 파일의 존재 자체가 "이미 결정됨"의 근거다.
pub trait SlotStore: Send + Sync {
    /// 캐시 루트를 준비한다. 만들 수 없으면 치명 오류.
    fn ensure_root(&self) -> Result<()>;
    fn read(&self, slot: ConfigSlot) -> Result<Option<String>>;
    /// 값을 그대로 기록한다(덮어쓰기).
    fn write(&self, slot: ConfigSlot, value: &str) -> Result<()>;
    fn root_path(&self) -> String;
}

/// 선택지 프롬프트의 한 항목.
#[derive(Debug, Clone)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// 운영자 입력 포트. 릴리스 흐름 자체는 대화형 I/O를 소유하지 않는다.
pub trait Prompter: Send + Sync {
    /// 선택지 중 하나를 고른다. 반환값은 선택된 항목의 value다.
    fn select(&self, message: &str, choices: &[Choice], default: Option<&str>) -> Result<String>;
    /// 자유 입력 한 줄.
    fn input(&self, message: &str) -> Result<String>;
    /// 토큰류 입력.
    fn secret(&self, message: &str) -> Result<String>;
}

/// 호스팅 제공자(GitHub/Gitee) 연동 포트.
/// 읽기 호출은 비정상 응답을 `None`으로 낮추고, 생성 호출은 오류로 올린다.
#[async_trait]
pub trait HostingGateway: Send + Sync {
    fn kind(&self) -> ProviderKind;
    async fn fetch_user(&self) -> Result<Option<RemoteUser>>;
    async fn fetch_orgs(&self, login: &str) -> Result<Option<Vec<RemoteOrg>>>;
    async fn fetch_repo(&self, login: &str, name: &str) -> Result<Option<RemoteRepo>>;
    async fn create_user_repo(&self, name: &str) -> Result<RemoteRepo>;
    async fn create_org_repo(&self, name: &str, org: &str) -> Result<RemoteRepo>;
    /// clone/push에 쓸 원격 주소.
    fn remote_url(&self, login: &str, name: &str) -> String;
}

/// 저장된 제공자 종류에 맞는 게이트웨이를 생성하는 팩토리 포트.
pub trait HostingFactory: Send + Sync {
    fn build(&self, kind: ProviderKind, token: String) -> Box<dyn HostingGateway>;
}

/// 버전 관리 원시 연산 포트. 구현은 시스템 git에 위임한다.
#[async_trait]
pub trait GitGateway: Send + Sync {
    async fn init(&self) -> Result<()>;
    async fn remotes(&self) -> Result<Vec<String>>;
    async fn add_remote(&self, name: &str, url: &str) -> Result<()>;
    async fn status(&self) -> Result<WorkTreeStatus>;
    async fn stage(&self, paths: &[String]) -> Result<()>;
    async fn commit(&self, message: &str) -> Result<()>;
    async fn stash_count(&self) -> Result<usize>;
    async fn stash_pop(&self) -> Result<()>;
    async fn local_branches(&self) -> Result<Vec<String>>;
    async fn checkout(&self, branch: &str) -> Result<()>;
    async fn checkout_new(&self, branch: &str) -> Result<()>;
    async fn pull(&self, remote: &str, branch: &str, allow_unrelated: bool) -> Result<()>;
    async fn push(&self, remote: &str, branch: &str) -> Result<()>;
    /// `ls-remote --refs` 원문. 태그/브랜치 해석은 도메인 규칙이 맡는다.
    async fn list_remote_refs(&self) -> Result<String>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
    fn success(&self, scope: &str, message: &str);
    fn warn(&self, scope: &str, message: &str);
}

/// 동기화가 끝난 브랜치를 빌드/배포 파이프라인에 넘기는 포트.
#[async_trait]
pub trait BuildExecutor: Send + Sync {
    async fn run(&self, request: &BuildRequest) -> Result<()>;
}
