//! 버전/브랜치 협상 규칙.
//! 원격 release 태그와 로컬 매니페스트 버전을 비교해 다음 버전과 작업 브랜치를 결정한다.

use std::path::PathBuf;

use semver::Version;

/// 출시된 버전을 가리키는 원격 태그 접두사.
pub const RELEASE_TAG_PREFIX: &str = "refs/tags/release/";
/// 진행 중 작업을 담는 원격 개발 브랜치 접두사.
pub const DEV_BRANCH_PREFIX: &str = "refs/heads/dev/";

/// publish 실행 옵션.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dir: PathBuf,
    pub prod: bool,
    pub build_command: Option<String>,
    pub git_only: bool,
    pub refresh_provider: bool,
    pub refresh_token: bool,
    pub refresh_owner: bool,
}

/// 협상이 끝난 뒤의 릴리스 상태. 작업 브랜치는 항상 `dev/<version>`이다.
#[derive(Debug, Clone)]
pub struct ReleaseState {
    pub branch: String,
    pub version: Version,
}

impl ReleaseState {
    pub fn new(version: Version) -> Self {
        Self {
            branch: dev_branch(&version),
            version,
        }
    }
}

pub fn dev_branch(version: &Version) -> String {
    format!("dev/{version}")
}

/// 버전 증가 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    pub const ALL: [BumpKind; 3] = [BumpKind::Patch, BumpKind::Minor, BumpKind::Major];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

/// 표준 semver 증가 규칙. pre-release/build 메타데이터는 버린다.
pub fn increment(base: &Version, kind: BumpKind) -> Version {
    match kind {
        BumpKind::Patch => Version::new(base.major, base.minor, base.patch + 1),
        BumpKind::Minor => Version::new(base.major, base.minor + 1, 0),
        BumpKind::Major => Version::new(base.major + 1, 0, 0),
    }
}

/// `git ls-remote --refs` 출력에서 접두사가 일치하는 유효 semver를 뽑아 내림차순으로 돌려준다.
/// 첫 원소가 항상 최신 버전이 되도록 정렬한다. semver로 해석되지 않는 참조와
/// pre-release/build 메타데이터가 붙은 참조는 전부 버린다. 출시 참조는 항상 `x.y.z` 꼴이다.
pub fn extract_versions(ls_remote: &str, prefix: &str) -> Vec<Version> {
    let mut versions: Vec<Version> = ls_remote
        .lines()
        .filter_map(|line| {
            let idx = line.find(prefix)?;
            let version: Version = line[idx + prefix.len()..].trim().parse().ok()?;
            (version.pre.is_empty() && version.build.is_empty()).then_some(version)
        })
        .collect();
    versions.sort_by(|a, b| b.cmp(a));
    versions
}

/// 버전 협상 결정 트리의 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionDecision {
    /// 매니페스트 버전을 그대로 쓴다.
    Keep,
    /// 최신 release가 앞서 있으므로 그 버전 기준으로 증가 종류를 물어야 한다.
    Bump { latest: Version },
}

/// 매니페스트 버전과 최신 release 태그를 비교한다.
/// release 태그가 없거나 매니페스트가 이미 앞서 있으면 그대로 두고,
/// 그 외에는 최신 release를 기준으로 증가시킨다.
pub fn plan_next_version(manifest: &Version, latest_release: Option<&Version>) -> VersionDecision {
    match latest_release {
        None => VersionDecision::Keep,
        Some(latest) if manifest > latest => VersionDecision::Keep,
        Some(latest) => VersionDecision::Bump {
            latest: latest.clone(),
        },
    }
}
