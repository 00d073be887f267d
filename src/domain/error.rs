//! 릴리스 흐름을 즉시 중단시키는 치명 오류 분류.
//! 모든 변형은 재시도 없이 흐름 전체를 종료시키며, 상위에서 `anyhow`로 전파된다.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    /// 캐시 루트가 없거나 만들 수 없는 경우. 캐시는 재진입 멱등성의 근거라 선행 조건으로 취급한다.
    #[error("cache root is unavailable: {path}")]
    CacheRootUnavailable { path: PathBuf },

    /// 저장된 토큰으로 사용자 조회가 실패한 경우.
    #[error("authentication failed: could not fetch the {provider} user with the stored token")]
    AuthenticationFailed { provider: String },

    /// 조직 목록 조회가 실패한 경우.
    #[error("organization lookup failed for {provider} user '{login}'")]
    OrgLookupFailed { provider: String, login: String },

    /// 원격 저장소가 없고 생성까지 실패한 경우.
    #[error("remote repository creation failed for '{name}'")]
    RemoteCreateFailed { name: String },

    /// 작업 트리에 미해결 충돌이 남아 있는 경우. 수동 해결 후 재실행해야 한다.
    #[error("working tree has unresolved conflicts ({paths:?}); resolve them manually and retry")]
    ConflictDetected { paths: Vec<String> },

    /// 허용 목록에 없는 빌드 명령이 주어진 경우.
    #[error("illegal build command '{command}': the first token must be one of {allowed:?}")]
    IllegalBuildCommand {
        command: String,
        allowed: Vec<&'static str>,
    },

    /// 빌드 명령의 마지막 토큰이 매니페스트 스크립트에 없는 경우.
    #[error("build command '{command}' does not exist: no '{script}' script in the project manifest")]
    UnknownBuildScript { command: String, script: String },

    /// 매니페스트에 name/version/build 스크립트가 없는 경우.
    #[error("project manifest at {path} is incomplete: it must declare name, version and a build script")]
    ManifestIncomplete { path: PathBuf },
}
