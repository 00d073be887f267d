//! 빌드 명령 검증 정책과 빌드 실행기 전달 페이로드.

use anyhow::Result;
use serde::Serialize;

use crate::domain::error::FlowError;
use crate::domain::hosting::{OwnerKind, ProviderKind};
use crate::domain::project::RepoTarget;

/// 허용되는 패키지 매니저 호출. 첫 토큰이 여기에 없으면 빌드 명령을 거부한다.
pub const ALLOWED_BUILD_TOOLS: &[&str] = &["npm", "cnpm", "pnpm"];
pub const DEFAULT_BUILD_COMMAND: &str = "npm run build";
/// 기본 업로드 대상.
pub const DEFAULT_PUBLISH_TARGET: &str = "oss";

/// 운영자가 넘긴 빌드 명령을 검증하고 토큰 열로 정규화한다.
/// 미지정이면 기본 명령을 쓴다. 마지막 토큰은 매니페스트에 선언된 스크립트여야 한다.
pub fn resolve_build_command(raw: Option<&str>, target: &RepoTarget) -> Result<Vec<String>> {
    let command = raw
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_BUILD_COMMAND);

    let tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();

    let first = tokens.first().map(String::as_str).unwrap_or_default();
    if !ALLOWED_BUILD_TOOLS.contains(&first) {
        return Err(FlowError::IllegalBuildCommand {
            command: command.to_string(),
            allowed: ALLOWED_BUILD_TOOLS.to_vec(),
        }
        .into());
    }

    // 마지막 토큰이 실행될 스크립트 이름이다.
    let script = tokens.last().map(String::as_str).unwrap_or_default();
    if !target.has_script(script) {
        return Err(FlowError::UnknownBuildScript {
            command: command.to_string(),
            script: script.to_string(),
        }
        .into());
    }

    Ok(tokens)
}

/// 빌드 실행기에 넘기는 직렬화 페이로드. 이 경계 너머로 메모리를 공유하지 않는다.
#[derive(Debug, Clone, Serialize)]
pub struct BuildRequest {
    pub provider: ProviderKind,
    pub owner: OwnerKind,
    pub login: String,
    pub project: String,
    pub version: String,
    pub branch: String,
    pub build_command: Vec<String>,
    pub publish_target: String,
    pub prod: bool,
}
