//! 동기화 단계.
//! 작업 브랜치로 전환한 뒤 원격 기본 브랜치, 그리고 (있다면) 같은 버전의 원격 개발
//! 브랜치를 차례로 병합하고 작업 브랜치를 푸시한다. 기본 브랜치 병합이 항상 먼저라서
//! 기본 브랜치 충돌이 개발 브랜치 변경에 가려지지 않는다.

use anyhow::Result;

use crate::domain::release::{DEV_BRANCH_PREFIX, ReleaseState, extract_versions};

use super::{PublishFlowUseCase, commit_gate};

const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_BRANCH: &str = "master";

pub(super) async fn run(flow: &PublishFlowUseCase<'_>, state: &ReleaseState) -> Result<()> {
    flow.reporter.section("Sync");

    checkout_working_branch(flow, &state.branch).await?;

    pull_soft(flow, DEFAULT_BRANCH).await;
    commit_gate::check_conflicts(flow).await?;

    // 같은 버전의 원격 개발 브랜치만 병합 후보다. 다른 버전의 묵은 dev 브랜치는 무시한다.
    let refs = flow.git.list_remote_refs().await?;
    let remote_devs = extract_versions(&refs, DEV_BRANCH_PREFIX);
    if remote_devs.contains(&state.version) {
        pull_soft(flow, &state.branch).await;
        commit_gate::check_conflicts(flow).await?;
    }

    flow.git.push(DEFAULT_REMOTE, &state.branch).await?;
    flow.reporter
        .success("git", &format!("pushed {} to {DEFAULT_REMOTE}", state.branch));
    Ok(())
}

async fn checkout_working_branch(flow: &PublishFlowUseCase<'_>, branch: &str) -> Result<()> {
    let locals = flow.git.local_branches().await?;
    if locals.iter().any(|b| b == branch) {
        flow.git.checkout(branch).await?;
    } else {
        flow.git.checkout_new(branch).await?;
    }
    flow.reporter.status("git", &format!("switched to {branch}"));
    Ok(())
}

/// 병합 실패는 경고로 낮춘다. 충돌은 바로 다음 충돌 검사에서 잡힌다.
async fn pull_soft(flow: &PublishFlowUseCase<'_>, branch: &str) {
    flow.reporter
        .status("git", &format!("merging {DEFAULT_REMOTE}/{branch}"));
    if let Err(err) = flow.git.pull(DEFAULT_REMOTE, branch, false).await {
        flow.reporter.warn("git", &format!("pull {branch}: {err:#}"));
    }
}
