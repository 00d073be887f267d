//! 커밋 게이트.
//! 파괴적인 연산 이전에 충돌/스태시/미커밋 변경을 정리한다. 깨끗한 트리에서는
//! 몇 번을 다시 불러도 아무 일도 하지 않는다.

use anyhow::Result;

use crate::domain::error::FlowError;

use super::PublishFlowUseCase;

/// 게이트 전체: 충돌 검사 -> 스태시 복구 -> 미커밋 변경 커밋.
pub(super) async fn ensure_clean(flow: &PublishFlowUseCase<'_>) -> Result<()> {
    check_conflicts(flow).await?;
    recover_stash(flow).await?;
    commit_outstanding(flow).await
}

/// 충돌 경로가 하나라도 있으면 치명 오류. 자동 해소는 하지 않는다.
pub(super) async fn check_conflicts(flow: &PublishFlowUseCase<'_>) -> Result<()> {
    let status = flow.git.status().await?;
    if !status.conflicted.is_empty() {
        return Err(FlowError::ConflictDetected {
            paths: status.conflicted,
        }
        .into());
    }
    flow.reporter.status("gate", "no merge conflicts");
    Ok(())
}

/// 스태시 항목이 있으면 최근 것을 복구해 작업 트리로 되돌린다.
async fn recover_stash(flow: &PublishFlowUseCase<'_>) -> Result<()> {
    if flow.git.stash_count().await? == 0 {
        return Ok(());
    }
    flow.git.stash_pop().await?;
    flow.reporter.warn(
        "gate",
        "stash entry popped; recovered work will be part of the next commit",
    );
    Ok(())
}

/// 남은 변경을 전부 스테이징하고, 비어 있지 않은 메시지를 받을 때까지 물은 뒤 커밋한다.
async fn commit_outstanding(flow: &PublishFlowUseCase<'_>) -> Result<()> {
    let status = flow.git.status().await?;
    if !status.is_dirty() {
        return Ok(());
    }

    flow.git.stage(&status.dirty_paths()).await?;

    let mut message = String::new();
    while message.trim().is_empty() {
        message = flow.prompter.input("Enter a commit message")?;
    }
    flow.git.commit(message.trim()).await?;
    flow.reporter.success("gate", "outstanding changes committed");
    Ok(())
}
