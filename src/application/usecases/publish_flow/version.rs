//! 버전/브랜치 결정 단계.
//! 원격 release 태그와 매니페스트 버전을 비교해 작업 브랜치 `dev/<version>`을 확정한다.

use anyhow::{Result, bail};

use crate::application::ports::Choice;
use crate::domain::project::RepoTarget;
use crate::domain::release::{
    BumpKind, RELEASE_TAG_PREFIX, ReleaseState, VersionDecision, extract_versions, increment,
    plan_next_version,
};

use super::PublishFlowUseCase;

pub(super) async fn resolve(
    flow: &PublishFlowUseCase<'_>,
    target: &mut RepoTarget,
) -> Result<ReleaseState> {
    flow.reporter.section("Version");

    let refs = flow.git.list_remote_refs().await?;
    let releases = extract_versions(&refs, RELEASE_TAG_PREFIX);
    let latest = releases.first();
    flow.reporter.kv(
        "Latest release",
        &latest.map(|v| v.to_string()).unwrap_or_else(|| "none".to_string()),
    );

    let version = match plan_next_version(&target.version, latest) {
        VersionDecision::Keep => target.version.clone(),
        VersionDecision::Bump { latest } => {
            // 증가 기준은 매니페스트가 아니라 최신 release다.
            let choices: Vec<Choice> = BumpKind::ALL
                .iter()
                .map(|kind| {
                    Choice::new(
                        format!("{} ({} -> {})", kind.as_str(), latest, increment(&latest, *kind)),
                        kind.as_str(),
                    )
                })
                .collect();
            let picked = flow.prompter.select(
                "The latest release is ahead of the local version; choose a bump kind",
                &choices,
                Some(BumpKind::Patch.as_str()),
            )?;
            // 프롬프터 구현이 선택지 밖의 값을 돌려주면 증가를 추측하지 않고 중단한다.
            let Some(kind) = BumpKind::ALL.into_iter().find(|k| k.as_str() == picked) else {
                bail!("unknown bump kind '{picked}'");
            };
            increment(&latest, kind)
        }
    };

    if version != target.version {
        target.sync_version(&version)?;
        flow.reporter
            .success("version", &format!("manifest version updated to {version}"));
    }

    let state = ReleaseState::new(version);
    flow.reporter.kv("Resolved version", &state.version.to_string());
    flow.reporter.kv("Working branch", &state.branch);
    Ok(state)
}
