//! 릴리스 전체 오케스트레이션 유스케이스.
//! 부트스트랩 -> 버전 협상 -> 커밋 게이트 -> 동기화 -> 빌드 전달 순서로,
//! 각 단계의 출력이 다음 단계의 전제가 되는 엄격한 순차 흐름이다.

mod bootstrap;
mod commit_gate;
mod publish;
mod sync;
mod version;

use std::time::Instant;

use anyhow::{Context, Result};

use crate::application::ports::{
    BuildExecutor, GitGateway, HostingFactory, Prompter, Reporter, SlotStore,
};
use crate::domain::project::RepoTarget;
use crate::domain::release::RunOptions;
use crate::infrastructure::config::ConfigSlot;

/// 로컬 작업 트리에서 원격의 올바른 버전 브랜치까지 릴리스를 조율한다.
pub struct PublishFlowUseCase<'a> {
    pub slots: &'a dyn SlotStore,
    pub prompter: &'a dyn Prompter,
    pub hosting_factory: &'a dyn HostingFactory,
    pub git: &'a dyn GitGateway,
    pub reporter: &'a dyn Reporter,
    pub build_executor: &'a dyn BuildExecutor,
}

impl<'a> PublishFlowUseCase<'a> {
    /// 릴리스 본 실행 진입점. 치명 오류는 남은 단계를 건너뛰고 그대로 전파된다.
    pub async fn execute(&self, options: RunOptions) -> Result<()> {
        let started = Instant::now();

        let mut target = RepoTarget::load(&options.dir)
            .context("failed to load the project manifest")?;

        self.reporter.section("Session");
        self.reporter.kv("Project", &target.name);
        self.reporter.kv("Version", &target.version.to_string());
        self.reporter.kv(
            "Mode",
            if options.git_only { "git-only" } else { "publish" },
        );
        if options.prod {
            self.reporter.kv("Prod", "enabled");
        }

        let session = bootstrap::prepare(self, &options, &target).await?;

        let state = version::resolve(self, &mut target).await?;
        commit_gate::ensure_clean(self).await?;
        sync::run(self, &state).await?;

        if !options.git_only {
            publish::trigger(self, &options, &session, &target, &state).await?;
        }

        let elapsed = started.elapsed();
        self.reporter
            .success("flow", &format!("release flow finished in {:.1}s", elapsed.as_secs_f64()));
        Ok(())
    }
}

/// 슬롯 하나를 해석한다: 캐시된 값이 있고 갱신 요청이 없으면 그대로 쓰고,
/// 아니면 한 번만 프롬프트를 거쳐 값을 기록한다.
fn resolve_slot(
    flow: &PublishFlowUseCase<'_>,
    slot: ConfigSlot,
    force_refresh: bool,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<String> {
    if !force_refresh
        && let Some(value) = flow.slots.read(slot)?
    {
        flow.reporter
            .status("cache", &format!("{} loaded from cache", slot.label()));
        return Ok(value);
    }

    let value = prompt()?;
    flow.slots.write(slot, &value)?;
    flow.reporter
        .success("cache", &format!("{} written", slot.label()));
    Ok(value)
}
