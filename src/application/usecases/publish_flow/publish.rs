//! 빌드/배포 전달 단계.
//! 빌드 명령과 업로드 대상을 검증해 빌드 실행기 협력자에게 넘긴다.

use anyhow::Result;

use crate::application::ports::Choice;
use crate::domain::build::{BuildRequest, DEFAULT_PUBLISH_TARGET, resolve_build_command};
use crate::domain::hosting::HostingSession;
use crate::domain::project::RepoTarget;
use crate::domain::release::{ReleaseState, RunOptions};
use crate::infrastructure::config::ConfigSlot;

use super::{PublishFlowUseCase, resolve_slot};

pub(super) async fn trigger(
    flow: &PublishFlowUseCase<'_>,
    options: &RunOptions,
    session: &HostingSession,
    target: &RepoTarget,
    state: &ReleaseState,
) -> Result<()> {
    flow.reporter.section("Publish");

    let build_command = resolve_build_command(options.build_command.as_deref(), target)?;
    flow.reporter.kv("Build command", &build_command.join(" "));

    let publish_target = resolve_slot(flow, ConfigSlot::PublishTarget, false, || {
        flow.prompter.select(
            "Choose the upload platform",
            &[Choice::new("OSS", DEFAULT_PUBLISH_TARGET)],
            Some(DEFAULT_PUBLISH_TARGET),
        )
    })?;
    flow.reporter.kv("Publish target", &publish_target);

    let request = BuildRequest {
        provider: session.kind,
        owner: session.owner,
        login: session.login.clone(),
        project: target.name.clone(),
        version: state.version.to_string(),
        branch: state.branch.clone(),
        build_command,
        publish_target,
        prod: options.prod,
    };

    flow.reporter.status("build", "handing off to the build executor");
    flow.build_executor.run(&request).await
}
