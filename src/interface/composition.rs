//! 애플리케이션 조립(composition root) 모듈.

use std::path::PathBuf;

use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::publish_flow::PublishFlowUseCase;
use crate::infrastructure::adapters::{
    ConsoleReporter, HostingFactoryAdapter, ProcessBuildExecutor, StdinPrompter,
};
use crate::infrastructure::config::FileSlotStore;
use crate::infrastructure::git::SystemGit;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    slots: FileSlotStore,
    prompter: StdinPrompter,
    hosting_factory: HostingFactoryAdapter,
    git: SystemGit,
    reporter: ConsoleReporter,
    build_executor: ProcessBuildExecutor,
}

impl Default for AppComposition {
    fn default() -> Self {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            slots: FileSlotStore::from_env(),
            prompter: StdinPrompter,
            hosting_factory: HostingFactoryAdapter,
            git: SystemGit::new(dir),
            reporter: ConsoleReporter::new(),
            build_executor: ProcessBuildExecutor,
        }
    }
}

impl AppComposition {
    /// 릴리스 실행 유스케이스를 생성한다.
    pub fn publish_usecase(&self) -> PublishFlowUseCase<'_> {
        PublishFlowUseCase {
            slots: &self.slots,
            prompter: &self.prompter,
            hosting_factory: &self.hosting_factory,
            git: &self.git,
            reporter: &self.reporter,
            build_executor: &self.build_executor,
        }
    }

    /// 캐시 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase { slots: &self.slots }
    }
}
