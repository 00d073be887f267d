//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod build_executor;
mod hosting_factory;
mod prompter;
mod reporter;

pub use build_executor::ProcessBuildExecutor;
pub use hosting_factory::HostingFactoryAdapter;
pub use prompter::{ScriptedPrompter, StdinPrompter};
pub use reporter::{ConsoleReporter, SilentReporter};
