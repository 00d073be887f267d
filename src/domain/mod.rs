//! Domain layer
//! 릴리스 흐름의 비즈니스 규칙(버전 협상/빌드 정책/매니페스트)을 외부 의존성 없이 표현한다.

pub mod build;
pub mod error;
pub mod hosting;
pub mod project;
pub mod release;
pub mod worktree;
