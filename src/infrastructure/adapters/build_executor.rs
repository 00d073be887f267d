//! 빌드 실행기 전달 포트 구현.
//! 요청을 JSON으로 직렬화해 자식 프로세스의 stdin으로 넘기고 종료 신호만 관찰한다.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::BuildExecutor;
use crate::domain::build::BuildRequest;

const EXECUTOR_ENV: &str = "SHIPPILOT_BUILD_EXECUTOR";
const DEFAULT_EXECUTOR: &str = "shippilot-cloudbuild";

/// 별도 프로세스로 빌드 파이프라인을 띄우는 어댑터.
pub struct ProcessBuildExecutor;

#[async_trait]
impl BuildExecutor for ProcessBuildExecutor {
    async fn run(&self, request: &BuildRequest) -> Result<()> {
        let program =
            std::env::var(EXECUTOR_ENV).unwrap_or_else(|_| DEFAULT_EXECUTOR.to_string());
        let payload = serde_json::to_vec(request).context("failed to serialize build request")?;

        let mut child = Command::new(&program)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to spawn build executor '{program}'"))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .await
                .context("failed to hand the build request to the executor")?;
            // stdin을 닫아야 실행기가 요청 끝을 안다.
            drop(stdin);
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("failed to wait for build executor '{program}'"))?;
        if !status.success() {
            bail!("build executor '{program}' exited with {status}");
        }
        Ok(())
    }
}
