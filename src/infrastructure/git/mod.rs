//! 시스템 git 게이트웨이.
//! 모든 원시 연산을 git 서브프로세스에 위임하고 출력만 해석한다.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::GitGateway;
use crate::domain::worktree::WorkTreeStatus;

pub struct SystemGit {
    dir: PathBuf,
}

impl SystemGit {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .await
            .with_context(|| format!("failed to spawn git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl GitGateway for SystemGit {
    async fn init(&self) -> Result<()> {
        self.run(&["init"]).await.map(|_| ())
    }

    async fn remotes(&self) -> Result<Vec<String>> {
        let out = self.run(&["remote"]).await?;
        Ok(out.lines().map(str::to_string).collect())
    }

    async fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url]).await.map(|_| ())
    }

    async fn status(&self) -> Result<WorkTreeStatus> {
        let out = self.run(&["status", "--porcelain"]).await?;
        Ok(parse_porcelain(&out))
    }

    async fn stage(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).await.map(|_| ())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).await.map(|_| ())
    }

    async fn stash_count(&self) -> Result<usize> {
        let out = self.run(&["stash", "list"]).await?;
        Ok(out.lines().filter(|l| !l.trim().is_empty()).count())
    }

    async fn stash_pop(&self) -> Result<()> {
        self.run(&["stash", "pop"]).await.map(|_| ())
    }

    async fn local_branches(&self) -> Result<Vec<String>> {
        let out = self
            .run(&["branch", "--list", "--format=%(refname:short)"])
            .await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).await.map(|_| ())
    }

    async fn checkout_new(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch]).await.map(|_| ())
    }

    async fn pull(&self, remote: &str, branch: &str, allow_unrelated: bool) -> Result<()> {
        let mut args = vec!["pull", remote, branch];
        if allow_unrelated {
            args.push("--allow-unrelated-histories");
        }
        self.run(&args).await.map(|_| ())
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).await.map(|_| ())
    }

    async fn list_remote_refs(&self) -> Result<String> {
        self.run(&["ls-remote", "--refs", "origin"]).await
    }
}

/// `git status --porcelain` 출력 해석.
/// XY 두 글자 상태 코드 뒤에 경로가 온다. rename 항목은 `old -> new` 꼴이다.
fn parse_porcelain(out: &str) -> WorkTreeStatus {
    let mut status = WorkTreeStatus::default();

    for line in out.lines() {
        if line.len() < 4 {
            continue;
        }
        let (code, rest) = line.split_at(2);
        let path = rest.trim_start();
        let index = code.as_bytes()[0] as char;
        let tree = code.as_bytes()[1] as char;

        // 양쪽이 충돌 상태인 조합(UU/AA/DD 및 U 포함)은 전부 충돌로 본다.
        let conflicted = index == 'U'
            || tree == 'U'
            || (index == 'A' && tree == 'A')
            || (index == 'D' && tree == 'D');
        if conflicted {
            status.conflicted.push(path.to_string());
            continue;
        }

        match (index, tree) {
            ('?', '?') => status.not_added.push(path.to_string()),
            ('A', _) => status.created.push(path.to_string()),
            ('R', _) => {
                // 커밋 대상은 rename 후의 새 경로다.
                let renamed = path.split(" -> ").last().unwrap_or(path);
                status.renamed.push(renamed.to_string());
            }
            ('D', _) | (_, 'D') => status.deleted.push(path.to_string()),
            ('M', _) | (_, 'M') => status.modified.push(path.to_string()),
            _ => {}
        }
    }

    status
}
