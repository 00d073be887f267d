//! 저장소 부트스트랩 단계.
//! 제공자/토큰/소유자 결정, 원격 저장소 확보, 로컬 git 초기화,
//! 그리고 원격 기본 브랜치와의 첫 동기화까지를 순서대로 밟는다.

use anyhow::{Context, Result};

use crate::application::ports::{Choice, HostingGateway};
use crate::domain::error::FlowError;
use crate::domain::hosting::{HostingSession, OwnerKind, ProviderKind, RemoteOrg, RemoteUser};
use crate::domain::project::RepoTarget;
use crate::domain::release::RunOptions;
use crate::infrastructure::config::ConfigSlot;

use super::{PublishFlowUseCase, commit_gate, resolve_slot};

const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_BRANCH: &str = "master";

/// 새 저장소에 한 번 써 주는 기본 ignore 목록.
const DEFAULT_GITIGNORE: &str = "\
.DS_Store
node_modules
/dist

# local env files
.env.local
.env.*.local

# Log files
npm-debug.log*
yarn-debug.log*
yarn-error.log*
pnpm-debug.log*

# Editor directories and files
.idea
.vscode
*.suo
*.ntvs*
*.njsproj
*.sln
*.sw?
";

/// 부트스트랩 전체를 수행하고 이후 단계가 쓸 호스팅 세션을 돌려준다.
pub(super) async fn prepare(
    flow: &PublishFlowUseCase<'_>,
    options: &RunOptions,
    target: &RepoTarget,
) -> Result<HostingSession> {
    flow.reporter.section("Bootstrap");
    flow.slots.ensure_root()?;

    let kind = resolve_provider_kind(flow, options)?;
    let token = resolve_token(flow, options, kind)?;
    let hosting = flow.hosting_factory.build(kind, token.clone());

    let (user, orgs) = fetch_user_and_orgs(flow, hosting.as_ref()).await?;
    let (owner, login) = resolve_owner(flow, options, &user, &orgs)?;

    ensure_remote_repo(flow, hosting.as_ref(), owner, &login, &target.name).await?;
    ensure_gitignore(flow, target)?;

    let remote_url = hosting.remote_url(&login, &target.name);
    ensure_local_repo(flow, target, &remote_url).await?;
    reconcile_default_branch(flow).await?;

    Ok(HostingSession {
        kind,
        token,
        user,
        orgs,
        owner,
        login,
    })
}

fn resolve_provider_kind(
    flow: &PublishFlowUseCase<'_>,
    options: &RunOptions,
) -> Result<ProviderKind> {
    let raw = resolve_slot(flow, ConfigSlot::ProviderKind, options.refresh_provider, || {
        let choices = [ProviderKind::Github, ProviderKind::Gitee]
            .map(|k| Choice::new(k.display_name(), k.as_str()));
        flow.prompter.select(
            "Choose the git hosting platform",
            &choices,
            Some(ProviderKind::Github.as_str()),
        )
    })?;
    ProviderKind::parse(&raw)
}

fn resolve_token(
    flow: &PublishFlowUseCase<'_>,
    options: &RunOptions,
    kind: ProviderKind,
) -> Result<String> {
    resolve_slot(flow, ConfigSlot::Token, options.refresh_token, || {
        flow.reporter.warn(
            "token",
            &format!(
                "no {} token is cached yet; create one at {}",
                kind.display_name(),
                kind.token_help_url()
            ),
        );
        // 빈 토큰은 세션에 실을 수 없다. 비어 있지 않은 값을 받을 때까지 다시 묻는다.
        let mut token = String::new();
        while token.trim().is_empty() {
            token = flow.prompter.secret("Paste your access token")?;
        }
        Ok(token.trim().to_string())
    })
}

async fn fetch_user_and_orgs(
    flow: &PublishFlowUseCase<'_>,
    hosting: &dyn HostingGateway,
) -> Result<(RemoteUser, Vec<RemoteOrg>)> {
    let provider = hosting.kind().display_name().to_string();

    let user = hosting
        .fetch_user()
        .await?
        .ok_or(FlowError::AuthenticationFailed {
            provider: provider.clone(),
        })?;

    let orgs = hosting
        .fetch_orgs(&user.login)
        .await?
        .ok_or_else(|| FlowError::OrgLookupFailed {
            provider,
            login: user.login.clone(),
        })?;

    flow.reporter.success(
        "hosting",
        &format!("fetched user '{}' and {} organization(s)", user.login, orgs.len()),
    );
    Ok((user, orgs))
}

/// 소유 형태와 로그인 이름은 항상 함께 결정되고 함께 갱신된다.
fn resolve_owner(
    flow: &PublishFlowUseCase<'_>,
    options: &RunOptions,
    user: &RemoteUser,
    orgs: &[RemoteOrg],
) -> Result<(OwnerKind, String)> {
    let cached_owner = flow.slots.read(ConfigSlot::OwnerKind)?;
    let cached_login = flow.slots.read(ConfigSlot::Login)?;

    if !options.refresh_owner
        && let (Some(owner), Some(login)) = (cached_owner, cached_login)
    {
        flow.reporter
            .status("cache", "owner and login loaded from cache");
        return Ok((OwnerKind::parse(&owner)?, login));
    }

    // 조직이 없으면 개인 계정만 선택지로 남긴다.
    let mut choices = vec![Choice::new("individual", OwnerKind::User.as_str())];
    if !orgs.is_empty() {
        choices.push(Choice::new("organization", OwnerKind::Org.as_str()));
    }
    let owner = OwnerKind::parse(&flow.prompter.select(
        "Choose where the remote repository lives",
        &choices,
        Some(OwnerKind::User.as_str()),
    )?)?;

    let login = match owner {
        OwnerKind::User => user.login.clone(),
        OwnerKind::Org => {
            let org_choices: Vec<Choice> = orgs
                .iter()
                .map(|org| Choice::new(org.login.clone(), org.login.clone()))
                .collect();
            flow.prompter
                .select("Choose the organization", &org_choices, None)?
        }
    };

    flow.slots.write(ConfigSlot::OwnerKind, owner.as_str())?;
    flow.slots.write(ConfigSlot::Login, &login)?;
    flow.reporter
        .success("cache", &format!("owner written ({} -> {})", owner.as_str(), login));
    Ok((owner, login))
}

/// 원격 저장소를 조회하고, 없으면 소유 형태에 맞춰 생성한다.
async fn ensure_remote_repo(
    flow: &PublishFlowUseCase<'_>,
    hosting: &dyn HostingGateway,
    owner: OwnerKind,
    login: &str,
    name: &str,
) -> Result<()> {
    if let Some(repo) = hosting.fetch_repo(login, name).await? {
        flow.reporter.success(
            "hosting",
            &format!("remote repository found: {}", repo.full_name.as_deref().unwrap_or(&repo.name)),
        );
        return Ok(());
    }

    flow.reporter
        .status("hosting", "remote repository missing; creating it");
    let created = match owner {
        OwnerKind::User => hosting.create_user_repo(name).await,
        OwnerKind::Org => hosting.create_org_repo(name, login).await,
    };

    match created {
        Ok(repo) => {
            flow.reporter.success(
                "hosting",
                &format!("remote repository created: {}", repo.full_name.as_deref().unwrap_or(&repo.name)),
            );
            Ok(())
        }
        Err(err) => Err(err.context(FlowError::RemoteCreateFailed {
            name: name.to_string(),
        })),
    }
}

fn ensure_gitignore(flow: &PublishFlowUseCase<'_>, target: &RepoTarget) -> Result<()> {
    let path = target.dir.join(".gitignore");
    if path.exists() {
        return Ok(());
    }
    std::fs::write(&path, DEFAULT_GITIGNORE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    flow.reporter.success("git", "default .gitignore written");
    Ok(())
}

/// 로컬 저장소 마커가 있으면 초기화/remote 등록을 건너뛴다(멱등 재진입).
async fn ensure_local_repo(
    flow: &PublishFlowUseCase<'_>,
    target: &RepoTarget,
    remote_url: &str,
) -> Result<()> {
    if target.dir.join(".git").exists() {
        flow.reporter
            .status("git", "local repository already initialized");
        return Ok(());
    }

    flow.reporter.status("git", "initializing local repository");
    flow.git.init().await?;
    if !flow.git.remotes().await?.iter().any(|r| r == DEFAULT_REMOTE) {
        flow.git.add_remote(DEFAULT_REMOTE, remote_url).await?;
        flow.reporter
            .success("git", &format!("remote '{DEFAULT_REMOTE}' -> {remote_url}"));
    }
    Ok(())
}

/// 첫 커밋/푸시 정합: 커밋 게이트를 통과시킨 뒤 원격 기본 브랜치가 있으면
/// 서로 무관한 히스토리까지 허용해 당겨 오고, 기본 브랜치를 푸시한다.
async fn reconcile_default_branch(flow: &PublishFlowUseCase<'_>) -> Result<()> {
    commit_gate::ensure_clean(flow).await?;

    let refs = flow.git.list_remote_refs().await?;
    if refs.contains(&format!("refs/heads/{DEFAULT_BRANCH}")) {
        if let Err(err) = flow.git.pull(DEFAULT_REMOTE, DEFAULT_BRANCH, true).await {
            flow.reporter.warn("git", &format!("pull {DEFAULT_BRANCH}: {err:#}"));
        }
    }
    flow.git.push(DEFAULT_REMOTE, DEFAULT_BRANCH).await?;
    flow.reporter
        .success("git", &format!("pushed {DEFAULT_BRANCH} to {DEFAULT_REMOTE}"));
    Ok(())
}
