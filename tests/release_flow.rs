//! 릴리스 흐름 통합 테스트.
//! 임시 디렉터리의 실제 git 저장소와 로컬 bare origin을 상대로 전체 유스케이스를 돌린다.
//! 호스팅 제공자와 빌드 실행기는 포트 구현으로 대체한다.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use tempfile::TempDir;

use shippilot::application::ports::{
    BuildExecutor, Choice, GitGateway, HostingFactory, HostingGateway, Prompter, SlotStore,
};
use shippilot::application::usecases::publish_flow::PublishFlowUseCase;
use shippilot::domain::build::BuildRequest;
use shippilot::domain::error::FlowError;
use shippilot::domain::hosting::{ProviderKind, RemoteOrg, RemoteRepo, RemoteUser};
use shippilot::domain::release::RunOptions;
use shippilot::infrastructure::adapters::{ScriptedPrompter, SilentReporter};
use shippilot::infrastructure::config::{ConfigSlot, FileSlotStore};
use shippilot::infrastructure::git::SystemGit;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn git_allow_fail(dir: &Path, args: &[&str]) {
    let _ = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to spawn git");
}

/// 고정된 사용자를 돌려주는 호스팅 게이트웨이. 원격 주소는 로컬 bare 저장소다.
/// 조직 목록/저장소 존재 여부/생성 실패를 테스트별로 바꿔 꽂을 수 있다.
struct FakeHosting {
    remote: String,
    orgs: Vec<String>,
    repo_missing: bool,
    create_fails: bool,
    created: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

#[async_trait]
impl HostingGateway for FakeHosting {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Github
    }

    async fn fetch_user(&self) -> Result<Option<RemoteUser>> {
        Ok(Some(RemoteUser {
            login: "octo".to_string(),
        }))
    }

    async fn fetch_orgs(&self, _login: &str) -> Result<Option<Vec<RemoteOrg>>> {
        Ok(Some(
            self.orgs
                .iter()
                .map(|login| RemoteOrg {
                    login: login.clone(),
                })
                .collect(),
        ))
    }

    async fn fetch_repo(&self, login: &str, name: &str) -> Result<Option<RemoteRepo>> {
        if self.repo_missing {
            return Ok(None);
        }
        Ok(Some(RemoteRepo {
            name: name.to_string(),
            full_name: Some(format!("{login}/{name}")),
        }))
    }

    async fn create_user_repo(&self, name: &str) -> Result<RemoteRepo> {
        if self.create_fails {
            bail!("repository quota exceeded");
        }
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), None));
        Ok(RemoteRepo {
            name: name.to_string(),
            full_name: None,
        })
    }

    async fn create_org_repo(&self, name: &str, org: &str) -> Result<RemoteRepo> {
        if self.create_fails {
            bail!("repository quota exceeded");
        }
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), Some(org.to_string())));
        Ok(RemoteRepo {
            name: name.to_string(),
            full_name: None,
        })
    }

    fn remote_url(&self, _login: &str, _name: &str) -> String {
        self.remote.clone()
    }
}

struct FakeHostingFactory {
    remote: String,
    orgs: Vec<String>,
    repo_missing: bool,
    create_fails: bool,
    created: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl FakeHostingFactory {
    fn new(remote: String) -> Self {
        Self {
            remote,
            orgs: Vec::new(),
            repo_missing: false,
            create_fails: false,
            created: Arc::default(),
        }
    }
}

impl HostingFactory for FakeHostingFactory {
    fn build(&self, _kind: ProviderKind, _token: String) -> Box<dyn HostingGateway> {
        Box::new(FakeHosting {
            remote: self.remote.clone(),
            orgs: self.orgs.clone(),
            repo_missing: self.repo_missing,
            create_fails: self.create_fails,
            created: Arc::clone(&self.created),
        })
    }
}

/// 선택지 검증 없이 준비된 답 하나를 그대로 돌려주는 프롬프터.
/// 포트 계약을 어기는 구현을 흐름이 어떻게 받아내는지 확인할 때 쓴다.
struct UncheckedPrompter {
    answer: String,
}

impl Prompter for UncheckedPrompter {
    fn select(&self, _message: &str, _choices: &[Choice], _default: Option<&str>) -> Result<String> {
        Ok(self.answer.clone())
    }

    fn input(&self, _message: &str) -> Result<String> {
        Ok(self.answer.clone())
    }

    fn secret(&self, _message: &str) -> Result<String> {
        Ok(self.answer.clone())
    }
}

#[derive(Default)]
struct RecordingExecutor {
    seen: Mutex<Vec<BuildRequest>>,
}

#[async_trait]
impl BuildExecutor for RecordingExecutor {
    async fn run(&self, request: &BuildRequest) -> Result<()> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(())
    }
}

struct TestRig {
    _home: TempDir,
    _project: TempDir,
    _origin: TempDir,
    home: PathBuf,
    project: PathBuf,
    origin: PathBuf,
}

impl TestRig {
    /// 로컬 git 저장소(origin 등록 포함)와 bare origin, 캐시 홈을 준비한다.
    fn new(version: &str) -> Self {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let origin = TempDir::new().unwrap();

        let manifest = serde_json::json!({
            "name": "demo-app",
            "version": version,
            "scripts": { "build": "node scripts/build.js" },
        });
        std::fs::write(
            project.path().join("package.json"),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        // 부트스트랩이 기본 ignore 목록을 다시 쓰지 않도록 미리 둔다.
        std::fs::write(project.path().join(".gitignore"), "node_modules\n").unwrap();

        git(origin.path(), &["init", "--bare"]);
        git(project.path(), &["init", "-b", "master"]);
        git(project.path(), &["config", "user.name", "Release Bot"]);
        git(project.path(), &["config", "user.email", "release@example.com"]);
        git(
            project.path(),
            &["remote", "add", "origin", origin.path().to_str().unwrap()],
        );

        Self {
            home: home.path().to_path_buf(),
            project: project.path().to_path_buf(),
            origin: origin.path().to_path_buf(),
            _home: home,
            _project: project,
            _origin: origin,
        }
    }

    fn commit_all(&self, message: &str) {
        git(&self.project, &["add", "-A"]);
        git(&self.project, &["commit", "-m", message]);
    }

    fn slot_store(&self) -> FileSlotStore {
        let store = FileSlotStore::new(self.home.clone());
        store.ensure_root().unwrap();
        store
    }

    /// 프롬프트 없이 재진입할 수 있도록 슬롯을 미리 채운다.
    fn seed_slots(&self) -> FileSlotStore {
        let store = self.slot_store();
        store.write(ConfigSlot::ProviderKind, "github").unwrap();
        store.write(ConfigSlot::Token, "tok-123").unwrap();
        store.write(ConfigSlot::OwnerKind, "user").unwrap();
        store.write(ConfigSlot::Login, "octo").unwrap();
        store.write(ConfigSlot::PublishTarget, "oss").unwrap();
        store
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            dir: self.project.clone(),
            prod: false,
            build_command: None,
            git_only: false,
            refresh_provider: false,
            refresh_token: false,
            refresh_owner: false,
        }
    }

    fn remote_refs(&self) -> String {
        git(&self.origin, &["for-each-ref", "--format=%(refname)"])
    }
}

async fn run_flow(
    rig: &TestRig,
    store: &FileSlotStore,
    prompter: &ScriptedPrompter,
    executor: &RecordingExecutor,
    options: RunOptions,
) -> Result<()> {
    let factory = FakeHostingFactory::new(rig.origin.to_str().unwrap().to_string());
    run_flow_with(rig, &factory, store, prompter, executor, options).await
}

async fn run_flow_with(
    rig: &TestRig,
    factory: &FakeHostingFactory,
    store: &FileSlotStore,
    prompter: &ScriptedPrompter,
    executor: &RecordingExecutor,
    options: RunOptions,
) -> Result<()> {
    let git_gateway = SystemGit::new(rig.project.clone());
    let flow = PublishFlowUseCase {
        slots: store,
        prompter,
        hosting_factory: factory,
        git: &git_gateway,
        reporter: &SilentReporter,
        build_executor: executor,
    };
    flow.execute(options).await
}

#[tokio::test]
async fn first_publish_pushes_master_and_dev_branch() {
    let rig = TestRig::new("1.0.0");
    std::fs::write(rig.project.join("index.js"), "console.log('hi');\n").unwrap();

    let store = rig.slot_store();
    // 프롬프트 순서: 플랫폼 -> 토큰 -> 소유 형태 -> 커밋 메시지 -> 업로드 대상
    let prompter = ScriptedPrompter::new([
        "github",
        "tok-123",
        "user",
        "feat: initial release",
        "oss",
    ]);
    let executor = RecordingExecutor::default();

    run_flow(&rig, &store, &prompter, &executor, rig.options())
        .await
        .unwrap();

    let refs = rig.remote_refs();
    assert!(refs.contains("refs/heads/master"));
    assert!(refs.contains("refs/heads/dev/1.0.0"));

    // 슬롯이 기록되어 다음 실행에서 프롬프트가 사라진다.
    assert_eq!(
        store.read(ConfigSlot::ProviderKind).unwrap().as_deref(),
        Some("github")
    );
    assert_eq!(store.read(ConfigSlot::Login).unwrap().as_deref(), Some("octo"));

    let subject = git(&rig.project, &["log", "-1", "--format=%s"]);
    assert_eq!(subject.trim(), "feat: initial release");

    let seen = executor.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].version, "1.0.0");
    assert_eq!(seen[0].branch, "dev/1.0.0");
    assert_eq!(seen[0].build_command, vec!["npm", "run", "build"]);
    assert_eq!(seen[0].publish_target, "oss");
    assert_eq!(seen[0].login, "octo");
    assert!(!seen[0].prod);
}

#[tokio::test]
async fn rerun_with_cached_slots_is_idempotent_and_prompt_free() {
    let rig = TestRig::new("1.0.0");
    std::fs::write(rig.project.join("index.js"), "console.log('hi');\n").unwrap();

    let store = rig.slot_store();
    let first = ScriptedPrompter::new(["github", "tok-123", "user", "feat: initial", "oss"]);
    let executor = RecordingExecutor::default();
    run_flow(&rig, &store, &first, &executor, rig.options())
        .await
        .unwrap();

    // 두 번째 실행: 캐시와 깨끗한 트리 덕에 스크립트된 답이 하나도 필요 없어야 한다.
    let second = ScriptedPrompter::new(Vec::<String>::new());
    run_flow(&rig, &store, &second, &executor, rig.options())
        .await
        .unwrap();

    let remotes = git(&rig.project, &["remote"]);
    assert_eq!(remotes.trim(), "origin");
    assert_eq!(executor.seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn release_tag_ahead_prompts_for_bump_and_rewrites_the_manifest() {
    let rig = TestRig::new("1.0.0");
    rig.commit_all("chore: scaffold");
    git(&rig.project, &["tag", "release/2.0.0"]);
    git(&rig.project, &["push", "origin", "release/2.0.0"]);

    let store = rig.seed_slots();
    // 증가 종류 선택 -> 매니페스트가 다시 더러워지므로 커밋 메시지
    let prompter = ScriptedPrompter::new(["minor", "chore: bump version"]);
    let executor = RecordingExecutor::default();

    run_flow(&rig, &store, &prompter, &executor, rig.options())
        .await
        .unwrap();

    let manifest: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(rig.project.join("package.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["version"], "2.1.0");

    assert!(rig.remote_refs().contains("refs/heads/dev/2.1.0"));
    let seen = executor.seen.lock().unwrap();
    assert_eq!(seen[0].version, "2.1.0");
    assert_eq!(seen[0].branch, "dev/2.1.0");
}

#[tokio::test]
async fn merge_conflict_aborts_the_flow_before_any_push() {
    let rig = TestRig::new("1.0.0");
    std::fs::write(rig.project.join("file.txt"), "base\n").unwrap();
    rig.commit_all("base");

    git(&rig.project, &["checkout", "-b", "topic"]);
    std::fs::write(rig.project.join("file.txt"), "topic\n").unwrap();
    rig.commit_all("topic change");
    git(&rig.project, &["checkout", "master"]);
    std::fs::write(rig.project.join("file.txt"), "master\n").unwrap();
    rig.commit_all("master change");
    // 병합은 충돌로 실패한 채 남는다.
    git_allow_fail(&rig.project, &["merge", "topic"]);

    let store = rig.seed_slots();
    let prompter = ScriptedPrompter::new(Vec::<String>::new());
    let executor = RecordingExecutor::default();

    let err = run_flow(&rig, &store, &prompter, &executor, rig.options())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FlowError>(),
        Some(FlowError::ConflictDetected { .. })
    ));

    // 충돌은 어떤 푸시보다도 먼저 흐름을 세운다.
    assert_eq!(rig.remote_refs().trim(), "");
    assert!(executor.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn commit_gate_recovers_stash_and_reprompts_until_a_message_is_given() {
    let rig = TestRig::new("1.0.0");
    rig.commit_all("chore: scaffold");

    // 스태시 한 건 + 새 파일 하나를 남겨 둔다.
    std::fs::write(rig.project.join("wip.js"), "// wip\n").unwrap();
    git(&rig.project, &["stash", "push", "--include-untracked"]);
    std::fs::write(rig.project.join("feature.js"), "// feature\n").unwrap();

    let store = rig.seed_slots();
    // 빈 메시지는 두 번 거절되고 세 번째 답으로 커밋된다.
    let prompter = ScriptedPrompter::new(["", "", "feat: add feature"]);
    let executor = RecordingExecutor::default();

    let mut options = rig.options();
    options.git_only = true;
    run_flow(&rig, &store, &prompter, &executor, options)
        .await
        .unwrap();

    let subject = git(&rig.project, &["log", "-1", "--format=%s"]);
    assert_eq!(subject.trim(), "feat: add feature");

    // 게이트는 스테이징만 된 변경을 남기지 않고, 스태시도 복구돼 있어야 한다.
    assert_eq!(git(&rig.project, &["status", "--porcelain"]).trim(), "");
    assert_eq!(git(&rig.project, &["stash", "list"]).trim(), "");

    // git-only 모드는 빌드 실행기를 호출하지 않는다.
    assert!(executor.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn illegal_build_command_is_rejected() {
    let rig = TestRig::new("1.0.0");
    rig.commit_all("chore: scaffold");

    let store = rig.seed_slots();
    let prompter = ScriptedPrompter::new(Vec::<String>::new());
    let executor = RecordingExecutor::default();

    let mut options = rig.options();
    options.build_command = Some("rm -rf /".to_string());
    let err = run_flow(&rig, &store, &prompter, &executor, options)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<FlowError>(),
        Some(FlowError::IllegalBuildCommand { .. })
    ));
    assert!(executor.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn org_owner_creates_the_missing_repo_under_the_chosen_organization() {
    let rig = TestRig::new("1.0.0");
    rig.commit_all("chore: scaffold");

    // 소유 형태/로그인만 비워 두고 나머지 슬롯은 채운다.
    let store = rig.slot_store();
    store.write(ConfigSlot::ProviderKind, "github").unwrap();
    store.write(ConfigSlot::Token, "tok-123").unwrap();
    store.write(ConfigSlot::PublishTarget, "oss").unwrap();

    let mut factory = FakeHostingFactory::new(rig.origin.to_str().unwrap().to_string());
    factory.orgs = vec!["acme".to_string(), "globex".to_string()];
    factory.repo_missing = true;

    // 프롬프트 순서: 소유 형태 -> 조직 선택
    let prompter = ScriptedPrompter::new(["org", "acme"]);
    let executor = RecordingExecutor::default();

    let mut options = rig.options();
    options.git_only = true;
    run_flow_with(&rig, &factory, &store, &prompter, &executor, options)
        .await
        .unwrap();

    // 없는 저장소는 선택한 조직 아래에 생성된다.
    assert_eq!(
        *factory.created.lock().unwrap(),
        vec![("demo-app".to_string(), Some("acme".to_string()))]
    );
    assert_eq!(store.read(ConfigSlot::OwnerKind).unwrap().as_deref(), Some("org"));
    assert_eq!(store.read(ConfigSlot::Login).unwrap().as_deref(), Some("acme"));
    assert!(rig.remote_refs().contains("refs/heads/dev/1.0.0"));
}

#[tokio::test]
async fn owner_prompt_offers_only_individual_when_there_are_no_organizations() {
    let rig = TestRig::new("1.0.0");
    rig.commit_all("chore: scaffold");

    let store = rig.slot_store();
    store.write(ConfigSlot::ProviderKind, "github").unwrap();
    store.write(ConfigSlot::Token, "tok-123").unwrap();
    store.write(ConfigSlot::PublishTarget, "oss").unwrap();

    // 조직이 없으면 소유 형태 선택지에 "org" 자체가 없다.
    let prompter = ScriptedPrompter::new(["org"]);
    let executor = RecordingExecutor::default();

    let mut options = rig.options();
    options.git_only = true;
    let err = run_flow(&rig, &store, &prompter, &executor, options)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not a valid choice"));
}

#[tokio::test]
async fn failed_remote_creation_aborts_before_any_push() {
    let rig = TestRig::new("1.0.0");
    rig.commit_all("chore: scaffold");

    let store = rig.seed_slots();
    let mut factory = FakeHostingFactory::new(rig.origin.to_str().unwrap().to_string());
    factory.repo_missing = true;
    factory.create_fails = true;

    let prompter = ScriptedPrompter::new(Vec::<String>::new());
    let executor = RecordingExecutor::default();

    let err = run_flow_with(&rig, &factory, &store, &prompter, &executor, rig.options())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FlowError>(),
        Some(FlowError::RemoteCreateFailed { .. })
    ));

    // 원격 저장소 확보 실패는 어떤 git 정합 단계보다도 먼저 흐름을 세운다.
    assert_eq!(rig.remote_refs().trim(), "");
    assert!(factory.created.lock().unwrap().is_empty());
    assert!(executor.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn token_prompt_rejects_empty_secrets() {
    let rig = TestRig::new("1.0.0");
    rig.commit_all("chore: scaffold");

    let store = rig.slot_store();
    store.write(ConfigSlot::ProviderKind, "github").unwrap();
    store.write(ConfigSlot::OwnerKind, "user").unwrap();
    store.write(ConfigSlot::Login, "octo").unwrap();
    store.write(ConfigSlot::PublishTarget, "oss").unwrap();

    // 빈 답 두 번은 거절되고 세 번째 값이 저장된다.
    let prompter = ScriptedPrompter::new(["", "   ", "tok-999"]);
    let executor = RecordingExecutor::default();

    let mut options = rig.options();
    options.git_only = true;
    run_flow(&rig, &store, &prompter, &executor, options)
        .await
        .unwrap();

    assert_eq!(store.read(ConfigSlot::Token).unwrap().as_deref(), Some("tok-999"));
}

#[tokio::test]
async fn bump_answer_outside_the_choices_aborts_instead_of_guessing() {
    let rig = TestRig::new("1.0.0");
    rig.commit_all("chore: scaffold");
    git(&rig.project, &["tag", "release/2.0.0"]);
    git(&rig.project, &["push", "origin", "release/2.0.0"]);

    let store = rig.seed_slots();
    let factory = FakeHostingFactory::new(rig.origin.to_str().unwrap().to_string());
    let git_gateway = SystemGit::new(rig.project.clone());
    // 계약을 지키지 않는 프롬프터가 선택지 밖의 증가 종류를 돌려준다.
    let prompter = UncheckedPrompter {
        answer: "mega".to_string(),
    };
    let executor = RecordingExecutor::default();
    let flow = PublishFlowUseCase {
        slots: &store,
        prompter: &prompter,
        hosting_factory: &factory,
        git: &git_gateway,
        reporter: &SilentReporter,
        build_executor: &executor,
    };

    let err = flow.execute(rig.options()).await.unwrap_err();
    assert!(err.to_string().contains("unknown bump kind"));

    // 증가를 추측해 dev 브랜치를 만들거나 빌드를 넘기면 안 된다.
    assert!(!rig.remote_refs().contains("refs/heads/dev/"));
    assert!(executor.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn system_git_init_and_remote_registration_round_trip() {
    let dir = TempDir::new().unwrap();
    let gateway = SystemGit::new(dir.path().to_path_buf());

    gateway.init().await.unwrap();
    assert!(dir.path().join(".git").exists());
    assert!(gateway.remotes().await.unwrap().is_empty());

    gateway
        .add_remote("origin", "git@github.com:octo/demo.git")
        .await
        .unwrap();
    assert_eq!(gateway.remotes().await.unwrap(), vec!["origin"]);
}
