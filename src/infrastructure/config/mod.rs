//! 파일 기반 슬롯 저장소.
//! 릴리스 흐름의 결정 하나당 캐시 루트 아래 파일 하나를 쓴다.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::SlotStore;
use crate::domain::error::FlowError;

pub const DEFAULT_HOME_DIR: &str = ".shippilot";
pub const HOME_ENV: &str = "SHIPPILOT_HOME";
const SLOT_DIR: &str = ".git";

/// 독립적으로 캐시되는 설정 값 하나.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSlot {
    ProviderKind,
    Token,
    OwnerKind,
    Login,
    PublishTarget,
}

impl ConfigSlot {
    pub const ALL: [ConfigSlot; 5] = [
        ConfigSlot::ProviderKind,
        ConfigSlot::Token,
        ConfigSlot::OwnerKind,
        ConfigSlot::Login,
        ConfigSlot::PublishTarget,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::ProviderKind => ".git_server",
            Self::Token => ".git_token",
            Self::OwnerKind => ".git_own",
            Self::Login => ".git_login",
            Self::PublishTarget => ".git_publish",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ProviderKind => "git server",
            Self::Token => "git token",
            Self::OwnerKind => "owner",
            Self::Login => "login",
            Self::PublishTarget => "publish target",
        }
    }
}

/// 사용자 홈 아래 고정 캐시 루트를 쓰는 슬롯 저장소.
pub struct FileSlotStore {
    home: PathBuf,
}

impl FileSlotStore {
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    /// `SHIPPILOT_HOME`이 있으면 그 경로를, 없으면 `~/.shippilot`을 쓴다.
    pub fn from_env() -> Self {
        let home = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(DEFAULT_HOME_DIR)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_DIR));
        Self { home }
    }

    fn slot_dir(&self) -> PathBuf {
        self.home.join(SLOT_DIR)
    }

    fn slot_path(&self, slot: ConfigSlot) -> PathBuf {
        self.slot_dir().join(slot.file_name())
    }
}

impl SlotStore for FileSlotStore {
    fn ensure_root(&self) -> Result<()> {
        // 홈 경로 자체는 바깥 부트스트랩이 만든다. 없으면 선행 조건 실패.
        if !self.home.is_dir() {
            return Err(FlowError::CacheRootUnavailable {
                path: self.home.clone(),
            }
            .into());
        }
        fs::create_dir_all(self.slot_dir()).map_err(|_| FlowError::CacheRootUnavailable {
            path: self.slot_dir(),
        })?;
        Ok(())
    }

    fn read(&self, slot: ConfigSlot) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        if !path.is_file() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .with_context(|| format!("failed to read slot file {}", path.display()))?;
        Ok(Some(value))
    }

    fn write(&self, slot: ConfigSlot, value: &str) -> Result<()> {
        let path = self.slot_path(slot);
        fs::write(&path, value)
            .with_context(|| format!("failed to write slot file {}", path.display()))?;
        Ok(())
    }

    fn root_path(&self) -> String {
        self.home.display().to_string()
    }
}
