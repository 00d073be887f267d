//! 프로젝트 매니페스트(package.json) 모델.
//! 흐름 시작 시 한 번 읽고, 버전 협상 결과가 다르면 다시 써 준다.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use semver::Version;
use serde::Deserialize;

use crate::domain::error::FlowError;

const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

/// 릴리스 대상 프로젝트 좌표.
#[derive(Debug, Clone)]
pub struct RepoTarget {
    pub name: String,
    pub dir: PathBuf,
    pub version: Version,
    pub scripts: BTreeMap<String, String>,
}

impl RepoTarget {
    /// 매니페스트를 읽고 name/version/build 스크립트를 검증한다.
    /// 셋 중 하나라도 없으면 `ManifestIncomplete`, 버전이 semver가 아니면 즉시 중단한다.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let body = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raw: RawManifest = serde_json::from_str(&body)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;

        let incomplete = || FlowError::ManifestIncomplete { path: path.clone() };
        let name = raw.name.filter(|n| !n.trim().is_empty()).ok_or_else(incomplete)?;
        let version = raw.version.ok_or_else(incomplete)?;
        if !raw.scripts.contains_key("build") {
            return Err(incomplete().into());
        }

        let version: Version = version
            .trim()
            .parse()
            .with_context(|| format!("manifest version in {} is not valid semver", path.display()))?;

        Ok(Self {
            name,
            dir: dir.to_path_buf(),
            version,
            scripts: raw.scripts,
        })
    }

    pub fn has_script(&self, script: &str) -> bool {
        self.scripts.contains_key(script)
    }

    /// 협상된 버전을 매니페스트에 되써 준다. 다른 필드는 그대로 보존한다.
    pub fn sync_version(&mut self, version: &Version) -> Result<()> {
        if self.version == *version {
            return Ok(());
        }

        let path = self.dir.join(MANIFEST_FILE);
        let body = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut value: serde_json::Value = serde_json::from_str(&body)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;
        value["version"] = serde_json::Value::String(version.to_string());

        let rendered = serde_json::to_string_pretty(&value)?;
        fs::write(&path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;

        self.version = version.clone();
        Ok(())
    }
}
