//! 작업 트리 상태 값 객체.
//! 커밋 게이트가 판단에 쓰는 경로 분류만 담고, 수집 방법은 인프라 계층이 정한다.

#[derive(Debug, Clone, Default)]
pub struct WorkTreeStatus {
    /// 미해결 병합 충돌 경로. 비어 있지 않으면 흐름을 중단해야 한다.
    pub conflicted: Vec<String>,
    pub not_added: Vec<String>,
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub modified: Vec<String>,
    pub renamed: Vec<String>,
}

impl WorkTreeStatus {
    /// 스테이징/커밋이 필요한 변경이 있는지.
    pub fn is_dirty(&self) -> bool {
        !self.not_added.is_empty()
            || !self.created.is_empty()
            || !self.deleted.is_empty()
            || !self.modified.is_empty()
            || !self.renamed.is_empty()
    }

    /// 커밋 대상 경로 전체.
    pub fn dirty_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for group in [
            &self.not_added,
            &self.created,
            &self.deleted,
            &self.modified,
            &self.renamed,
        ] {
            paths.extend(group.iter().cloned());
        }
        paths
    }
}
