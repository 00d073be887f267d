//! 호스팅 게이트웨이 팩토리 포트 구현 어댑터.

use crate::application::ports::{HostingFactory, HostingGateway};
use crate::domain::hosting::ProviderKind;
use crate::infrastructure::hosting::build_hosting_client;

pub struct HostingFactoryAdapter;

impl HostingFactory for HostingFactoryAdapter {
    fn build(&self, kind: ProviderKind, token: String) -> Box<dyn HostingGateway> {
        build_hosting_client(kind, token)
    }
}
