//! 캐시 상태 점검 유스케이스.

use anyhow::Result;
use serde_json::json;

use crate::application::ports::SlotStore;
use crate::infrastructure::config::ConfigSlot;

/// 캐시 루트와 슬롯별 상태를 JSON으로 정리한다. 토큰 값은 가린다.
pub struct InspectConfigUseCase<'a> {
    pub slots: &'a dyn SlotStore,
}

impl<'a> InspectConfigUseCase<'a> {
    pub fn execute(&self) -> Result<String> {
        let mut slots = serde_json::Map::new();
        for slot in ConfigSlot::ALL {
            let value = self.slots.read(slot)?;
            let rendered = match (slot, value) {
                (_, None) => json!({ "present": false }),
                (ConfigSlot::Token, Some(_)) => {
                    json!({ "present": true, "value": "(masked)" })
                }
                (_, Some(value)) => json!({ "present": true, "value": value }),
            };
            slots.insert(slot.file_name().to_string(), rendered);
        }

        let report = json!({
            "cache_root": self.slots.root_path(),
            "slots": slots,
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }
}
