// ==========================================
// 订单装箱规划 - 操作日志领域模型
// ==========================================
// 用途: 包装规格变更的审计追踪
// 对齐: action_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,               // 日志ID (uuid v4)
    pub action_type: String,             // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,        // 操作时间戳
    pub actor: String,                   // 操作人
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,          // 详细描述
}

impl ActionLog {
    /// 以当前本地时间构建一条日志
    pub fn now(
        action_type: ActionType,
        actor: &str,
        payload_json: Option<JsonValue>,
        detail: Option<String>,
    ) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.to_string(),
            payload_json,
            detail,
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    UpdatePackSizes, // 合并写入包装规格
    DeletePackSize,  // 删除单个规格
    SeedPackSizes,   // 启动时写入默认规格
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::UpdatePackSizes => write!(f, "UpdatePackSizes"),
            ActionType::DeletePackSize => write!(f, "DeletePackSize"),
            ActionType::SeedPackSizes => write!(f, "SeedPackSizes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_fills_id_and_type() {
        let log = ActionLog::now(ActionType::DeletePackSize, "system", None, None);
        assert_eq!(log.action_type, "DeletePackSize");
        assert_eq!(log.action_id.len(), 36);
        assert_eq!(log.actor, "system");
    }
}
