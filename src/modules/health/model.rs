use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall readiness, derived from the component states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Healthy,
    /// Redis is down; requests are still served.
    Degraded,
    /// The database is down.
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentState {
    Up,
    Down,
    NotConfigured,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    pub status: ComponentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    pub fn up() -> Self {
        Self {
            status: ComponentState::Up,
            message: None,
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: ComponentState::Down,
            message: Some(message.into()),
        }
    }

    pub fn not_configured() -> Self {
        Self {
            status: ComponentState::NotConfigured,
            message: None,
        }
    }

    pub fn is_down(&self) -> bool {
        self.status == ComponentState::Down
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub database: ComponentStatus,
    pub redis: ComponentStatus,
}

impl ComponentHealth {
    pub fn overall(&self) -> OverallStatus {
        if self.database.is_down() {
            OverallStatus::Unhealthy
        } else if self.redis.is_down() {
            OverallStatus::Degraded
        } else {
            OverallStatus::Healthy
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: OverallStatus,
    pub version: String,
    /// RFC 3339
    pub timestamp: String,
    pub components: ComponentHealth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_status() {
        let mut components = ComponentHealth {
            database: ComponentStatus::up(),
            redis: ComponentStatus::not_configured(),
        };
        assert_eq!(components.overall(), OverallStatus::Healthy);

        components.redis = ComponentStatus::down("connection refused");
        assert_eq!(components.overall(), OverallStatus::Degraded);

        components.database = ComponentStatus::down("pool timed out");
        assert_eq!(components.overall(), OverallStatus::Unhealthy);
    }

    #[test]
    fn test_component_status_serialization() {
        let json = serde_json::to_value(ComponentStatus::not_configured()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "not_configured" }));

        let json = serde_json::to_value(ComponentStatus::down("refused")).unwrap();
        assert_eq!(json["status"], "down");
        assert_eq!(json["message"], "refused");
    }
}
