//! Role model.
//!
//! The nine fixed AV support duties filled for each week's events.
//! Roles are static; their relative criticality is configured separately
//! as a priority order (see [`crate::config::RotaConfig`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RotaError;

/// An AV support duty for the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Sound desk.
    Audio,
    /// Video / screen operator.
    Video,
    /// Helper at the AV desk.
    AvAssistant,
    /// Roving microphone, right side.
    RightMic,
    /// Roving microphone, left side.
    LeftMic,
    /// Front-stage attendant.
    FrontStage,
    /// Auditorium attendant.
    Auditorium,
    /// First entrance attendant.
    #[serde(rename = "entrance_1")]
    Entrance1,
    /// Second entrance attendant.
    #[serde(rename = "entrance_2")]
    Entrance2,
}

/// Grouping of roles used by quota rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleClass {
    /// Audio, video and the AV assistant.
    Technical,
    /// The two roving microphones.
    Mic,
    /// Stage, auditorium and entrance attendants.
    Attendant,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 9] = [
        Role::Audio,
        Role::Video,
        Role::AvAssistant,
        Role::RightMic,
        Role::LeftMic,
        Role::FrontStage,
        Role::Auditorium,
        Role::Entrance1,
        Role::Entrance2,
    ];

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Audio => "audio",
            Role::Video => "video",
            Role::AvAssistant => "av_assistant",
            Role::RightMic => "right_mic",
            Role::LeftMic => "left_mic",
            Role::FrontStage => "front_stage",
            Role::Auditorium => "auditorium",
            Role::Entrance1 => "entrance_1",
            Role::Entrance2 => "entrance_2",
        }
    }

    /// The class this role belongs to.
    pub fn class(&self) -> RoleClass {
        match self {
            Role::Audio | Role::Video | Role::AvAssistant => RoleClass::Technical,
            Role::RightMic | Role::LeftMic => RoleClass::Mic,
            Role::FrontStage | Role::Auditorium | Role::Entrance1 | Role::Entrance2 => {
                RoleClass::Attendant
            }
        }
    }

    /// Whether this is one of the two microphone roles.
    #[inline]
    pub fn is_mic(&self) -> bool {
        self.class() == RoleClass::Mic
    }
}

impl RoleClass {
    /// Whether `role` belongs to this class.
    #[inline]
    pub fn contains(&self, role: Role) -> bool {
        role.class() == *self
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == key || r.as_str().replace('_', "") == key)
            .ok_or_else(|| RotaError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_classes() {
        assert!(Role::RightMic.is_mic());
        assert!(Role::LeftMic.is_mic());
        assert!(!Role::Audio.is_mic());
        assert_eq!(Role::Video.class(), RoleClass::Technical);
        assert_eq!(Role::Entrance2.class(), RoleClass::Attendant);
        assert!(RoleClass::Mic.contains(Role::LeftMic));
        assert!(!RoleClass::Mic.contains(Role::FrontStage));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("audio".parse::<Role>().unwrap(), Role::Audio);
        assert_eq!("Right-Mic".parse::<Role>().unwrap(), Role::RightMic);
        assert_eq!("entrance 1".parse::<Role>().unwrap(), Role::Entrance1);
        assert_eq!("avassistant".parse::<Role>().unwrap(), Role::AvAssistant);
        assert!("projector".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_names() {
        let json = serde_json::to_string(&Role::Entrance1).unwrap();
        assert_eq!(json, "\"entrance_1\"");
        let back: Role = serde_json::from_str("\"av_assistant\"").unwrap();
        assert_eq!(back, Role::AvAssistant);
    }
}
