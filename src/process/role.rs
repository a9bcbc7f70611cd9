use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The process role of a shape, read from its `clientType` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeRole {
    None,
    Start,
    UserTask,
    SystemTask,
    PreconditionSystemTask,
    UserDecision,
    End,
    SystemDecision,
    Merge,
}

impl ShapeRole {
    const ALL: [ShapeRole; 9] = [
        ShapeRole::None,
        ShapeRole::Start,
        ShapeRole::UserTask,
        ShapeRole::SystemTask,
        ShapeRole::PreconditionSystemTask,
        ShapeRole::UserDecision,
        ShapeRole::End,
        ShapeRole::SystemDecision,
        ShapeRole::Merge,
    ];

    /// The numeric client-type code stored in documents.
    pub fn code(self) -> i64 {
        match self {
            ShapeRole::None => 0,
            ShapeRole::Start => 1,
            ShapeRole::UserTask => 2,
            ShapeRole::SystemTask => 3,
            ShapeRole::PreconditionSystemTask => 4,
            ShapeRole::UserDecision => 5,
            ShapeRole::End => 6,
            ShapeRole::SystemDecision => 7,
            ShapeRole::Merge => 8,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeRole::None => "None",
            ShapeRole::Start => "Start",
            ShapeRole::UserTask => "UserTask",
            ShapeRole::SystemTask => "SystemTask",
            ShapeRole::PreconditionSystemTask => "PreconditionSystemTask",
            ShapeRole::UserDecision => "UserDecision",
            ShapeRole::End => "End",
            ShapeRole::SystemDecision => "SystemDecision",
            ShapeRole::Merge => "Merge",
        }
    }

    /// Resolves a raw `clientType` value.
    ///
    /// Numbers are read as client-type codes. Strings are matched against the
    /// registered aliases first, then against the role names ignoring case.
    pub fn from_client_type(
        value: &serde_json::Value,
        aliases: &AHashMap<String, ShapeRole>,
    ) -> Option<Self> {
        if let Some(code) = value.as_i64() {
            return Self::from_code(code);
        }
        let text = value.as_str()?;
        if let Some(role) = aliases.get(text) {
            return Some(*role);
        }
        Self::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(text))
    }

    pub fn is_decision(self) -> bool {
        matches!(self, ShapeRole::UserDecision | ShapeRole::SystemDecision)
    }

    /// System tasks and system decisions run without user interaction.
    pub fn is_system(self) -> bool {
        matches!(self, ShapeRole::SystemTask | ShapeRole::SystemDecision)
    }
}

impl fmt::Display for ShapeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
