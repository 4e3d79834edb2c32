//! Targets: the scope a directive applies to.

use serde::Serialize;

use crate::position::{HasPosition, Position};

/// Every record in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetAll {
    pub pos: Position,
}

/// One record by name, regardless of its OCN. Subject to races.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOne {
    pub pos: Position,
    pub name: String,
}

/// One record at the OCN the requester last observed.
///
/// The execution layer applies a change through this target only if the
/// record's stored OCN still equals `ocn`; otherwise it reports a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOcn {
    pub pos: Position,
    pub one: TargetOne,
    pub ocn: u64,
}

impl TargetOcn {
    pub fn name(&self) -> &str {
        &self.one.name
    }
}

/// Any target shape. Each directive narrows this to the shapes it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    All(TargetAll),
    One(TargetOne),
    Ocn(TargetOcn),
}

impl Target {
    /// Record name, if the target names a single record.
    pub fn name(&self) -> Option<&str> {
        match self {
            Target::All(_) => None,
            Target::One(one) => Some(&one.name),
            Target::Ocn(ocn) => Some(ocn.name()),
        }
    }

    pub fn ocn(&self) -> Option<u64> {
        match self {
            Target::Ocn(t) => Some(t.ocn),
            _ => None,
        }
    }
}

impl HasPosition for TargetAll {
    fn position(&self) -> Position {
        self.pos
    }
}

impl HasPosition for TargetOne {
    fn position(&self) -> Position {
        self.pos
    }
}

impl HasPosition for TargetOcn {
    fn position(&self) -> Position {
        self.pos
    }
}

impl HasPosition for Target {
    fn position(&self) -> Position {
        match self {
            Target::All(t) => t.pos,
            Target::One(t) => t.pos,
            Target::Ocn(t) => t.pos,
        }
    }
}
