//! Directives: analyzed requests ready for the execution layer.
//!
//! Each directive type only admits the target shapes that make sense for it,
//! so an ill-shaped directive cannot be constructed.

use serde::Serialize;

use crate::change::AttrChange;
use crate::position::{HasPosition, Position};
use crate::target::{Target, TargetAll, TargetOcn, TargetOne};

/// Change an existing record, gated on its OCN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchDirective {
    pub pos: Position,
    pub target: TargetOcn,
    pub change: AttrChange,
}

/// Insert a new record. There is no OCN to check for a record that does
/// not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDirective {
    pub pos: Position,
    pub target: TargetOne,
    pub change: AttrChange,
}

/// Remove everything, one record, or one record at a known OCN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteDirective {
    pub pos: Position,
    pub target: Target,
}

/// Targets a read may use. Reads have no write conflict to guard against,
/// so OCN targets are not among them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GetTarget {
    All(TargetAll),
    One(TargetOne),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetDirective {
    pub pos: Position,
    pub target: GetTarget,
}

/// A fully analyzed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Directive {
    Patch(PatchDirective),
    Create(CreateDirective),
    Delete(DeleteDirective),
    Get(GetDirective),
}

impl Directive {
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Patch(_) => "patch",
            Directive::Create(_) => "create",
            Directive::Delete(_) => "delete",
            Directive::Get(_) => "get",
        }
    }

    /// Returns true if applying this directive modifies the table.
    pub fn is_mutation(&self) -> bool {
        match self {
            Directive::Patch(_) => true,
            Directive::Create(_) => true,
            Directive::Delete(_) => true,
            Directive::Get(_) => false,
        }
    }

    /// Name of the single record targeted, or `None` for `all`.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            Directive::Patch(d) => Some(d.target.name()),
            Directive::Create(d) => Some(&d.target.name),
            Directive::Delete(d) => d.target.name(),
            Directive::Get(d) => match &d.target {
                GetTarget::All(_) => None,
                GetTarget::One(one) => Some(&one.name),
            },
        }
    }

    /// Record name and OCN the execution layer must match before applying.
    pub fn ocn_guard(&self) -> Option<(&str, u64)> {
        match self {
            Directive::Patch(d) => Some((d.target.name(), d.target.ocn)),
            Directive::Delete(DeleteDirective {
                target: Target::Ocn(t),
                ..
            }) => Some((t.name(), t.ocn)),
            _ => None,
        }
    }

    pub fn change(&self) -> Option<&AttrChange> {
        match self {
            Directive::Patch(d) => Some(&d.change),
            Directive::Create(d) => Some(&d.change),
            Directive::Delete(_) | Directive::Get(_) => None,
        }
    }
}

impl HasPosition for Directive {
    fn position(&self) -> Position {
        match self {
            Directive::Patch(d) => d.pos,
            Directive::Create(d) => d.pos,
            Directive::Delete(d) => d.pos,
            Directive::Get(d) => d.pos,
        }
    }
}

impl HasPosition for GetTarget {
    fn position(&self) -> Position {
        match self {
            GetTarget::All(t) => t.pos,
            GetTarget::One(t) => t.pos,
        }
    }
}
