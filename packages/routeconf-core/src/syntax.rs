//! Parsed request syntax handed over by the lexer/parser.
//!
//! These are plain data. Tokens keep their lexeme verbatim, including any
//! surrounding quote characters, together with the position they were read
//! from. Requests can also be loaded from JSON, which is how the command-line
//! tool and the integration tests feed the analyzer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::position::{HasPosition, Position};

/// Property names the parser is allowed to emit.
pub const ATTR_NAMES: [&str; 4] = ["addr", "dbnameIn", "dbnameRewritten", "lock"];

/// A lexeme and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub lexeme: String,
    pub pos: Position,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, pos: Position) -> Self {
        Self {
            lexeme: lexeme.into(),
            pos,
        }
    }
}

impl HasPosition for Token {
    fn position(&self) -> Position {
        self.pos
    }
}

/// Target as written by the user, before any semantic checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetSpecSyntax {
    /// `all`
    All { pos: Position },
    /// `[name]`
    One { name: Token },
    /// `[name, ocn]`
    Ocn { name: Token, ocn: Token },
}

impl TargetSpecSyntax {
    /// Short shape name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            TargetSpecSyntax::All { .. } => "all",
            TargetSpecSyntax::One { .. } => "a named target",
            TargetSpecSyntax::Ocn { .. } => "a versioned target",
        }
    }
}

impl HasPosition for TargetSpecSyntax {
    fn position(&self) -> Position {
        match self {
            TargetSpecSyntax::All { pos } => *pos,
            TargetSpecSyntax::One { name } | TargetSpecSyntax::Ocn { name, .. } => name.pos,
        }
    }
}

/// One `name = value` entry as it appears in serialized requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: Token,
    pub value: Token,
}

/// Mapping from property-name token to value token.
///
/// Iteration order is unspecified. Each property name appears at most once.
/// Deserialization enforces the parser contract and rejects names outside
/// [`ATTR_NAMES`] as well as repeated names; [`PropertyMap::insert`] performs
/// no name check and replaces an earlier entry with the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Property>", into = "Vec<Property>")]
pub struct PropertyMap(HashMap<Token, Token>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a property, replacing any entry with the same name regardless
    /// of where that name was written. Returns the replaced value.
    pub fn insert(&mut self, name: Token, value: Token) -> Option<Token> {
        let previous = self.remove(&name.lexeme);
        self.0.insert(name, value);
        previous
    }

    /// Removes the entry named `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Token> {
        let key = self.0.keys().find(|k| k.lexeme == name).cloned()?;
        self.0.remove(&key)
    }

    pub fn get(&self, name: &str) -> Option<&Token> {
        self.0
            .iter()
            .find_map(|(k, v)| (k.lexeme == name).then_some(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &Token)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Token, Token)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (Token, Token)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl TryFrom<Vec<Property>> for PropertyMap {
    type Error = String;

    fn try_from(props: Vec<Property>) -> Result<Self, Self::Error> {
        let mut map = PropertyMap::new();
        for Property { name, value } in props {
            if !ATTR_NAMES.contains(&name.lexeme.as_str()) {
                return Err(format!(
                    "{}: unrecognized property {:?}, expected one of {}",
                    name.pos,
                    name.lexeme,
                    ATTR_NAMES.join(", ")
                ));
            }
            if map.get(&name.lexeme).is_some() {
                return Err(format!(
                    "{}: property {:?} given more than once",
                    name.pos, name.lexeme
                ));
            }
            map.insert(name, value);
        }
        Ok(map)
    }
}

impl From<PropertyMap> for Vec<Property> {
    fn from(map: PropertyMap) -> Self {
        let mut props: Vec<Property> = map
            .0
            .into_iter()
            .map(|(name, value)| Property { name, value })
            .collect();
        props.sort_by_key(|p| p.name.pos);
        props
    }
}

/// The action keyword of a request and, for mutating actions, its properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionSyntax {
    Patch {
        pos: Position,
        #[serde(default)]
        props: PropertyMap,
    },
    Create {
        pos: Position,
        #[serde(default)]
        props: PropertyMap,
    },
    Get {
        pos: Position,
    },
    Delete {
        pos: Position,
    },
}

impl ActionSyntax {
    pub fn keyword(&self) -> &'static str {
        match self {
            ActionSyntax::Patch { .. } => "patch",
            ActionSyntax::Create { .. } => "create",
            ActionSyntax::Get { .. } => "get",
            ActionSyntax::Delete { .. } => "delete",
        }
    }
}

impl HasPosition for ActionSyntax {
    fn position(&self) -> Position {
        match self {
            ActionSyntax::Patch { pos, .. }
            | ActionSyntax::Create { pos, .. }
            | ActionSyntax::Get { pos }
            | ActionSyntax::Delete { pos } => *pos,
        }
    }
}

/// A complete parsed request: one action applied to one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSyntax {
    pub action: ActionSyntax,
    pub target: TargetSpecSyntax,
}

impl RequestSyntax {
    /// Loads a request from its JSON form.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl HasPosition for RequestSyntax {
    fn position(&self) -> Position {
        self.action.position()
    }
}
