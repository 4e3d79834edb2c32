//! Attribute changes requested against a routing record.
//!
//! [`AttrChange`] lists the mutable attributes of a record explicitly, one
//! optional slot per attribute, instead of a dynamic map. A slot is `Some`
//! exactly when the request mentioned that attribute, and it then carries
//! the position of the value token that set it.

use std::net::SocketAddr;

use serde::Serialize;

use crate::addr::AddrResolver;
use crate::error::ConfError;
use crate::position::{HasPosition, Position};
use crate::syntax::{PropertyMap, Token};

/// A value paired with the source position that requested it.
///
/// Contract for anyone building an [`AttrChange`] by hand: a present field
/// must point at real source text. Construct anchors from the token (or other
/// [`HasPosition`] value) the field came from; never invent a position for a
/// field that has no origin in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anchored<T> {
    pos: Position,
    value: T,
}

impl<T> Anchored<T> {
    pub fn new(anchor: impl HasPosition, value: T) -> Self {
        Self {
            pos: anchor.position(),
            value,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> HasPosition for Anchored<T> {
    fn position(&self) -> Position {
        self.pos
    }
}

/// Sparse description of the attribute changes in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttrChange {
    pub addr: Option<Anchored<SocketAddr>>,
    pub dbname_in: Option<Anchored<String>>,
    pub dbname_rewritten: Option<Anchored<String>>,
    pub lock: Option<Anchored<bool>>,
}

impl AttrChange {
    /// Builds a change from property tokens.
    ///
    /// Stops at the first invalid value. The order in which properties are
    /// visited is unspecified.
    ///
    /// # Panics
    /// On a property name outside [`crate::syntax::ATTR_NAMES`]: the parser
    /// must never produce one.
    pub fn from_props(props: &PropertyMap, resolver: &AddrResolver) -> Result<Self, ConfError> {
        let mut change = AttrChange::default();

        for (name, value) in props.iter() {
            tracing::trace!(field = %name.lexeme, value = %value.lexeme, pos = %value.pos, "attribute");
            match name.lexeme.as_str() {
                "addr" => {
                    let text = strip_quotes(value)?;
                    let addr = resolver.resolve(text).map_err(|e| {
                        ConfError::field_value(value, format!("Invalid addr {}: {}", value.lexeme, e))
                    })?;
                    change.addr = Some(Anchored::new(value, addr));
                }
                "dbnameIn" => {
                    change.dbname_in = Some(Anchored::new(value, value.lexeme.clone()));
                }
                "dbnameRewritten" => {
                    change.dbname_rewritten = Some(Anchored::new(value, value.lexeme.clone()));
                }
                "lock" => {
                    strip_quotes(value)?;
                    // Compare with quotes so the error echoes what was typed.
                    let lock = match value.lexeme.as_str() {
                        "'true'" => true,
                        "'false'" => false,
                        other => {
                            return Err(ConfError::field_value(
                                value,
                                format!("Could not recognize lock literal {other}, choose 'true' or 'false'"),
                            ))
                        }
                    };
                    change.lock = Some(Anchored::new(value, lock));
                }
                other => panic!(
                    "{}: unhandleable property name {:?} reached the analyzer",
                    name.pos, other
                ),
            }
        }

        Ok(change)
    }

    /// True when the request touched no attribute at all.
    pub fn is_empty(&self) -> bool {
        self.requested_fields().is_empty()
    }

    /// Property names of the attributes this change sets.
    pub fn requested_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.addr.is_some() {
            fields.push("addr");
        }
        if self.dbname_in.is_some() {
            fields.push("dbnameIn");
        }
        if self.dbname_rewritten.is_some() {
            fields.push("dbnameRewritten");
        }
        if self.lock.is_some() {
            fields.push("lock");
        }
        fields
    }
}

/// Removes exactly one layer of single-character quotes.
///
/// Only `'...'` and `"..."` are understood. Any other form (unquoted text,
/// mismatched quotes, dollar quoting) is rejected rather than guessed at.
fn strip_quotes(token: &Token) -> Result<&str, ConfError> {
    let lexeme = token.lexeme.as_str();
    let bytes = lexeme.as_bytes();
    let quoted = bytes.len() >= 2
        && matches!(bytes[0], b'\'' | b'"')
        && bytes[bytes.len() - 1] == bytes[0];
    if !quoted {
        return Err(ConfError::field_value(
            token,
            format!("Unsupported quoting in literal {lexeme}, expected a '...' string"),
        ));
    }
    Ok(&lexeme[1..lexeme.len() - 1])
}
