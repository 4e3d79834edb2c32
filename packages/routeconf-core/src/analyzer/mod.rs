//! Semantic analysis of parsed requests.
//!
//! Converts request syntax into directives that can be applied to the live
//! routing table. A directive can still fail at execution time, for example
//! on an OCN clash; that is only detectable against stored state and is the
//! execution layer's business.

use std::sync::OnceLock;

use crate::addr::AddrResolver;
use crate::change::AttrChange;
use crate::config::AnalyzerConfig;
use crate::directive::{
    CreateDirective, DeleteDirective, Directive, GetDirective, GetTarget, PatchDirective,
};
use crate::error::ConfError;
use crate::position::HasPosition;
use crate::syntax::{ActionSyntax, PropertyMap, RequestSyntax, TargetSpecSyntax, Token};
use crate::target::{Target, TargetAll, TargetOcn, TargetOne};


/// Analyzes requests against one address-resolution setup.
///
/// Holds no mutable state; a single analyzer can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Analyzer {
    resolver: AddrResolver,
}

static DEFAULT_ANALYZER: OnceLock<Analyzer> = OnceLock::new();

/// Analyzes one request with the default configuration, which reads the
/// platform services file once per process.
pub fn analyze(req: &RequestSyntax) -> Result<Directive, ConfError> {
    DEFAULT_ANALYZER.get_or_init(Analyzer::default).analyze(req)
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self::with_resolver(config.build_resolver())
    }

    pub fn with_resolver(resolver: AddrResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &AddrResolver {
        &self.resolver
    }

    /// Analyzes a request, returning the first error found.
    pub fn analyze(&self, req: &RequestSyntax) -> Result<Directive, ConfError> {
        let result = match &req.action {
            ActionSyntax::Patch { props, .. } => self.analyze_patch(req, props).map(Directive::Patch),
            ActionSyntax::Create { props, .. } => {
                self.analyze_create(req, props).map(Directive::Create)
            }
            ActionSyntax::Get { .. } => analyze_get(req).map(Directive::Get),
            ActionSyntax::Delete { .. } => analyze_delete(req).map(Directive::Delete),
        };

        match &result {
            Ok(directive) => tracing::debug!(
                action = directive.keyword(),
                target = directive.target_name().unwrap_or("all"),
                "analyzed request"
            ),
            Err(e) => tracing::debug!(action = req.action.keyword(), "rejected request: {}", e),
        }
        result
    }

    fn analyze_patch(
        &self,
        req: &RequestSyntax,
        props: &PropertyMap,
    ) -> Result<PatchDirective, ConfError> {
        let TargetSpecSyntax::Ocn { name, ocn } = &req.target else {
            return Err(bad_target(req, "a versioned target"));
        };

        let target = ocn_target(&req.target, name, ocn)?;
        let change = AttrChange::from_props(props, &self.resolver)?;

        Ok(PatchDirective {
            pos: req.action.position(),
            target,
            change,
        })
    }

    fn analyze_create(
        &self,
        req: &RequestSyntax,
        props: &PropertyMap,
    ) -> Result<CreateDirective, ConfError> {
        let TargetSpecSyntax::One { name } = &req.target else {
            return Err(bad_target(req, "a named target"));
        };

        let target = one_target(name)?;
        let change = AttrChange::from_props(props, &self.resolver)?;

        Ok(CreateDirective {
            pos: req.action.position(),
            target,
            change,
        })
    }
}

fn analyze_get(req: &RequestSyntax) -> Result<GetDirective, ConfError> {
    let target = match &req.target {
        TargetSpecSyntax::All { pos } => GetTarget::All(TargetAll { pos: *pos }),
        TargetSpecSyntax::One { name } => GetTarget::One(one_target(name)?),
        TargetSpecSyntax::Ocn { .. } => return Err(bad_target(req, "all or a named target")),
    };

    Ok(GetDirective {
        pos: req.action.position(),
        target,
    })
}

fn analyze_delete(req: &RequestSyntax) -> Result<DeleteDirective, ConfError> {
    let target = match &req.target {
        TargetSpecSyntax::All { pos } => Target::All(TargetAll { pos: *pos }),
        TargetSpecSyntax::One { name } => Target::One(one_target(name)?),
        TargetSpecSyntax::Ocn { name, ocn } => Target::Ocn(ocn_target(&req.target, name, ocn)?),
    };

    Ok(DeleteDirective {
        pos: req.action.position(),
        target,
    })
}

fn bad_target(req: &RequestSyntax, expected: &'static str) -> ConfError {
    ConfError::BadTarget {
        pos: req.target.position(),
        action: req.action.keyword(),
        expected,
        got: req.target.shape(),
    }
}

fn one_target(name: &Token) -> Result<TargetOne, ConfError> {
    if name.lexeme.is_empty() {
        return Err(ConfError::field_value(name, "Record name must not be empty"));
    }
    Ok(TargetOne {
        pos: name.pos,
        name: name.lexeme.clone(),
    })
}

fn ocn_target(spec: &TargetSpecSyntax, name: &Token, ocn: &Token) -> Result<TargetOcn, ConfError> {
    let one = one_target(name)?;
    let ocn = parse_ocn(ocn)?;
    Ok(TargetOcn {
        pos: spec.position(),
        one,
        ocn,
    })
}

/// Parses an OCN lexeme as an unsigned decimal `u64`. Signs, whitespace and
/// other radixes are rejected.
fn parse_ocn(token: &Token) -> Result<u64, ConfError> {
    let text = token.lexeme.as_str();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfError::field_value(
            token,
            format!("Could not parse OCN {text:?}: invalid syntax"),
        ));
    }
    text.parse::<u64>().map_err(|_| {
        ConfError::field_value(token, format!("Could not parse OCN {text:?}: value out of range"))
    })
}
