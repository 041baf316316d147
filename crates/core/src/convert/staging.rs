//! Partially-built declarations, assembled piece by piece as the scanner
//! reports a header, its parameters, its throws clause and its body.

use crate::element::{
    AccessLevel, Block, CodeElement, DelegateCall, DelegateKind, Fragment, Param,
};
use crate::error::ConvertError;

/// One method or constructor under construction.
#[derive(Debug)]
pub(super) struct DeclarationStaging {
    /// Absent for constructors
    pub(super) name: Option<Fragment>,
    pub(super) return_type: Option<Fragment>,
    pub(super) modifiers: Vec<String>,
    pub(super) params: Vec<Param>,
    pub(super) throws: Vec<Fragment>,
    pub(super) documentation: Option<String>,
    pub(super) delegate: Option<(DelegateKind, Vec<String>)>,
    pub(super) line: u32,
}

impl DeclarationStaging {
    pub(super) fn method(
        name: Fragment,
        return_type: Fragment,
        modifiers: Vec<String>,
        documentation: Option<String>,
        line: u32,
    ) -> Self {
        DeclarationStaging {
            name: Some(name),
            return_type: Some(return_type),
            modifiers,
            params: Vec::new(),
            throws: Vec::new(),
            documentation,
            delegate: None,
            line,
        }
    }

    pub(super) fn constructor(
        modifiers: Vec<String>,
        documentation: Option<String>,
        line: u32,
    ) -> Self {
        DeclarationStaging {
            name: None,
            return_type: None,
            modifiers,
            params: Vec::new(),
            throws: Vec::new(),
            documentation,
            delegate: None,
            line,
        }
    }

    pub(super) fn is_constructor(&self) -> bool {
        self.name.is_none()
    }

    pub(super) fn describe(&self) -> &'static str {
        if self.is_constructor() {
            "constructor declaration"
        } else {
            "method declaration"
        }
    }

    /// Resolve modifiers and produce the finished element. `body` is `None`
    /// for a declaration without a body. Leftover modifiers are returned
    /// for the caller to report.
    pub(super) fn into_element(
        self,
        body: Option<Block>,
    ) -> Result<(CodeElement, Vec<String>), ConvertError> {
        let mut modifiers = self.modifiers;
        let access = resolve_access(&mut modifiers)?;
        let delegate = self.delegate.map(|(kind, args)| DelegateCall {
            kind,
            args: Fragment::expr(args.join(",")),
        });

        let element = match (self.name, self.return_type, body) {
            (None, _, body) => CodeElement::Constructor {
                documentation: self.documentation,
                access,
                params: self.params,
                throws: self.throws,
                delegate,
                body: body.unwrap_or_default(),
            },
            (Some(name), Some(return_type), Some(body)) => {
                let is_static = take_flag(&mut modifiers, "static");
                let is_final = take_flag(&mut modifiers, "final");
                CodeElement::NormalMethod {
                    documentation: self.documentation,
                    access,
                    is_static,
                    is_final,
                    return_type,
                    name,
                    params: self.params,
                    throws: self.throws,
                    body,
                }
            }
            (Some(name), Some(return_type), None) => {
                // Without a body the method is abstract by definition
                take_flag(&mut modifiers, "abstract");
                CodeElement::AbstractMethod {
                    documentation: self.documentation,
                    access,
                    return_type,
                    name,
                    params: self.params,
                    throws: self.throws,
                }
            }
            (Some(name), None, _) => {
                return Err(ConvertError::protocol(
                    "method declaration with a return type",
                    format!("method '{}' without one", name.text()),
                ))
            }
        };
        Ok((element, modifiers))
    }
}

/// One local variable declaration; shared by all of its declarators.
#[derive(Debug)]
pub(super) struct VarDecl {
    pub(super) is_final: bool,
    pub(super) var_type: Fragment,
}

impl VarDecl {
    pub(super) fn element(&self, name: Fragment, value: Option<Fragment>) -> CodeElement {
        CodeElement::Var {
            is_final: self.is_final,
            var_type: self.var_type.clone(),
            name,
            value,
        }
    }
}

/// Remove the access keyword from `modifiers` and return its level.
/// No access keyword means the default level.
pub(super) fn resolve_access(modifiers: &mut Vec<String>) -> Result<AccessLevel, ConvertError> {
    let found: Vec<AccessLevel> = AccessLevel::KEYWORDS
        .iter()
        .filter(|(kw, _)| modifiers.iter().any(|m| m == kw))
        .map(|(_, level)| *level)
        .collect();
    if found.len() > 1 {
        return Err(ConvertError::ModifierConflict {
            modifiers: found.iter().map(|l| l.keyword().to_owned()).collect(),
        });
    }
    modifiers.retain(|m| !AccessLevel::KEYWORDS.iter().any(|(kw, _)| m == kw));
    Ok(found.first().copied().unwrap_or_default())
}

/// Remove every occurrence of `keyword`, returning whether there was one.
pub(super) fn take_flag(modifiers: &mut Vec<String>, keyword: &str) -> bool {
    let before = modifiers.len();
    modifiers.retain(|m| m != keyword);
    modifiers.len() != before
}
