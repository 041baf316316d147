//! Code elements produced by the converter.
//!
//! Elements are the finished nodes of the frame tree. They hold fragments of
//! source text tagged with their syntactic role; nothing here is resolved
//! semantically.

use serde::Serialize;

// ──────────────────────────────────────────────
// Fragments
// ──────────────────────────────────────────────

/// A slice of source text tagged with the role it plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "text", rename_all = "snake_case")]
pub enum Fragment {
    Type(String),
    Name(String),
    Expression(String),
}

impl Fragment {
    pub fn ty(text: impl Into<String>) -> Self {
        Fragment::Type(text.into())
    }

    pub fn name(text: impl Into<String>) -> Self {
        Fragment::Name(text.into())
    }

    pub fn expr(text: impl Into<String>) -> Self {
        Fragment::Expression(text.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Fragment::Type(t) | Fragment::Name(t) | Fragment::Expression(t) => t,
        }
    }
}

// ──────────────────────────────────────────────
// Declaration parts
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Private,
    /// Used when a declaration names no access modifier
    #[default]
    Protected,
    Public,
}

impl AccessLevel {
    pub const KEYWORDS: [(&'static str, AccessLevel); 3] = [
        ("public", AccessLevel::Public),
        ("protected", AccessLevel::Protected),
        ("private", AccessLevel::Private),
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::Protected => "protected",
            AccessLevel::Public => "public",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub param_type: Fragment,
    pub name: Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegateKind {
    Super,
    This,
}

impl DelegateKind {
    /// Classify the keyword that opens a constructor delegation call.
    pub fn classify(target: &str) -> Option<DelegateKind> {
        match target {
            "super" => Some(DelegateKind::Super),
            "this" => Some(DelegateKind::This),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            DelegateKind::Super => "super",
            DelegateKind::This => "this",
        }
    }
}

/// A constructor's explicit `super(...)` or `this(...)` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegateCall {
    pub kind: DelegateKind,
    /// Top-level argument texts joined with `,`
    pub args: Fragment,
}

// ──────────────────────────────────────────────
// Elements
// ──────────────────────────────────────────────

pub type Block = Vec<CodeElement>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum CodeElement {
    If {
        condition: Fragment,
        then_block: Block,
        /// Parallel to `else_if_blocks`
        else_if_conditions: Vec<Fragment>,
        else_if_blocks: Vec<Block>,
        else_block: Option<Block>,
    },
    While {
        condition: Fragment,
        body: Block,
    },
    Return {
        value: Option<Fragment>,
    },
    /// Any statement-expression that is not a plain assignment
    Call {
        expression: Fragment,
    },
    Assign {
        target: Fragment,
        value: Fragment,
    },
    Var {
        is_final: bool,
        var_type: Fragment,
        name: Fragment,
        value: Option<Fragment>,
    },
    Break,
    Continue,
    Throw {
        expression: Fragment,
    },
    NormalMethod {
        documentation: Option<String>,
        access: AccessLevel,
        is_static: bool,
        is_final: bool,
        return_type: Fragment,
        name: Fragment,
        params: Vec<Param>,
        throws: Vec<Fragment>,
        body: Block,
    },
    /// A method declared without a body
    AbstractMethod {
        documentation: Option<String>,
        access: AccessLevel,
        return_type: Fragment,
        name: Fragment,
        params: Vec<Param>,
        throws: Vec<Fragment>,
    },
    Constructor {
        documentation: Option<String>,
        access: AccessLevel,
        params: Vec<Param>,
        throws: Vec<Fragment>,
        delegate: Option<DelegateCall>,
        body: Block,
    },
}

impl CodeElement {
    pub fn kind_name(&self) -> &'static str {
        match self {
            CodeElement::If { .. } => "if",
            CodeElement::While { .. } => "while",
            CodeElement::Return { .. } => "return",
            CodeElement::Call { .. } => "call",
            CodeElement::Assign { .. } => "assign",
            CodeElement::Var { .. } => "var",
            CodeElement::Break => "break",
            CodeElement::Continue => "continue",
            CodeElement::Throw { .. } => "throw",
            CodeElement::NormalMethod { .. } => "normal_method",
            CodeElement::AbstractMethod { .. } => "abstract_method",
            CodeElement::Constructor { .. } => "constructor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_serializes_with_role_tag() {
        let v = serde_json::to_value(Fragment::ty("String")).unwrap();
        assert_eq!(v, serde_json::json!({"role": "type", "text": "String"}));
    }

    #[test]
    fn element_serializes_with_element_tag() {
        let e = CodeElement::Return {
            value: Some(Fragment::expr("x")),
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["element"], "return");
        assert_eq!(v["value"]["text"], "x");

        let v = serde_json::to_value(CodeElement::Break).unwrap();
        assert_eq!(v, serde_json::json!({"element": "break"}));
    }

    #[test]
    fn delegate_kind_classifies_only_keywords() {
        assert_eq!(DelegateKind::classify("super"), Some(DelegateKind::Super));
        assert_eq!(DelegateKind::classify("this"), Some(DelegateKind::This));
        assert_eq!(DelegateKind::classify("self"), None);
    }

    #[test]
    fn default_access_is_protected() {
        assert_eq!(AccessLevel::default(), AccessLevel::Protected);
        assert_eq!(AccessLevel::default().keyword(), "protected");
    }
}
