use serde::Serialize;

/// All errors a conversion run can return.
///
/// `Syntax` and `Io` are problems with the input. The remaining variants mean
/// the event stream did not follow the protocol the converter relies on; they
/// are defects in the event producer (or in the converter) and never user
/// mistakes to be recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvertError {
    /// The handler on top of a stack was not the one the event requires.
    #[error("protocol violation: expected {expected}, found {actual}")]
    Protocol { expected: String, actual: String },

    /// A handler was required but the stack was empty.
    #[error("protocol violation: {stack} stack is empty")]
    EmptyStack { stack: &'static str },

    /// More than one access modifier on a single declaration.
    #[error("conflicting access modifiers: {}", modifiers.join(" "))]
    ModifierConflict { modifiers: Vec<String> },

    /// The reference scanner could not recognize the source text.
    #[error("line {line}: {message}")]
    Syntax { line: u32, message: String },

    /// The source could not be read.
    #[error("error reading '{path}': {message}")]
    Io { path: String, message: String },
}

impl ConvertError {
    pub fn protocol(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ConvertError::Protocol {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        ConvertError::Syntax {
            line,
            message: message.into(),
        }
    }

    /// True for errors caused by the input rather than by a broken event stream.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ConvertError::Syntax { .. } | ConvertError::Io { .. })
    }

    /// Serialize to JSON for machine-readable CLI output.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "detail": serde_json::to_value(self).unwrap_or(serde_json::Value::Null),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_message_names_both_states() {
        let e = ConvertError::protocol("if-chain builder", "root");
        assert_eq!(
            e.to_string(),
            "protocol violation: expected if-chain builder, found root"
        );
        assert!(!e.is_input_error());
    }

    #[test]
    fn json_value_carries_kind_tag() {
        let e = ConvertError::syntax(3, "unexpected character '#'");
        let v = e.to_json_value();
        assert_eq!(v["error"], "line 3: unexpected character '#'");
        assert_eq!(v["detail"]["kind"], "syntax");
        assert_eq!(v["detail"]["line"], 3);
        assert!(e.is_input_error());
    }

    #[test]
    fn modifier_conflict_lists_modifiers() {
        let e = ConvertError::ModifierConflict {
            modifiers: vec!["public".into(), "private".into()],
        };
        assert_eq!(e.to_string(), "conflicting access modifiers: public private");
    }
}
