//! Plain-text outline of converted elements, one line per element and two
//! spaces of indentation per nesting level.

use std::fmt::Write as _;

use strider_core::{CodeElement, DelegateCall, Fragment, Param};

pub(crate) fn render(elements: &[CodeElement]) -> String {
    let mut out = String::new();
    block(&mut out, elements, 0);
    out
}

fn block(out: &mut String, elements: &[CodeElement], depth: usize) {
    for element in elements {
        render_element(out, element, depth);
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    let _ = writeln!(out, "{:width$}{}", "", text, width = depth * 2);
}

fn render_element(out: &mut String, element: &CodeElement, depth: usize) {
    match element {
        CodeElement::If {
            condition,
            then_block,
            else_if_conditions,
            else_if_blocks,
            else_block,
        } => {
            line(out, depth, &format!("if {}", condition.text()));
            block(out, then_block, depth + 1);
            for (cond, body) in else_if_conditions.iter().zip(else_if_blocks) {
                line(out, depth, &format!("else if {}", cond.text()));
                block(out, body, depth + 1);
            }
            if let Some(body) = else_block {
                line(out, depth, "else");
                block(out, body, depth + 1);
            }
        }
        CodeElement::While { condition, body } => {
            line(out, depth, &format!("while {}", condition.text()));
            block(out, body, depth + 1);
        }
        CodeElement::Return { value: None } => line(out, depth, "return"),
        CodeElement::Return { value: Some(v) } => {
            line(out, depth, &format!("return {}", v.text()))
        }
        CodeElement::Call { expression } => line(out, depth, expression.text()),
        CodeElement::Assign { target, value } => {
            line(out, depth, &format!("{} = {}", target.text(), value.text()))
        }
        CodeElement::Var {
            is_final,
            var_type,
            name,
            value,
        } => {
            let mut text = String::new();
            if *is_final {
                text.push_str("final ");
            }
            let _ = write!(text, "var {} {}", var_type.text(), name.text());
            if let Some(v) = value {
                let _ = write!(text, " = {}", v.text());
            }
            line(out, depth, &text);
        }
        CodeElement::Break => line(out, depth, "break"),
        CodeElement::Continue => line(out, depth, "continue"),
        CodeElement::Throw { expression } => {
            line(out, depth, &format!("throw {}", expression.text()))
        }
        CodeElement::NormalMethod {
            documentation,
            access,
            is_static,
            is_final,
            return_type,
            name,
            params,
            throws,
            body,
        } => {
            doc(out, depth, documentation.as_deref());
            let mut head = access.keyword().to_owned();
            if *is_static {
                head.push_str(" static");
            }
            if *is_final {
                head.push_str(" final");
            }
            let _ = write!(
                head,
                " {} {}{}",
                return_type.text(),
                name.text(),
                signature(params, throws)
            );
            line(out, depth, &head);
            block(out, body, depth + 1);
        }
        CodeElement::AbstractMethod {
            documentation,
            access,
            return_type,
            name,
            params,
            throws,
        } => {
            doc(out, depth, documentation.as_deref());
            let head = format!(
                "{} abstract {} {}{}",
                access.keyword(),
                return_type.text(),
                name.text(),
                signature(params, throws)
            );
            line(out, depth, &head);
        }
        CodeElement::Constructor {
            documentation,
            access,
            params,
            throws,
            delegate,
            body,
        } => {
            doc(out, depth, documentation.as_deref());
            let head = format!("{} constructor{}", access.keyword(), signature(params, throws));
            line(out, depth, &head);
            if let Some(DelegateCall { kind, args }) = delegate {
                line(out, depth + 1, &format!("{}({})", kind.keyword(), args.text()));
            }
            block(out, body, depth + 1);
        }
    }
}

fn doc(out: &mut String, depth: usize, documentation: Option<&str>) {
    for text in documentation.into_iter().flat_map(str::lines) {
        line(out, depth, format!("# {}", text).trim_end());
    }
}

fn signature(params: &[Param], throws: &[Fragment]) -> String {
    let params: Vec<String> = params
        .iter()
        .map(|p| format!("{} {}", p.param_type.text(), p.name.text()))
        .collect();
    let mut sig = format!("({})", params.join(", "));
    if !throws.is_empty() {
        let names: Vec<&str> = throws.iter().map(Fragment::text).collect();
        let _ = write!(sig, " throws {}", names.join(", "));
    }
    sig
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_statements_are_indented() {
        let conversion = strider_core::convert(
            "if (x > 0) { return x; } else if (x < 0) { n = 0 - x; } else { while (a) break; }",
        )
        .unwrap();
        assert_eq!(
            render(&conversion.elements),
            "if x > 0\n  return x\nelse if x < 0\n  n = 0 - x\nelse\n  while a\n    break\n"
        );
    }

    #[test]
    fn declarations_show_their_header() {
        let src = "/** Area.\n *\n * Never negative. */\n\
                   public abstract double area(int scale) throws E;\n\
                   Point(int x) { super(x, 0); final int y = x; }";
        let conversion = strider_core::convert(src).unwrap();
        assert_eq!(
            render(&conversion.elements),
            "# Area.\n#\n# Never negative.\n\
             public abstract double area(int scale) throws E\n\
             protected constructor(int x)\n  super(x,0)\n  final var int y = x\n"
        );
    }
}
