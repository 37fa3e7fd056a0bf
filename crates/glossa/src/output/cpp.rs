//! C++ output.

use super::curly::{CurlyBrace, CurlyDialect, json_literal, parameter_list};
use crate::context::RenderContext;
use crate::indent::ALLMAN;
use crate::traits::{Declaration, HookResult, SequenceKind, Signature, Unsupported};
use glossa_syntax::Constant;

/// Static instance for registry.
pub static CPP_BACKEND: CurlyBrace<Cpp> = CurlyBrace::new(Cpp, &ALLMAN);

/// C++20 dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cpp;

impl CurlyDialect for Cpp {
    fn target(&self) -> &'static str {
        "cpp"
    }

    fn language(&self) -> &'static str {
        "C++"
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["or"]
    }

    fn constant(&self, value: &Constant, annotation: bool) -> String {
        match value {
            Constant::None if annotation => "void".into(),
            Constant::None => "nullptr".into(),
            value => json_literal(value, annotation),
        }
    }

    fn rename(&self, name: &str, _annotation: bool) -> Option<String> {
        match name {
            "min" | "max" | "round" => Some(format!("std::{}", name)),
            _ => None,
        }
    }

    fn rename_attribute(&self, object: &str, member: &str) -> Option<String> {
        match (object, member) {
            ("math", "pi") => Some("std::numbers::pi".into()),
            ("math", member) => Some(format!("std::{}", member)),
            ("this", member) => Some(format!("this->{}", self.styled_name(member))),
            _ => None,
        }
    }

    fn sequence(&self, _kind: SequenceKind, elements: &[String]) -> String {
        format!("{{{}}}", elements.join(", "))
    }

    fn dict(&self, pairs: &[(String, String)]) -> String {
        let pairs: Vec<String> = pairs
            .iter()
            .map(|(key, value)| format!("{{{}, {}}}", key, value))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }

    fn class_header(&self, name: &str, bases: &[String]) -> String {
        if bases.is_empty() {
            return format!("class {}", name);
        }
        let bases: Vec<String> = bases.iter().map(|base| format!("public {}", base)).collect();
        format!("class {} : {}", name, bases.join(", "))
    }

    fn class_closer(&self) -> &'static str {
        "};"
    }

    fn function_header(&self, cx: &RenderContext<'_>, signature: &Signature) -> HookResult<String> {
        if signature.is_async {
            return Err(Unsupported);
        }

        let returns = signature.returns.as_deref().unwrap_or("void");
        let (prefix, name, suffix) = match (signature.is_method, signature.name.as_str()) {
            (true, "__init__") => {
                let class = cx.class_name().ok_or(Unsupported)?;
                (String::new(), class.to_string(), "")
            }
            (true, "__str__" | "__repr__") => {
                (String::new(), "operator std::string".to_string(), " const")
            }
            (_, name) => (format!("{} ", returns), self.styled_name(name), ""),
        };

        let params = parameter_list(signature, |param| {
            format!(
                "{} {}",
                param.annotation.as_deref().unwrap_or("auto"),
                self.styled_name(&param.name)
            )
        });
        Ok(format!("{}{}({}){}", prefix, name, params, suffix))
    }

    fn declaration(&self, _cx: &RenderContext<'_>, declaration: &Declaration<'_>) -> String {
        let Declaration {
            target,
            annotation,
            value,
            value_is_call,
        } = *declaration;

        match value {
            None => format!("{} {};", annotation, target),
            Some(value) => {
                let constructed = annotation.starts_with(|c: char| c.is_ascii_uppercase())
                    && value_is_call
                    && value.ends_with(')');
                let arguments = value
                    .strip_prefix(annotation)
                    .and_then(|rest| rest.strip_prefix('('))
                    .and_then(|rest| rest.strip_suffix(')'));
                match arguments {
                    Some(arguments) if constructed => {
                        format!("{} {}({});", annotation, target, arguments)
                    }
                    _ => format!("{} {} = {};", annotation, target, value),
                }
            }
        }
    }

    fn counter_type(&self) -> &'static str {
        "int"
    }

    fn each_loop(&self, target: &str, items: &str, is_async: bool) -> HookResult<String> {
        if is_async {
            return Err(Unsupported);
        }
        Ok(format!("for ( const auto& {} : {} )", target, items))
    }

    fn type_alias(&self, name: &str, value: &str) -> String {
        format!("using {} = {};", name, value)
    }
}
