//! TypeScript output.

use super::curly::{CurlyBrace, CurlyDialect, json_literal, parameter_list};
use crate::context::RenderContext;
use crate::indent::K_AND_R;
use crate::naming::snake_to_lower_camel;
use crate::ops::{self, OpKind};
use crate::range::RangeDescriptor;
use crate::traits::{Declaration, HookResult, SequenceKind, Signature, Unsupported};
use glossa_syntax::{Alias, CmpOp, Constant};

/// Static instance for registry.
pub static TYPESCRIPT_BACKEND: CurlyBrace<TypeScript> =
    CurlyBrace::new(TypeScript::new(true), &K_AND_R);

/// TypeScript dialect.
#[derive(Debug, Clone, Copy)]
pub struct TypeScript {
    /// Emit `: T` annotations on declarations, parameters and returns.
    pub type_annotations: bool,
}

impl TypeScript {
    pub const fn new(type_annotations: bool) -> Self {
        Self { type_annotations }
    }
}

impl Default for TypeScript {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CurlyDialect for TypeScript {
    fn target(&self) -> &'static str {
        "ts"
    }

    fn language(&self) -> &'static str {
        "TypeScript"
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["in"]
    }

    fn operator(&self, op: OpKind) -> &'static str {
        match op {
            OpKind::Compare(CmpOp::Is) => "===",
            OpKind::Compare(CmpOp::IsNot) => "!==",
            op => ops::c_like(op),
        }
    }

    fn styled_name(&self, name: &str) -> String {
        let name = name.trim_matches('_');
        let name = if self.keywords().contains(&name) {
            format!("{}_", name)
        } else {
            name.to_string()
        };
        let head = name.strip_suffix('_').unwrap_or(name.as_str());
        if head.contains('_') {
            snake_to_lower_camel(&name)
        } else {
            name
        }
    }

    fn constant(&self, value: &Constant, annotation: bool) -> String {
        match value {
            Constant::None if annotation => "void".into(),
            value => json_literal(value, annotation),
        }
    }

    fn rename(&self, name: &str, _annotation: bool) -> Option<String> {
        match name {
            "math" => Some("Math".into()),
            "NVector" => Some("Vector".into()),
            "min" | "max" => Some(format!("Math.{}", name)),
            _ => None,
        }
    }

    fn rename_attribute(&self, object: &str, member: &str) -> Option<String> {
        match (object, member) {
            ("Math", "pi") => Some("Math.PI".into()),
            _ => None,
        }
    }

    fn call(&self, func: &str, args: &[String]) -> String {
        let constructor = func.starts_with(|c: char| c.is_ascii_uppercase())
            && func.chars().all(|c| c.is_ascii_alphanumeric());
        if constructor {
            format!("new {}({})", func, args.join(", "))
        } else {
            format!("{}({})", func, args.join(", "))
        }
    }

    fn sequence(&self, kind: SequenceKind, elements: &[String]) -> String {
        match kind {
            SequenceKind::Set => format!("new Set([{}])", elements.join(", ")),
            SequenceKind::Tuple | SequenceKind::List => format!("[{}]", elements.join(", ")),
        }
    }

    fn dict(&self, pairs: &[(String, String)]) -> String {
        let pairs: Vec<String> = pairs
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }

    fn slice(&self, value: &str, range: &RangeDescriptor) -> HookResult<String> {
        if range.step.is_some() {
            return Err(Unsupported);
        }
        let start = range.start.as_deref().unwrap_or("undefined");
        Ok(match &range.stop {
            Some(stop) => format!("{}.slice({}, {})", value, start, stop),
            None => format!("{}.slice({})", value, start),
        })
    }

    fn capture_pattern(&self, name: &str) -> HookResult<String> {
        Ok(self.styled_name(name))
    }

    fn class_header(&self, name: &str, bases: &[String]) -> String {
        if bases.is_empty() {
            format!("class {}", name)
        } else {
            format!("class {} extends {}", name, bases.join(", "))
        }
    }

    fn function_header(&self, _cx: &RenderContext<'_>, signature: &Signature) -> HookResult<String> {
        let mut header = String::new();
        if signature.is_async {
            header.push_str("async ");
        }

        let name = match (signature.is_method, signature.name.as_str()) {
            (false, name) => {
                header.push_str("function ");
                self.styled_name(name)
            }
            (true, "__init__") => "constructor".to_string(),
            (true, "__str__" | "__repr__") => "toString".to_string(),
            (true, name) => {
                if signature.is_getter {
                    header.push_str("get ");
                }
                self.styled_name(name)
            }
        };

        let params = parameter_list(signature, |param| {
            let name = self.styled_name(&param.name);
            match &param.annotation {
                Some(annotation) if self.type_annotations => format!("{}: {}", name, annotation),
                _ => name,
            }
        });

        header.push_str(&format!("{}({})", name, params));
        if let Some(returns) = &signature.returns {
            if self.type_annotations {
                header.push_str(&format!(" : {}", returns));
            }
        }
        Ok(header)
    }

    fn declaration(&self, cx: &RenderContext<'_>, declaration: &Declaration<'_>) -> String {
        let mut code = if cx.class_name().is_some() {
            declaration.target.to_string()
        } else {
            format!("let {}", declaration.target)
        };
        if self.type_annotations {
            code.push_str(&format!(": {}", declaration.annotation));
        }
        if let Some(value) = declaration.value {
            code.push_str(&format!(" = {}", value));
        }
        code.push(';');
        code
    }

    fn counter_type(&self) -> &'static str {
        "let"
    }

    fn each_loop(&self, target: &str, items: &str, is_async: bool) -> HookResult<String> {
        let awaited = if is_async { "await " } else { "" };
        Ok(format!("for {}( let {} of {} )", awaited, target, items))
    }

    fn import(&self, names: &[Alias]) -> HookResult<Vec<String>> {
        Ok(names
            .iter()
            .map(|alias| {
                let local = alias.asname.as_deref().unwrap_or(&alias.name);
                format!("import * as {} from '{}';", local, alias.name)
            })
            .collect())
    }

    fn import_from(&self, module: Option<&str>, names: &[Alias]) -> HookResult<Vec<String>> {
        let module = module.ok_or(Unsupported)?;
        let names: Vec<String> = names
            .iter()
            .map(|alias| match &alias.asname {
                Some(asname) => format!("{} as {}", alias.name, asname),
                None => alias.name.clone(),
            })
            .collect();
        Ok(vec![format!(
            "import {{ {} }} from '{}';",
            names.join(", "),
            module
        )])
    }

    fn delete(&self, targets: &[String]) -> Vec<String> {
        targets
            .iter()
            .map(|target| format!("delete {};", target))
            .collect()
    }

    fn type_alias(&self, name: &str, value: &str) -> String {
        format!("type {} = {};", name, value)
    }
}
