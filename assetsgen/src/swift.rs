//! Swift accessor code generation.

use indoc::formatdoc;

use crate::{
    casing::swift_identifier,
    language::LanguageKey,
    types::{StringItem, StringType, escape_quotes},
};

/// One template of generated Swift code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwiftCode {
    Newline,
    Import(String),
    FuncReturnString(LocalizedFunc),
    FuncReturnAttributedString(LocalizedFunc),
    FuncReturnStringArray(LocalizedFunc),
    FuncReturnImage { name: String, image_name: String },
    Enum { name: String, content: Vec<SwiftCode> },
}

/// Accessor of one localized string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedFunc {
    /// Base language value, shown as doc comment.
    pub preview: Option<String>,
    pub name: String,
    pub key: String,
    pub table_name: String,
    pub comment: String,
    /// Parameter list, e.g. `count: Int, name: String`.
    pub args: String,
    /// Format arguments, e.g. `, count, name`.
    pub vars: String,
}

impl LocalizedFunc {
    fn doc_line(&self) -> String {
        match &self.preview {
            Some(preview) => format!("/// {}\n", preview.replace('\n', "\\n")),
            None => String::new(),
        }
    }
}

impl SwiftCode {
    pub fn code(&self) -> String {
        match self {
            SwiftCode::Newline => String::new(),
            SwiftCode::Import(name) => format!("import {}", name),
            SwiftCode::FuncReturnString(f) => formatdoc! {r#"
                {doc}public static func {name}({args}) -> String {{
                    return String(
                        format: NSLocalizedString("{key}", tableName: "{table}", comment: "{comment}"){vars}
                    )
                }}"#,
                doc = f.doc_line(),
                name = f.name,
                args = f.args,
                key = f.key,
                table = f.table_name,
                comment = f.comment,
                vars = f.vars,
            },
            SwiftCode::FuncReturnAttributedString(f) => formatdoc! {r#"
                {doc}public static func {name}({args}) -> NSAttributedString? {{
                    return try? ZSWTaggedString(
                        format: NSLocalizedString("{key}", tableName: "{table}", comment: "{comment}"){vars}
                    ).attributedString()
                }}"#,
                doc = f.doc_line(),
                name = f.name,
                args = f.args,
                key = f.key,
                table = f.table_name,
                comment = f.comment,
                vars = f.vars,
            },
            SwiftCode::FuncReturnStringArray(f) => formatdoc! {r#"
                {doc}public static func {name}() -> [String] {{
                    return parseItems(
                        NSLocalizedString("{key}", tableName: "{table}", comment: "{comment}")
                    )
                }}"#,
                doc = f.doc_line(),
                name = f.name,
                key = f.key,
                table = f.table_name,
                comment = f.comment,
            },
            SwiftCode::FuncReturnImage { name, image_name } => formatdoc! {r#"
                public static func {name}() -> UIImage? {{
                    return UIImage(named: "{image_name}")
                }}"#,
                name = name,
                image_name = image_name,
            },
            SwiftCode::Enum { name, content } => {
                let body = indented(&render(content));
                format!("public enum {} {{\n{}\n}}", name, body)
            }
        }
    }
}

/// Renders templates one per line.
pub fn render(codes: &[SwiftCode]) -> String {
    codes
        .iter()
        .map(SwiftCode::code)
        .collect::<Vec<_>>()
        .join("\n")
}

fn indented(code: &str) -> String {
    code.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name of generated Swift code: `<name>.generated.swift`.
pub fn swift_file_name(name: &str) -> String {
    format!("{}.generated.swift", name)
}

impl StringItem {
    /// Accessor for this item in the `table_name` strings table.
    pub fn swift_code(&self, table_name: &str, base_lang: &LanguageKey) -> SwiftCode {
        let variables = self.variables.as_deref().unwrap_or_default();
        let func = LocalizedFunc {
            preview: self.get(base_lang).map(|value| value.localizable_value()),
            name: swift_identifier(&self.key),
            key: escape_quotes(&self.key),
            table_name: table_name.to_string(),
            comment: self
                .comment
                .as_deref()
                .map(escape_quotes)
                .unwrap_or_default(),
            args: variables
                .iter()
                .map(|v| format!("{}: {}", v.name, v.var_type))
                .collect::<Vec<_>>()
                .join(", "),
            vars: variables.iter().map(|v| format!(", {}", v.name)).collect(),
        };
        match self.string_type {
            StringType::Single => SwiftCode::FuncReturnString(func),
            StringType::Attributed => SwiftCode::FuncReturnAttributedString(func),
            StringType::Array => SwiftCode::FuncReturnStringArray(func),
        }
    }
}
