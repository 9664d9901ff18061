//! Parse options.
//!
//! Options arrive from callers, fixture `options.json` files and the CLI, so
//! every field has a default and the struct deserializes from camelCase JSON.

use esfront_ast::SourceType;
use serde::{Deserialize, Deserializer};

/// A grammar extension that can be switched on per parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plugin {
    /// Flow type annotations and declarations.
    Flow,
    /// JSX elements in expression position.
    Jsx,
}

impl Plugin {
    /// Look a plugin up by its option name. Names of proposals that are
    /// always enabled (`decorators`, `asyncFunctions`, ...) return `None`.
    pub fn from_name(name: &str) -> Option<Plugin> {
        match name {
            "flow" => Some(Plugin::Flow),
            "jsx" => Some(Plugin::Jsx),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Plugin::Flow => "flow",
            Plugin::Jsx => "jsx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// `module` enables `import`/`export` at the top level and, together
    /// with `strict_mode`, strict mode.
    pub source_type: SourceType,
    pub allow_return_outside_function: bool,
    pub allow_import_export_everywhere: bool,
    pub allow_super_outside_method: bool,
    /// Module code starts strict when set. Scripts only become strict
    /// through a `"use strict"` directive.
    pub strict_mode: bool,
    #[serde(deserialize_with = "deserialize_plugins")]
    pub plugins: Vec<Plugin>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::Script,
            allow_return_outside_function: false,
            allow_import_export_everywhere: false,
            allow_super_outside_method: false,
            strict_mode: true,
            plugins: Vec::new(),
        }
    }
}

impl ParseOptions {
    pub fn module() -> Self {
        Self { source_type: SourceType::Module, ..Self::default() }
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        if !self.plugins.contains(&plugin) {
            self.plugins.push(plugin);
        }
        self
    }

    pub fn has_plugin(&self, plugin: Plugin) -> bool {
        self.plugins.contains(&plugin)
    }
}

fn deserialize_plugins<'de, D>(deserializer: D) -> Result<Vec<Plugin>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    let mut plugins = Vec::new();
    for plugin in names.iter().filter_map(|name| Plugin::from_name(name)) {
        if !plugins.contains(&plugin) {
            plugins.push(plugin);
        }
    }
    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.source_type, SourceType::Script);
        assert!(options.strict_mode);
        assert!(options.plugins.is_empty());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: ParseOptions = serde_json::from_str(
            r#"{"sourceType": "module", "allowReturnOutsideFunction": true, "plugins": ["jsx", "flow", "decorators", "jsx"]}"#,
        )
        .unwrap();
        assert_eq!(options.source_type, SourceType::Module);
        assert!(options.allow_return_outside_function);
        assert!(!options.allow_super_outside_method);
        assert!(options.strict_mode);
        assert_eq!(options.plugins, vec![Plugin::Jsx, Plugin::Flow]);
    }

    #[test]
    fn test_with_plugin() {
        let options = ParseOptions::module().with_plugin(Plugin::Flow).with_plugin(Plugin::Flow);
        assert_eq!(options.plugins, vec![Plugin::Flow]);
        assert!(options.has_plugin(Plugin::Flow));
        assert!(!options.has_plugin(Plugin::Jsx));
    }
}
