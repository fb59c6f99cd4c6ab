use clap::ValueEnum;
use serde::Deserialize;

/// Module system used for the generated output files.
///
/// - `Esm`: `import { ... } from './__funcs.js'` and `export default template;`
///   (default).
/// - `CommonJs`: `require('./__funcs.js')` and `module.exports = template;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Esm,
    #[serde(alias = "cjs")]
    #[value(name = "commonjs", alias = "cjs")]
    CommonJs,
}

impl Default for ModuleFormat {
    fn default() -> Self {
        ModuleFormat::Esm
    }
}

/// What kind of filesystem change produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
    /// Emitted for every discovered file by the initial compile pass.
    Initial,
}
