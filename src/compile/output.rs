// src/compile/output.rs

//! Module wrapping and output file writing.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::fs::FileSystem;
use crate::types::ModuleFormat;

/// File stem of the shared runtime-helper module.
pub const HELPERS_STEM: &str = "__funcs";

/// Where the compiled template function starts in compiler output.
///
/// Everything before it is the compiler's inlined runtime, which the helper
/// module replaces.
const TEMPLATE_FN_MARKER: &str = "function template(";

const HELPER_NAMES: &str = "pug_escape, pug_rethrow, pug_match_html";

const HELPERS_BODY: &str = r#"var pug_match_html = /["&<>]/;

function pug_escape(e) {
  var a = "" + e, t = pug_match_html.exec(a);
  if (!t) return e;
  var r, c, n, s = "";
  for (r = t.index, c = 0; r < a.length; r++) {
    switch (a.charCodeAt(r)) {
      case 34: n = "&quot;"; break;
      case 38: n = "&amp;"; break;
      case 60: n = "&lt;"; break;
      case 62: n = "&gt;"; break;
      default: continue;
    }
    c !== r && (s += a.substring(c, r)), c = r + 1, s += n;
  }
  return c !== r ? s + a.substring(c, r) : s;
}

function pug_rethrow(e, n, r, t) {
  if (!(e instanceof Error)) throw e;
  if (!("undefined" == typeof window && n || t)) throw e.message += " on line " + r, e;
  var o, a, i, s;
  try {
    t = t || require("fs").readFileSync(n, { encoding: "utf8" });
    o = 3;
    a = t.split("\n");
    i = Math.max(r - o, 0);
    s = Math.min(a.length, r + o);
  } catch (t) {
    e.message += " - could not read from " + n + " (" + t.message + ")";
    pug_rethrow(e, null, r);
    return;
  }
  o = a.slice(i, s).map(function (e, n) {
    var t = n + i + 1;
    return (t == r ? "  > " : "    ") + t + "| " + e;
  }).join("\n");
  e.path = n;
  try {
    e.message = (n || "Pug") + ":" + r + "\n" + o + "\n\n" + e.message;
  } catch (e) {}
  throw e;
}
"#;

/// File name of the helper module for a given output extension.
pub fn helpers_file_name(output_extension: &str) -> String {
    format!("{HELPERS_STEM}.{output_extension}")
}

/// Source of the shared runtime-helper module.
pub fn helpers_module(format: ModuleFormat) -> String {
    let footer = match format {
        ModuleFormat::Esm => format!("export {{ {HELPER_NAMES} }};"),
        ModuleFormat::CommonJs => format!("module.exports = {{ {HELPER_NAMES} }};"),
    };
    format!("{HELPERS_BODY}\n{footer}\n")
}

/// Wrap compiler output into a standalone module that imports the helpers
/// and exports `template` as its default.
///
/// If the output has no `function template(` marker it is kept whole.
pub fn wrap_module(compiled: &str, format: ModuleFormat, helpers_file: &str) -> String {
    let body = match compiled.find(TEMPLATE_FN_MARKER) {
        Some(idx) => &compiled[idx..],
        None => compiled,
    };
    let body = body.trim();

    match format {
        ModuleFormat::Esm => format!(
            "// Import Needed Pug Files\nimport {{ {HELPER_NAMES} }} from './{helpers_file}';\n\n{body}\n\nexport default template;\n"
        ),
        ModuleFormat::CommonJs => format!(
            "// Import Needed Pug Files\nconst {{ {HELPER_NAMES} }} = require('./{helpers_file}');\n\n{body}\n\nmodule.exports = template;\n"
        ),
    }
}

/// Writes compiled modules into the flat output directory.
///
/// A module is only rewritten when its blake3 hash differs from the file
/// currently on disk, so an unchanged recompile leaves the file untouched
/// while anything written there by another tool is replaced.
#[derive(Debug)]
pub struct OutputWriter {
    out_dir: PathBuf,
    extension: String,
    format: ModuleFormat,
}

impl OutputWriter {
    pub fn new(out_dir: impl Into<PathBuf>, extension: &str, format: ModuleFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            format,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// `<out>/<source stem>.<ext>`; sub-directories are flattened.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.out_dir.join(format!("{stem}.{}", self.extension))
    }

    /// Write the shared helper module. Called once at startup.
    pub fn write_helpers(&self, fs: &dyn FileSystem) -> Result<PathBuf> {
        fs.create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(helpers_file_name(&self.extension));
        fs.write(&path, helpers_module(self.format).as_bytes())?;
        info!(path = ?path, "wrote runtime helper module");
        Ok(path)
    }

    /// Wrap and write one compiled template.
    ///
    /// Returns the output path and whether the file was actually written.
    pub fn write_module(
        &self,
        fs: &dyn FileSystem,
        source: &Path,
        compiled: &str,
    ) -> Result<(PathBuf, bool)> {
        let path = self.output_path(source);
        let module = wrap_module(compiled, self.format, &helpers_file_name(&self.extension));

        if on_disk_matches(fs, &path, &module) {
            debug!(output = ?path, "compiled output unchanged; not rewriting");
            return Ok((path, false));
        }

        fs.write(&path, module.as_bytes())?;
        Ok((path, true))
    }
}

/// True when `path` exists and holds exactly `module`.
///
/// An unreadable file counts as different and gets rewritten.
fn on_disk_matches(fs: &dyn FileSystem, path: &Path, module: &str) -> bool {
    if !fs.is_file(path) {
        return false;
    }
    match fs.read_to_string(path) {
        Ok(existing) => blake3::hash(existing.as_bytes()) == blake3::hash(module.as_bytes()),
        Err(_) => false,
    }
}
