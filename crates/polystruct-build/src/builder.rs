//! Source discovery, generation and output for build scripts.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use polystruct_core::{
    render_module_unit, CompilationUnit, Diagnostic, Generator, GeneratorConfig, ModulePath,
    OutputMode, SourceKind,
};

use crate::error::BuildError;

/// Directory below the output directory that receives generated files.
pub const OUTPUT_SUBDIR: &str = "polystruct";

/// Outcome of a build-script generation pass.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Source files read, in scan order.
    pub files_scanned: Vec<PathBuf>,
    /// Generated files, one per module, whether rewritten or unchanged.
    pub files_written: Vec<PathBuf>,
    /// Number of merged types generated.
    pub merged_types: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Configures and runs generation from a build script.
#[derive(Debug, Clone)]
pub struct Builder {
    source_dirs: Vec<PathBuf>,
    files: Vec<(PathBuf, Option<ModulePath>)>,
    config: Option<GeneratorConfig>,
    config_file: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    cargo_directives: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            source_dirs: Vec::new(),
            files: Vec::new(),
            config: None,
            config_file: None,
            out_dir: None,
            cargo_directives: true,
        }
    }

    /// Scans every `.rs` file below `dir`, inferring module paths from the
    /// file layout (`lib.rs`/`main.rs` are the crate root).
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dirs.push(dir.into());
        self
    }

    /// Scans one file; its module path is inferred from its name.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push((path.into(), None));
        self
    }

    /// Scans one file declared at `module` (e.g. `crate::states`).
    pub fn file_in_module(mut self, path: impl Into<PathBuf>, module: &str) -> Self {
        self.files.push((path.into(), Some(ModulePath::parse(module))));
        self
    }

    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads the configuration from a `.toml`, `.yaml` or `.yml` file.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Overrides `$OUT_DIR`.
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Enables or disables `cargo:` lines on stdout. On by default.
    pub fn cargo_directives(mut self, enabled: bool) -> Self {
        self.cargo_directives = enabled;
        self
    }

    /// Runs the pass and writes `<out_dir>/polystruct/<module>.rs` files.
    pub fn generate(&self) -> Result<BuildReport, BuildError> {
        let config = self.load_config()?.with_mode(OutputMode::ModuleUnits);
        let out_dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => std::env::var_os("OUT_DIR")
                .map(PathBuf::from)
                .ok_or(BuildError::MissingOutDir)?,
        };

        let mut report = BuildReport::default();
        let mut units = Vec::new();
        let mut modules: Vec<ModulePath> = Vec::new();

        for (path, module) in self.collect_sources()? {
            self.directive(&format!("rerun-if-changed={}", path.display()));
            let source = fs::read_to_string(&path).map_err(|e| BuildError::io(&path, e))?;
            report.files_scanned.push(path.clone());
            if !modules.contains(&module) {
                modules.push(module.clone());
            }

            match CompilationUnit::parse(path.display().to_string(), module, &source) {
                Ok(unit) => units.push(unit),
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "Skipping unparsable file");
                    report
                        .diagnostics
                        .push(Diagnostic::warning(None, err.to_string()));
                }
            }
        }
        for dir in &self.source_dirs {
            self.directive(&format!("rerun-if-changed={}", dir.display()));
        }

        let output = Generator::new(config.clone()).generate(&units);
        for module in &output.modules {
            if !modules.contains(module) {
                modules.push(module.clone());
            }
        }

        let target = out_dir.join(OUTPUT_SUBDIR);
        fs::create_dir_all(&target).map_err(|e| BuildError::io(&target, e))?;
        for module in &modules {
            let sources = output.sources_in(module);
            let text = match render_module_unit(module, &sources, &config) {
                Ok(text) => text,
                Err(err) => {
                    report
                        .diagnostics
                        .push(Diagnostic::error(None, format!("{}: {}", module, err)));
                    continue;
                }
            };
            let path = target.join(format!("{}.rs", module.file_stem()));
            write_if_changed(&path, &text)?;
            debug!(module = %module, path = %path.display(), items = sources.len(), "Wrote module unit");
            report.files_written.push(path);
        }

        report.merged_types = output
            .sources
            .iter()
            .filter(|s| s.kind == SourceKind::Merged)
            .count();
        report.diagnostics.extend(output.diagnostics);

        for diagnostic in &report.diagnostics {
            self.directive(&format!("warning={}", diagnostic.to_string().replace('\n', " ")));
        }
        info!(
            files = report.files_scanned.len(),
            merged_types = report.merged_types,
            diagnostics = report.diagnostics.len(),
            "polystruct generation finished"
        );
        Ok(report)
    }

    fn load_config(&self) -> Result<GeneratorConfig, BuildError> {
        if let Some(path) = &self.config_file {
            self.directive(&format!("rerun-if-changed={}", path.display()));
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            let config = if is_yaml {
                GeneratorConfig::from_yaml_file(path)?
            } else {
                GeneratorConfig::from_toml_file(path)?
            };
            return Ok(config);
        }
        Ok(self.config.clone().unwrap_or_default())
    }

    /// Every source file with its module path, directories first in sorted
    /// order, then the explicitly added files.
    fn collect_sources(&self) -> Result<Vec<(PathBuf, ModulePath)>, BuildError> {
        let mut sources = Vec::new();

        for dir in &self.source_dirs {
            let walker = WalkDir::new(dir).sort_by_file_name();
            for entry in walker {
                let entry = entry.map_err(|source| BuildError::Walk {
                    path: dir.clone(),
                    source,
                })?;
                let path = entry.path();
                if !entry.file_type().is_file() || path.extension().map_or(true, |e| e != "rs") {
                    continue;
                }
                let relative = path.strip_prefix(dir).unwrap_or(path);
                let module = module_path_for(relative)
                    .ok_or_else(|| BuildError::UnknownModule(path.to_path_buf()))?;
                sources.push((path.to_path_buf(), module));
            }
        }

        for (path, module) in &self.files {
            let module = match module {
                Some(module) => module.clone(),
                None => {
                    let name = path.file_name().map(Path::new).unwrap_or(path);
                    module_path_for(name).ok_or_else(|| BuildError::UnknownModule(path.clone()))?
                }
            };
            sources.push((path.clone(), module));
        }

        Ok(sources)
    }

    fn directive(&self, line: &str) {
        if self.cargo_directives {
            println!("cargo:{}", line);
        }
    }
}

/// Module path of a source file relative to the crate's source root.
///
/// `lib.rs` and `main.rs` → `crate`, `a.rs` and `a/mod.rs` → `crate::a`,
/// `a/b.rs` → `crate::a::b`. Returns `None` for non-`.rs` paths.
pub fn module_path_for(relative: &Path) -> Option<ModulePath> {
    if relative.extension()? != "rs" {
        return None;
    }
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect();

    let file = segments.pop()?;
    let stem = file.strip_suffix(".rs")?;
    let is_root_file = segments.is_empty() && (stem == "lib" || stem == "main");
    if stem != "mod" && !is_root_file {
        segments.push(stem.to_string());
    }
    Some(ModulePath::from_segments(segments))
}

fn write_if_changed(path: &Path, text: &str) -> Result<(), BuildError> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == text) {
        return Ok(());
    }
    fs::write(path, text).map_err(|e| BuildError::io(path, e))
}
