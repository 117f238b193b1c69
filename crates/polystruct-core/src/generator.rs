//! Generation pass: scan, collect, merge, emit.
//!
//! Each marked interface runs through its own pipeline. A failure in one
//! interface, including a panic, becomes a single error diagnostic and the
//! pass moves on to the next interface.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info, warn};

use crate::config::{GeneratorConfig, OutputMode};
use crate::convert::ConversionEmitter;
use crate::declaration::emit_merged_declaration;
use crate::diagnostics::Diagnostic;
use crate::dispatch::DispatchSynthesizer;
use crate::error::{GeneratorError, Result};
use crate::members::{MemberCollector, MemberSet};
use crate::merge::merge_fields;
use crate::model::{MergedType, ModulePath, PolymorphicInterface, VariantType};
use crate::scanner::{CompilationUnit, DeclarationScanner, ScanResult};
use crate::tokens::to_snake_case;
use crate::uses::anchor_use;
use crate::writer::SourceWriter;

/// Name of the wrapper module of a module unit.
pub const WRAPPER_MODULE: &str = "__polystruct";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Merged struct, discriminant and dispatch impls.
    Merged,
    /// Conversion routines of one variant.
    Variant,
}

/// Imports a generated source needs when it is emitted outside its
/// declaring modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UseContext {
    /// Modules imported with a glob.
    pub globs: Vec<ModulePath>,
    /// Anchored `use` lines.
    pub uses: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedSource {
    pub name: String,
    pub kind: SourceKind,
    pub interface: String,
    /// Module hosting the generated items.
    pub module: ModulePath,
    pub text: String,
    pub context: UseContext,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    pub sources: Vec<GeneratedSource>,
    pub diagnostics: Vec<Diagnostic>,
    /// Every module seen by the scanner, in discovery order.
    pub modules: Vec<ModulePath>,
}

impl GenerationOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Sources hosted by `module`, in generation order.
    pub fn sources_in(&self, module: &ModulePath) -> Vec<&GeneratedSource> {
        self.sources.iter().filter(|s| &s.module == module).collect()
    }
}

/// Runs generation passes with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs one full pass over `units`. Never fails; see the diagnostics.
    pub fn generate(&self, units: &[CompilationUnit]) -> GenerationOutput {
        let scan = DeclarationScanner::new(&self.config.marker_attribute).scan(units);
        let mut output = GenerationOutput {
            modules: scan.modules.keys().cloned().collect(),
            ..GenerationOutput::default()
        };

        for interface in &scan.interfaces {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                self.generate_interface(&scan, interface)
            }));
            match result {
                Ok(Ok(sources)) => output.sources.extend(sources),
                Ok(Err(err)) => {
                    error!(interface = %interface.name, error = %err, "Generation failed");
                    let mut diagnostic = Diagnostic::from(err);
                    diagnostic.interface.get_or_insert_with(|| interface.name.clone());
                    output.diagnostics.push(diagnostic);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(interface = %interface.name, %message, "Generation panicked");
                    output.diagnostics.push(Diagnostic::error(
                        Some(&interface.name),
                        format!("generator panicked: {}", message),
                    ));
                }
            }
        }

        output
    }

    fn generate_interface(
        &self,
        scan: &ScanResult,
        interface: &PolymorphicInterface,
    ) -> Result<Vec<GeneratedSource>> {
        let name = MergedType::name_for(&interface.name, &self.config.interface_prefix)?;

        let variants = scan
            .variants_of(&interface.name, &name)
            .map(|decl| VariantType::from_struct(&decl.item, &decl.module))
            .collect::<Result<Vec<_>>>()?;
        if variants.is_empty() {
            warn!(interface = %interface.name, "No implementing structs found; skipping");
            return Ok(Vec::new());
        }

        let members = MemberCollector::new(scan).collect(interface)?;
        let layout = merge_fields(&variants)?;
        debug!(
            interface = %interface.name,
            variants = variants.len(),
            members = members.len(),
            slots = layout.len(),
            "Merged layout computed"
        );

        if self.config.mode == OutputMode::Inline {
            check_single_module(interface, &variants, &members)?;
        }

        let visibility = match self.config.mode {
            OutputMode::Inline => interface.visibility.clone(),
            OutputMode::ModuleUnits if interface.visibility == "pub" => "pub".to_string(),
            OutputMode::ModuleUnits => "pub(crate)".to_string(),
        };

        let merged = MergedType {
            type_id_name: format!("{}{}", name, self.config.type_id_suffix),
            name,
            interface: interface.name.clone(),
            module: interface.module.clone(),
            visibility,
            variants,
            layout,
            members,
        };

        let mut sources = Vec::with_capacity(merged.variants.len() + 1);

        let mut w = SourceWriter::new(self.config.indent);
        emit_merged_declaration(&merged, &self.config, &mut w)?;
        DispatchSynthesizer::new(&merged, &self.config).emit(&mut w)?;
        sources.push(GeneratedSource {
            name: merged.name.clone(),
            kind: SourceKind::Merged,
            interface: interface.name.clone(),
            module: merged.module.clone(),
            text: w.finish()?,
            context: self.use_context(scan, &merged, &merged.module),
        });

        let emitter = ConversionEmitter::new(&merged, &self.config);
        for variant in &merged.variants {
            let mut w = SourceWriter::new(self.config.indent);
            emitter.emit(variant, &mut w)?;
            sources.push(GeneratedSource {
                name: format!("{}_{}", to_snake_case(&variant.name), to_snake_case(&merged.name)),
                kind: SourceKind::Variant,
                interface: interface.name.clone(),
                module: variant.module.clone(),
                text: w.finish()?,
                context: self.use_context(scan, &merged, &variant.module),
            });
        }

        info!(
            interface = %interface.name,
            merged = %merged.name,
            variants = merged.variants.len(),
            slots = merged.layout.len(),
            "Generated merged type"
        );
        Ok(sources)
    }

    /// Imports for code hosted in `host` that refers to every declaration
    /// of the hierarchy.
    ///
    /// Names imported from an involved module are left out: the globs (or
    /// `use super::*`) already reach them, and an explicit import could
    /// collide with a generated item of the same name.
    fn use_context(&self, scan: &ScanResult, merged: &MergedType, host: &ModulePath) -> UseContext {
        if self.config.mode == OutputMode::Inline {
            return UseContext::default();
        }

        let mut involved: Vec<&ModulePath> = vec![&merged.module];
        involved.extend(merged.members.traits.iter().map(|t| &t.module));
        involved.extend(merged.variants.iter().map(|v| &v.module));
        let covered = |module: &ModulePath| module == host || involved.contains(&module);

        let mut context = UseContext::default();
        for module in &involved {
            if *module == host || context.globs.contains(*module) {
                continue;
            }
            context.globs.push((*module).clone());
            let Some(info) = scan.module(module) else {
                continue;
            };
            for item in &info.uses {
                for import in anchor_use(item, module, &info.child_modules) {
                    let redundant = !import.is_renamed()
                        && import.source_module().is_some_and(|m| covered(&m));
                    let line = import.line();
                    if !redundant && !context.uses.contains(&line) {
                        context.uses.push(line);
                    }
                }
            }
        }
        context
    }
}

/// Assembles the module-unit file for `host` from the sources it hosts.
///
/// The items go into a private wrapper module that sees everything the host
/// sees plus the propagated imports, and are re-exported into the host.
pub fn render_module_unit(
    host: &ModulePath,
    sources: &[&GeneratedSource],
    config: &GeneratorConfig,
) -> Result<String> {
    let mut w = SourceWriter::new(config.indent);
    w.line(format!("// @generated by polystruct for `{}`. Do not edit.", host));
    if sources.is_empty() {
        return w.finish();
    }

    let mut lines = vec!["use super::*;".to_string()];
    for source in sources {
        lines.extend(
            source
                .context
                .globs
                .iter()
                .filter(|m| *m != host)
                .map(|m| format!("use {}::*;", m)),
        );
    }
    for source in sources {
        lines.extend(source.context.uses.iter().cloned());
    }

    w.write_attribute("allow(unused_imports, dead_code, clippy::all)");
    w.begin_module("", WRAPPER_MODULE);
    w.write_uses(&lines);
    for source in sources {
        w.blank();
        w.write_block(&source.text);
    }
    w.end_module()?;
    w.line(format!("pub use self::{}::*;", WRAPPER_MODULE));
    w.finish()
}

/// Inline output appends everything to one module, so the whole hierarchy
/// must be declared there.
fn check_single_module(
    interface: &PolymorphicInterface,
    variants: &[VariantType],
    members: &MemberSet,
) -> Result<()> {
    let stray = variants
        .iter()
        .map(|v| (&v.name, &v.module))
        .chain(members.traits.iter().map(|t| (&t.trait_name, &t.module)))
        .find(|(_, module)| **module != interface.module);
    match stray {
        Some((name, module)) => Err(GeneratorError::interface(
            &interface.name,
            format!(
                "`{}` is declared in `{}`; inline generation needs the whole hierarchy in one module",
                name, module
            ),
        )),
        None => Ok(()),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
