//! The fixed post-build pipeline.
//!
//! Stages run strictly in order, each over every configured output tree:
//! 1. module-type markers
//! 2. asset copy (plus ESM-only source fixes)
//! 3. extension appending
//! 4. alias resolution
//!
//! An absent output tree is skipped by every stage. The first error aborts
//! the run; earlier writes stay on disk.

pub mod markers;

pub use markers::{MARKER_FILE_NAME, marker_content, write_marker};

use crate::config::{Config, ModuleKind};
use crate::error::Result;
use crate::rewrite::{EsmAdjuster, SpecifierRewriter, compile_aliases};
use crate::tree::{copy_tree, rewrite_tree};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// File extensions (without the dot) whose specifiers get rewritten.
pub const SCRIPT_FILE_EXTENSIONS: &[&str] = &["js"];

/// File extensions the ESM-only fixes apply to.
pub const ESM_FILE_EXTENSIONS: &[&str] = &["js", "mjs"];

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
	pub markers: Vec<PathBuf>,
	pub files_copied: usize,
	pub files_excluded: usize,
	pub esm_files_adjusted: usize,
	pub extension_files_rewritten: usize,
	pub alias_files_rewritten: usize,
	pub elapsed: Duration,
}

/// Run every configured stage against the configured output trees.
pub fn run(config: &Config) -> Result<RunReport> {
	let started = Instant::now();
	let rewriter = SpecifierRewriter::new()?;
	let mut report = RunReport::default();

	report.markers = write_markers(config)?;
	copy_assets(config, &mut report)?;
	report.extension_files_rewritten = append_extensions(config, &rewriter)?;
	report.alias_files_rewritten = resolve_aliases(config, &rewriter)?;

	report.elapsed = started.elapsed();
	info!("PostBuild finished in {} milliseconds", report.elapsed.as_millis());
	Ok(report)
}

/// Stage 1: write a `package.json` marker into each configured tree.
pub fn write_markers(config: &Config) -> Result<Vec<PathBuf>> {
	config
		.output_dirs()
		.map(|(kind, dir)| {
			info!("Creating package.json for \"{}\"...", kind.label());
			write_marker(dir, kind)
		})
		.collect()
}

/// Stage 2: copy assets into each configured tree, then fix up the ESM tree.
pub fn copy_assets(config: &Config, report: &mut RunReport) -> Result<()> {
	let Some(spec) = &config.copy_files else {
		return Ok(());
	};

	let output_dirs: Vec<&Path> = config.output_dirs().map(|(_, dir)| dir).collect();
	for (kind, dir) in config.output_dirs() {
		info!("Copying files to {}...", kind.label());
		let copied = copy_tree(spec, dir, &output_dirs)?;
		report.files_copied += copied.copied;
		report.files_excluded += copied.excluded;

		if kind == ModuleKind::Esm {
			info!("Adjusting ESM sources (JSON imports, __dirname)...");
			let adjuster = EsmAdjuster::new()?;
			report.esm_files_adjusted +=
				rewrite_tree(dir, ESM_FILE_EXTENSIONS, |text| adjuster.apply(text))?;
		}
	}

	Ok(())
}

/// Stage 3: append `.js` to extensionless relative specifiers.
pub fn append_extensions(config: &Config, rewriter: &SpecifierRewriter) -> Result<usize> {
	if !config.add_extensions {
		return Ok(0);
	}

	let mut rewritten = 0;
	for (kind, dir) in config.output_dirs() {
		info!("Adding extensions to {}...", kind.label());
		rewritten += rewrite_tree(dir, SCRIPT_FILE_EXTENSIONS, |text| {
			rewriter.rewrite_extensions(text)
		})?;
	}

	Ok(rewritten)
}

/// Stage 4: resolve aliased specifiers with the compiled alias table.
pub fn resolve_aliases(config: &Config, rewriter: &SpecifierRewriter) -> Result<usize> {
	let Some(table) = config.aliases.as_ref().filter(|table| !table.is_empty()) else {
		return Ok(0);
	};

	let patterns = compile_aliases(table)?;
	let mut rewritten = 0;
	for (kind, dir) in config.output_dirs() {
		info!("Resolving aliases in {}...", kind.label());
		rewritten += rewrite_tree(dir, SCRIPT_FILE_EXTENSIONS, |text| {
			rewriter.rewrite_aliases(text, &patterns, config.add_extensions)
		})?;
	}

	Ok(rewritten)
}
