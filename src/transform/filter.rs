// Tue Jan 20 2026 - Alex

use crate::ir::Definition;
use crate::transform::TransformError;
use once_cell::sync::Lazy;
use regex::Regex;

const SYSTEM_INCLUDE_PATTERNS: &[&str] = &[
    r"builtin",
    r".*\\Program Files\\.*",
    r".*\\Microsoft Visual Studio\\.*",
    r".*\\Windows Kits\\.*",
    r".*\\vcpkg\\installed\\.*?\\include\\.*",
    r".*/Program Files/.*",
    r".*/Microsoft Visual Studio/.*",
    r".*/Windows Kits/.*",
    r".*/vcpkg/installed/.*?/include/.*",
    r"^<builtin>",
    r"^/usr/include/",
    r"^/usr/local/include/",
    r"^/usr/lib/clang/.*/include/",
    r"/clang/include/",
    r"/x86_64-linux-gnu/",
    r"^/opt/",
];

static SYSTEM_INCLUDES: Lazy<Vec<Regex>> = Lazy::new(|| {
    SYSTEM_INCLUDE_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

/// Locations of compiler builtins, toolchain and SDK headers.
pub fn system_include_patterns() -> &'static [&'static str] {
    SYSTEM_INCLUDE_PATTERNS
}

pub fn is_system_source(source: &str) -> bool {
    SYSTEM_INCLUDES.iter().any(|re| re.is_match(source))
}

pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, TransformError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|e| TransformError::InvalidPattern {
                pattern: p.as_ref().to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Include/exclude selection over one text attribute of each definition.
///
/// When include patterns are given they alone decide; exclude patterns only
/// apply otherwise.
pub struct PatternFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl PatternFilter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, TransformError> {
        Ok(Self {
            include: compile_patterns(include)?,
            exclude: compile_patterns(exclude)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn keeps(&self, text: &str) -> bool {
        if !self.include.is_empty() {
            return self.include.iter().any(|re| re.is_match(text));
        }
        !self.exclude.iter().any(|re| re.is_match(text))
    }

    pub fn apply<F>(&self, definitions: &[Definition], attribute: F) -> Vec<Definition>
    where
        F: Fn(&Definition) -> String,
    {
        if self.is_empty() {
            return definitions.to_vec();
        }
        let kept: Vec<Definition> = definitions
            .iter()
            .filter(|d| self.keeps(&attribute(d)))
            .cloned()
            .collect();
        log::debug!("Filter kept {} of {} definitions", kept.len(), definitions.len());
        kept
    }
}

/// Select definitions by their `file:line` source.
pub fn filter_by_source<S: AsRef<str>>(
    definitions: &[Definition],
    include: &[S],
    exclude: &[S],
) -> Result<Vec<Definition>, TransformError> {
    let filter = PatternFilter::new(include, exclude)?;
    Ok(filter.apply(definitions, |d| d.source().to_string()))
}

/// Select definitions by their fullname.
pub fn filter_by_name<S: AsRef<str>>(
    definitions: &[Definition],
    include: &[S],
    exclude: &[S],
) -> Result<Vec<Definition>, TransformError> {
    let filter = PatternFilter::new(include, exclude)?;
    Ok(filter.apply(definitions, |d| d.fullname()))
}

/// Drop everything declared in a system or toolchain header.
pub fn exclude_system_headers(definitions: &[Definition]) -> Vec<Definition> {
    let kept: Vec<Definition> = definitions
        .iter()
        .filter(|d| !is_system_source(d.source()))
        .cloned()
        .collect();
    log::debug!(
        "Dropped {} definitions from system headers",
        definitions.len() - kept.len()
    );
    kept
}
