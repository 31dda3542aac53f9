//! Identifier grammars for generated projects.
//!
//! Two grammars are in play. Go module paths end up in `go.mod` and import
//! statements; Go package identifiers end up in `package` clauses and import
//! path segments. Each grammar has a validator that rejects bad input and a
//! sanitizer that repairs it. Sanitizers are total and idempotent.

use crate::error::{Result, ScaffoldError};
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_MODULE_NAME: &str = "my-project";
pub const DEFAULT_PACKAGE_NAME: &str = "mypackage";

const RESERVED_ENTRY_POINT: &str = "main";

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

// File-name suffixes the Go toolchain treats as build constraints.
const GO_OS_SUFFIXES: &[&str] = &[
    "aix",
    "android",
    "darwin",
    "dragonfly",
    "freebsd",
    "hurd",
    "illumos",
    "ios",
    "js",
    "linux",
    "nacl",
    "netbsd",
    "openbsd",
    "plan9",
    "solaris",
    "wasip1",
    "windows",
    "zos",
];
const GO_ARCH_SUFFIXES: &[&str] = &[
    "386",
    "amd64",
    "amd64p32",
    "arm",
    "armbe",
    "arm64",
    "arm64be",
    "loong64",
    "mips",
    "mipsle",
    "mips64",
    "mips64le",
    "mips64p32",
    "mips64p32le",
    "ppc",
    "ppc64",
    "ppc64le",
    "riscv",
    "riscv64",
    "s390",
    "s390x",
    "sparc",
    "sparc64",
    "wasm",
];

static MODULE_SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();
static PACKAGE_REGEX: OnceLock<Regex> = OnceLock::new();
static AGENT_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn module_segment_regex() -> &'static Regex {
    MODULE_SEGMENT_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9._-]*[a-z0-9])?$").expect("Invalid regex pattern")
    })
}

fn package_regex() -> &'static Regex {
    PACKAGE_REGEX
        .get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("Invalid regex pattern"))
}

fn agent_name_regex() -> &'static Regex {
    AGENT_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("Invalid regex pattern"))
}

pub fn is_go_keyword(word: &str) -> bool {
    GO_KEYWORDS.contains(&word)
}

/// Validate a Go module path such as `my-project` or `github.com/user/project`.
pub fn validate_module_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScaffoldError::invalid_name(name, "module name cannot be empty"));
    }
    if name == RESERVED_ENTRY_POINT {
        return Err(ScaffoldError::invalid_name(name, "'main' is reserved and cannot be used as a module name"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | '/')))
    {
        return Err(ScaffoldError::invalid_name(name, format!("module name contains invalid character '{c}'")));
    }
    if name.starts_with(['-', '_', '.', '/']) || name.ends_with(['-', '_', '.', '/']) {
        return Err(ScaffoldError::invalid_name(name, "module name cannot start or end with a separator"));
    }
    for segment in name.split('/') {
        if !module_segment_regex().is_match(segment) {
            return Err(ScaffoldError::invalid_name(
                name,
                format!("module path segment '{segment}' is not valid"),
            ));
        }
    }
    Ok(())
}

/// Validate a Go package identifier.
pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScaffoldError::invalid_name(name, "package name cannot be empty"));
    }
    if name == RESERVED_ENTRY_POINT {
        return Err(ScaffoldError::invalid_name(name, "'main' is reserved for the entry point package"));
    }
    if is_go_keyword(name) {
        return Err(ScaffoldError::invalid_name(name, "package name cannot be a Go keyword"));
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ScaffoldError::invalid_name(name, "package name must be lowercase"));
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ScaffoldError::invalid_name(name, "package name must start with a letter"));
    }
    if !package_regex().is_match(name) {
        return Err(ScaffoldError::invalid_name(
            name,
            "package name may only contain lowercase letters, digits and underscores",
        ));
    }
    if name.ends_with('_') {
        return Err(ScaffoldError::invalid_name(name, "package name cannot end with an underscore"));
    }
    Ok(())
}

/// Validate an agent name used for file names, manifest keys and state keys.
pub fn validate_agent_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScaffoldError::invalid_name(name, "agent name cannot be empty"));
    }
    if !agent_name_regex().is_match(name) {
        return Err(ScaffoldError::invalid_name(
            name,
            "agent name must start with a lowercase letter and contain only [a-z0-9_-]",
        ));
    }
    if let Some(suffix) = build_constraint_suffix(name) {
        return Err(ScaffoldError::invalid_name(
            name,
            format!("'{name}.go' would be excluded from normal builds by its '_{suffix}' suffix"),
        ));
    }
    Ok(())
}

/// The `_test`, `_<GOOS>` or `_<GOARCH>` suffix of `<name>.go`, if any.
fn build_constraint_suffix(name: &str) -> Option<&str> {
    let (_, tail) = name.split_once('_')?;
    let last = tail.rsplit('_').next()?;
    let constrained =
        last == "test" || GO_OS_SUFFIXES.contains(&last) || GO_ARCH_SUFFIXES.contains(&last);
    constrained.then_some(last)
}

/// Repair any string into a valid module path.
pub fn sanitize_module_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let sanitized = lowered
        .split('/')
        .map(sanitize_module_segment)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if sanitized.is_empty() {
        DEFAULT_MODULE_NAME.to_string()
    } else if sanitized == RESERVED_ENTRY_POINT {
        format!("my-{sanitized}")
    } else {
        sanitized
    }
}

fn sanitize_module_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        let separator = match c {
            c if c.is_ascii_lowercase() || c.is_ascii_digit() => {
                out.push(c);
                continue;
            }
            '.' => '.',
            '-' | '_' => '-',
            c if c.is_whitespace() => '-',
            _ => continue,
        };
        if !out.is_empty() && !out.ends_with(['-', '.']) {
            out.push(separator);
        }
    }
    while out.ends_with(['-', '.']) {
        out.pop();
    }
    out
}

/// Repair any string into a valid Go package identifier.
pub fn sanitize_package_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if (c == '-' || c == '_' || c.is_whitespace()) && !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }

    if out.is_empty() {
        DEFAULT_PACKAGE_NAME.to_string()
    } else if out.starts_with(|c: char| c.is_ascii_digit()) {
        format!("pkg_{out}")
    } else if out == RESERVED_ENTRY_POINT || is_go_keyword(&out) {
        format!("my_{out}")
    } else {
        out
    }
}

/// Join a module path and a package sub-path, validating both.
///
/// An empty `package_path` yields the module path itself.
pub fn resolve_import_path(module_name: &str, package_path: &str) -> Result<String> {
    validate_module_name(module_name)?;
    if package_path.is_empty() {
        return Ok(module_name.to_string());
    }
    for segment in package_path.split('/') {
        validate_package_name(segment)?;
    }
    Ok(format!("{module_name}/{package_path}"))
}

/// Like [`resolve_import_path`] but sanitizes both components instead of failing.
pub fn resolve_import_path_safe(module_name: &str, package_path: &str) -> String {
    let module = sanitize_module_name(module_name);
    let segments: Vec<String> = package_path
        .split('/')
        .filter(|segment| !segment.trim().is_empty())
        .map(sanitize_package_name)
        .collect();

    if segments.is_empty() {
        module
    } else {
        format!("{module}/{}", segments.join("/"))
    }
}

/// `data_analyzer` -> `Data Analyzer`
pub fn display_name(agent_name: &str) -> String {
    words(agent_name).map(capitalize).collect::<Vec<_>>().join(" ")
}

/// `data_analyzer` -> `DataAnalyzer`, suitable as an exported Go identifier.
pub fn go_type_name(agent_name: &str) -> String {
    let ident: String = words(agent_name)
        .map(capitalize)
        .collect::<String>()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_alphabetic()) {
        ident
    } else {
        format!("Agent{ident}")
    }
}

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(['_', '-', ' ']).filter(|w| !w.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
