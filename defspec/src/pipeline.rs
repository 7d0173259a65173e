//! Pipeline logic for parsing, lowering and synthesizing defspec source.
//!
//! source → defspec_parser → AST → lowering → FunctionSpec → synth → Program

use defspec_parser::ParseError;

use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::ir::decl::Program;
use crate::lowering::lower_source;
use crate::synth::compile_modules;

/// Error variants produced by the parse-and-compile pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Source code failed to parse.
    Parse(ParseError),
    /// Lowering or declaration synthesis rejected a definition.
    Compile(CompileError),
}

impl PipelineError {
    /// The error message followed by the offending source line, when the
    /// error has a real span.
    pub fn format_with_context(&self, source: &str) -> String {
        match self {
            PipelineError::Parse(e) => {
                let context = e.format_with_context(source);
                if context.is_empty() {
                    self.to_string()
                } else {
                    format!("{}\n{}", self, context)
                }
            }
            PipelineError::Compile(e) if !e.span.is_synthetic() => {
                let Some(line) = source.lines().nth(e.span.line.saturating_sub(1)) else {
                    return self.to_string();
                };
                let col = e.span.column.saturating_sub(1).min(line.len());
                let width = e.span.len().clamp(1, (line.len() - col).max(1));
                let gutter = e.span.line.to_string();
                format!(
                    "{}\n  {} | {}\n  {} | {}{}",
                    self,
                    gutter,
                    line,
                    " ".repeat(gutter.len()),
                    " ".repeat(col),
                    "^".repeat(width)
                )
            }
            PipelineError::Compile(_) => self.to_string(),
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Parse(e) => write!(f, "parse error: {}", e),
            PipelineError::Compile(e) => write!(f, "compile error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Parse(e) => Some(e),
            PipelineError::Compile(e) => Some(e),
        }
    }
}

impl From<ParseError> for PipelineError {
    fn from(e: ParseError) -> Self {
        PipelineError::Parse(e)
    }
}

impl From<CompileError> for PipelineError {
    fn from(e: CompileError) -> Self {
        PipelineError::Compile(e)
    }
}

/// Result of parsing and compiling defspec source.
pub type PipelineResult = Result<Program, PipelineError>;

/// Parse `source` and compile every module in it. Top-level items go to
/// `config.default_module`.
pub fn parse_and_compile(source: &str, config: &CompilerConfig) -> PipelineResult {
    let file = defspec_parser::parse(source)?;
    let modules = lower_source(&file, &config.default_module)?;
    Ok(compile_modules(modules)?)
}
