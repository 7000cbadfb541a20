#![warn(missing_docs)]
//! `codetags-lang` - data-driven language metadata for `codetags` scanners.
//!
//! This crate intentionally stays lightweight and knows nothing about scanning. It maps file
//! names and language ids to a [`Language`], and describes each language's comment tokens so
//! line-oriented scanners can skip comment lines in a uniform way.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when resolving a [`Language`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageError {
    #[error("unknown language '{0}'")]
    /// The id or alias is not known.
    Unknown(String),

    #[error("cannot detect language of '{}': no known file extension", .0.display())]
    /// The path has no extension, or an extension no scanner handles.
    NoExtension(PathBuf),
}

/// Comment tokens for a given language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment tokens (e.g. `//`, `#`).
    pub line: &'static [&'static str],
    /// Block comment start/end tokens (e.g. `/*`, `*/`).
    pub block: Option<(&'static str, &'static str)>,
}

impl CommentConfig {
    /// A config that supports only line comments.
    pub const fn line(tokens: &'static [&'static str]) -> Self {
        Self {
            line: tokens,
            block: None,
        }
    }

    /// A config that supports only block comments.
    pub const fn block(start: &'static str, end: &'static str) -> Self {
        Self {
            line: &[],
            block: Some((start, end)),
        }
    }

    /// A config that supports both line and block comments.
    pub const fn line_and_block(
        line: &'static [&'static str],
        start: &'static str,
        end: &'static str,
    ) -> Self {
        Self {
            line,
            block: Some((start, end)),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.iter().any(|token| !token.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block
            .is_some_and(|(start, end)| !start.is_empty() && !end.is_empty())
    }

    /// Returns `true` if `text` (already left-trimmed) is a line comment.
    pub fn is_line_comment(&self, text: &str) -> bool {
        self.line
            .iter()
            .any(|token| !token.is_empty() && text.starts_with(token))
    }
}

/// A source language with a bundled scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Python.
    Python,
    /// C.
    C,
    /// C++.
    Cpp,
    /// PHP.
    Php,
    /// Perl.
    Perl,
    /// Bourne-style shell scripts.
    Shell,
    /// Tcl.
    Tcl,
    /// NSIS installer scripts.
    Nsis,
    /// Verilog.
    Verilog,
    /// SystemVerilog.
    SystemVerilog,
    /// Cascading style sheets.
    Css,
    /// Editra style sheets.
    Ess,
    /// INI / conf files.
    Ini,
    /// DOS / Windows batch files.
    Batch,
    /// Lua.
    Lua,
    /// LaTeX.
    Latex,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 16] = [
        Self::Python,
        Self::C,
        Self::Cpp,
        Self::Php,
        Self::Perl,
        Self::Shell,
        Self::Tcl,
        Self::Nsis,
        Self::Verilog,
        Self::SystemVerilog,
        Self::Css,
        Self::Ess,
        Self::Ini,
        Self::Batch,
        Self::Lua,
        Self::Latex,
    ];

    /// Stable lowercase identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Php => "php",
            Self::Perl => "perl",
            Self::Shell => "shell",
            Self::Tcl => "tcl",
            Self::Nsis => "nsis",
            Self::Verilog => "verilog",
            Self::SystemVerilog => "systemverilog",
            Self::Css => "css",
            Self::Ess => "ess",
            Self::Ini => "ini",
            Self::Batch => "batch",
            Self::Lua => "lua",
            Self::Latex => "latex",
        }
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Php => "PHP",
            Self::Perl => "Perl",
            Self::Shell => "Shell Script",
            Self::Tcl => "Tcl/Tk",
            Self::Nsis => "NSIS",
            Self::Verilog => "Verilog",
            Self::SystemVerilog => "SystemVerilog",
            Self::Css => "CSS",
            Self::Ess => "Editra Style Sheet",
            Self::Ini => "INI",
            Self::Batch => "DOS Batch Script",
            Self::Lua => "Lua",
            Self::Latex => "LaTeX",
        }
    }

    /// File extensions (lowercase, without the dot).
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py", "pyw", "pyi"],
            Self::C => &["c", "h"],
            Self::Cpp => &["cc", "cpp", "cxx", "c++", "hh", "hpp", "hxx", "ipp", "inl"],
            Self::Php => &["php", "php3", "php4", "php5", "phtml"],
            Self::Perl => &["pl", "pm", "pod", "t"],
            Self::Shell => &["sh", "bash", "ksh", "zsh", "csh"],
            Self::Tcl => &["tcl", "tk", "itcl", "itk"],
            Self::Nsis => &["nsi", "nsh"],
            Self::Verilog => &["v", "vh"],
            Self::SystemVerilog => &["sv", "svh"],
            Self::Css => &["css"],
            Self::Ess => &["ess"],
            Self::Ini => &["ini", "cfg", "conf", "inf", "properties"],
            Self::Batch => &["bat", "cmd"],
            Self::Lua => &["lua"],
            Self::Latex => &["tex", "ltx", "sty", "cls", "dtx"],
        }
    }

    /// Comment tokens.
    pub fn comments(self) -> CommentConfig {
        match self {
            Self::Python | Self::Perl | Self::Shell | Self::Tcl => CommentConfig::line(&["#"]),
            Self::C | Self::Cpp | Self::Php | Self::Verilog | Self::SystemVerilog => {
                CommentConfig::line_and_block(&["//"], "/*", "*/")
            }
            Self::Nsis => CommentConfig::line_and_block(&[";", "#"], "/*", "*/"),
            Self::Css | Self::Ess => CommentConfig::block("/*", "*/"),
            Self::Ini => CommentConfig::line(&[";", "#"]),
            Self::Batch => CommentConfig::line(&["::", "rem ", "REM ", "Rem ", "@rem ", "@REM "]),
            Self::Lua => CommentConfig::line_and_block(&["--"], "--[[", "]]"),
            Self::Latex => CommentConfig::line(&["%"]),
        }
    }

    /// Language for a file extension (case-insensitive, with or without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    /// Language for a file path, detected from its extension.
    pub fn from_path(path: &Path) -> Result<Self, LanguageError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| LanguageError::NoExtension(path.to_path_buf()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    /// Parse an id or a common alias, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let lang = match key.as_str() {
            "py" | "python3" => Self::Python,
            "c++" | "cxx" => Self::Cpp,
            "sh" | "bash" | "zsh" | "ksh" => Self::Shell,
            "tk" => Self::Tcl,
            "nsi" => Self::Nsis,
            "sv" => Self::SystemVerilog,
            "conf" | "cfg" | "properties" => Self::Ini,
            "bat" | "cmd" | "dos" => Self::Batch,
            "tex" => Self::Latex,
            other => Self::ALL
                .into_iter()
                .find(|lang| lang.id() == other)
                .ok_or_else(|| LanguageError::Unknown(s.to_string()))?,
        };
        Ok(lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension(".HPP"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("sv"), Some(Language::SystemVerilog));
        assert_eq!(Language::from_extension("xyz"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Language::from_path(Path::new("src/setup.nsi")),
            Ok(Language::Nsis)
        );
        assert_eq!(
            Language::from_path(Path::new("Makefile")),
            Err(LanguageError::NoExtension(PathBuf::from("Makefile")))
        );
    }

    #[test]
    fn test_from_str_ids_and_aliases() {
        for lang in Language::ALL {
            assert_eq!(lang.id().parse::<Language>(), Ok(lang));
        }
        assert_eq!("Bash".parse::<Language>(), Ok(Language::Shell));
        assert_eq!(" c++ ".parse::<Language>(), Ok(Language::Cpp));
        assert_eq!(
            "cobol".parse::<Language>(),
            Err(LanguageError::Unknown("cobol".to_string()))
        );
    }

    #[test]
    fn test_extensions_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for lang in Language::ALL {
            for ext in lang.extensions() {
                assert!(seen.insert(*ext), "duplicate extension {ext}");
            }
        }
    }

    #[test]
    fn test_comment_config() {
        let nsis = Language::Nsis.comments();
        assert!(nsis.has_line());
        assert!(nsis.has_block());
        assert!(nsis.is_line_comment("; note"));
        assert!(nsis.is_line_comment("# note"));
        assert!(!nsis.is_line_comment("Section foo"));
        assert!(!Language::Css.comments().has_line());
        assert!(!CommentConfig::default().has_block());
    }
}
