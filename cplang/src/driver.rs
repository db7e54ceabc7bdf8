use crate::comment::{CommentState, LineScope};
use crate::error::{RewriteWarning, TranspileError, TranspileResult};
use crate::lexer::{self, Token};
use crate::rewrite;
use crate::toolchain;

use log::{debug, warn};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Extension every source file must carry.
pub const SOURCE_EXTENSION: &str = "cpl";

/// Extension of the generated translation unit.
pub const UNIT_EXTENSION: &str = "c";

/// The generated C file, one entry per translated source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationUnit {
    lines: Vec<String>,
}

impl TranslationUnit {
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Output lines, each ending in `\n`.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contents(&self) -> String {
        self.lines.concat()
    }

    pub fn write_to(&self, path: &Path) -> TranspileResult<()> {
        std::fs::write(path, self.contents()).map_err(|source| TranspileError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Result of translating one source file.
#[derive(Debug, Default)]
pub struct Translation {
    pub unit: TranslationUnit,
    /// Source lines that could not be decoded and were left out.
    pub skipped: usize,
    /// Rewrite warnings with the 1-based line they came from.
    pub warnings: Vec<(usize, RewriteWarning)>,
    /// Comment state after the last line.
    pub comment_state: CommentState,
}

/// One translated line.
#[derive(Debug)]
pub struct TranslatedLine {
    pub tokens: Vec<Token>,
    pub warnings: Vec<RewriteWarning>,
}

impl TranslatedLine {
    pub fn render(&self) -> String {
        lexer::render(&self.tokens)
    }
}

/// Translates a single line: tokenize, track comments, rewrite.
pub fn translate_line(line: &str, state: &mut CommentState) -> TranslatedLine {
    let mut tokens = lexer::tokenize(line);
    rewrite::strip_line_comments(&mut tokens);

    if rewrite::is_blank(&tokens) {
        return TranslatedLine {
            tokens: vec![Token::newline()],
            warnings: Vec::new(),
        };
    }

    let warnings = match state.track(&mut tokens) {
        LineScope::Code => rewrite::rewrite(&mut tokens),
        LineScope::Comment => Vec::new(),
        LineScope::CodeFrom(start) => {
            let mut code = tokens.split_off(start);
            let warnings = if rewrite::is_blank(&code) {
                Vec::new()
            } else {
                rewrite::rewrite(&mut code)
            };
            tokens.append(&mut code);
            warnings
        }
    };

    tokens.push(Token::newline());
    TranslatedLine { tokens, warnings }
}

/// Translates a stream of source lines in a single forward pass.
///
/// A line that is not valid UTF-8 is skipped and produces no output line.
pub fn translate_reader<R: BufRead>(reader: R) -> std::io::Result<Translation> {
    let mut translation = Translation::default();
    let mut state = CommentState::default();

    for (index, raw) in reader.split(b'\n').enumerate() {
        let number = index + 1;
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        let Ok(line) = String::from_utf8(raw) else {
            warn!("line {number}: not valid UTF-8, skipping");
            translation.skipped += 1;
            continue;
        };

        let translated = translate_line(&line, &mut state);
        for warning in translated.warnings.iter() {
            warn!("line {number}: {warning}");
        }
        let out = translated.render();
        debug!("line {number}: {line:?} -> {out:?}");

        translation.unit.push(out);
        translation
            .warnings
            .extend(translated.warnings.into_iter().map(|w| (number, w)));
    }

    translation.comment_state = state;
    Ok(translation)
}

/// Translates one `.cpl` file into the `.c` file next to it.
pub struct Translator {
    source: PathBuf,
    output: PathBuf,
}

impl Translator {
    /// Checks the source path before anything is touched.
    pub fn open(source: impl AsRef<Path>) -> TranspileResult<Self> {
        let source = source.as_ref();

        if source.extension().is_none_or(|ext| ext != SOURCE_EXTENSION) {
            return Err(TranspileError::WrongExtension(source.to_path_buf()));
        }
        if !source.is_file() {
            return Err(TranspileError::SourceNotFound(source.to_path_buf()));
        }

        Ok(Self {
            source: source.to_path_buf(),
            output: source.with_extension(UNIT_EXTENSION),
        })
    }

    /// Path of the generated translation unit.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Path of the binary the translation unit compiles to.
    pub fn binary(&self) -> PathBuf {
        toolchain::binary_path(&self.source)
    }

    /// Translates the source without writing anything.
    pub fn translate(&self) -> TranspileResult<Translation> {
        let read_error = |source| TranspileError::Read {
            path: self.source.clone(),
            source,
        };
        let file = File::open(&self.source).map_err(read_error)?;
        translate_reader(BufReader::new(file)).map_err(read_error)
    }

    /// Removes any stale translation unit, then translates and writes a
    /// fresh one.
    pub fn translate_to_file(&self) -> TranspileResult<Translation> {
        toolchain::remove_artifact(&self.output, "old output file");

        let translation = self.translate()?;
        translation.unit.write_to(&self.output)?;
        debug!(
            "wrote {} lines to {}",
            translation.unit.lines().len(),
            self.output.display()
        );
        Ok(translation)
    }
}
