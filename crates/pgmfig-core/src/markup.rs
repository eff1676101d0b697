//! Inline math markup for node labels and plate captions.
//!
//! Labels are written the way they would be in a LaTeX figure, e.g.
//! `$\alpha_b$`, `$L^\ast$` or `${}_{i=1,\ldots,m}$`. The parser turns such a
//! string into a flat list of [`Segment`]s, each a run of text sharing the
//! same slant and script level, which the label drawable maps onto SVG
//! `<tspan>` elements.
//!
//! # Supported syntax
//!
//! - text outside `$…$` is upright and kept verbatim; `\$` writes a literal
//!   dollar sign
//! - inside math, ASCII letters are italic; digits and punctuation upright;
//!   whitespace is ignored
//! - `_x` and `^x` put the next atom in subscript / superscript
//! - `{…}` groups atoms; `\mathrm{…}` sets its argument upright
//! - Greek letters and a handful of symbols (`\ast`, `\ldots`, `\infty`, ...)
//!
//! # Example
//!
//! ```
//! use pgmfig_core::markup::{Markup, Script};
//!
//! let markup = Markup::parse(r"$\alpha_b$").unwrap();
//! let segments = markup.segments();
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].text(), "α");
//! assert_eq!(segments[1].script(), Script::Subscript);
//! ```

use log::trace;
use thiserror::Error;
use winnow::{
    ModalResult, Parser as _,
    ascii::{alpha1, multispace0},
    combinator::{alt, cut_err, delimited, opt, preceded, repeat},
    error::{ContextError, ErrMode, StrContext, StrContextValue},
    stream::Stream,
    token::{one_of, take_till},
};

type Input<'src> = &'src str;

/// Vertical placement of a run of text relative to the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Script {
    #[default]
    Normal,
    Subscript,
    Superscript,
}

/// A run of label text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    text: String,
    italic: bool,
    script: Script,
}

impl Segment {
    fn new(text: impl Into<String>, italic: bool, script: Script) -> Self {
        Self {
            text: text.into(),
            italic,
            script,
        }
    }

    /// Returns the text of this run.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the run is set in italics.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns the script level of the run.
    pub fn script(&self) -> Script {
        self.script
    }
}

/// Error produced when label markup cannot be parsed.
///
/// Carries the full label text and the byte offset of the problem so that
/// callers can point at it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid label markup `{source_text}` at offset {offset}: {message}")]
pub struct MarkupError {
    source_text: String,
    offset: usize,
    message: String,
}

impl MarkupError {
    /// Returns the label text that failed to parse.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Returns the byte offset into [`Self::source_text`] of the problem.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the parser's description of what went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A parsed label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    segments: Vec<Segment>,
}

impl Markup {
    /// Parses label markup.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] for an unterminated `$` or `{`, a dangling
    /// `_`/`^`, or an unknown `\command`.
    pub fn parse(source: &str) -> Result<Self, MarkupError> {
        let segments = document.parse(source).map_err(|err| {
            let message = err.inner().to_string().replace('\n', "; ");
            MarkupError {
                source_text: source.to_string(),
                offset: err.offset(),
                message: if message.is_empty() {
                    "unexpected input".to_string()
                } else {
                    message
                },
            }
        })?;
        trace!(source, segments = segments.len(); "Parsed label markup");
        Ok(Self { segments })
    }

    /// Returns the styled runs of the label, in reading order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the label renders no text.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|segment| segment.text.is_empty())
    }

    /// Returns the label text without any styling.
    ///
    /// ```
    /// use pgmfig_core::markup::Markup;
    ///
    /// let markup = Markup::parse(r"$L_{g,i}$").unwrap();
    /// assert_eq!(markup.plain_text(), "Lg,i");
    /// ```
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|segment| segment.text()).collect()
    }
}

// =============================================================================
// Parsers
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
struct MathStyle {
    script: Script,
    upright: bool,
}

impl MathStyle {
    fn with_script(self, script: Script) -> Self {
        Self { script, ..self }
    }

    fn upright(self) -> Self {
        Self {
            upright: true,
            ..self
        }
    }
}

fn document(input: &mut Input<'_>) -> ModalResult<Vec<Segment>> {
    let parts: Vec<Vec<Segment>> = repeat(0.., alt((math, plain))).parse_next(input)?;
    Ok(merge_segments(parts.into_iter().flatten()))
}

fn plain<'src>(input: &mut Input<'src>) -> ModalResult<Vec<Segment>> {
    alt((
        "\\$".value("$"),
        take_till(1.., ['$', '\\']),
        "\\".value("\\"),
    ))
    .map(|text: &'src str| vec![Segment::new(text, false, Script::Normal)])
    .parse_next(input)
}

fn math<'src>(input: &mut Input<'src>) -> ModalResult<Vec<Segment>> {
    delimited(
        '$',
        |i: &mut Input<'src>| math_list(i, MathStyle::default()),
        cut_err('$')
            .context(StrContext::Label("math"))
            .context(StrContext::Expected(StrContextValue::CharLiteral('$'))),
    )
    .parse_next(input)
}

/// Parses atoms until one fails to start (a closing `}` or `$`, or end of input).
fn math_list<'src>(input: &mut Input<'src>, style: MathStyle) -> ModalResult<Vec<Segment>> {
    let mut segments = Vec::new();
    loop {
        let checkpoint = input.checkpoint();
        match math_item(input, style) {
            Ok(mut item) => segments.append(&mut item),
            Err(ErrMode::Backtrack(_)) => {
                input.reset(&checkpoint);
                break;
            }
            Err(err) => return Err(err),
        }
    }
    skip_space(input)?;
    Ok(segments)
}

fn math_item<'src>(input: &mut Input<'src>, style: MathStyle) -> ModalResult<Vec<Segment>> {
    skip_space(input)?;
    match opt(script_marker).parse_next(input)? {
        Some(marker) => {
            let script = if marker == '_' {
                Script::Subscript
            } else {
                Script::Superscript
            };
            let nested = style.with_script(script);
            cut_err(move |i: &mut Input<'src>| atom(i, nested))
                .context(StrContext::Label("script argument"))
                .parse_next(input)
        }
        None => atom(input, style),
    }
}

fn atom<'src>(input: &mut Input<'src>, style: MathStyle) -> ModalResult<Vec<Segment>> {
    skip_space(input)?;
    alt((
        move |i: &mut Input<'src>| group(i, style),
        move |i: &mut Input<'src>| command(i, style),
        letter.map(move |c| vec![Segment::new(c, !style.upright, style.script)]),
        symbol_char.map(move |c| vec![Segment::new(c, false, style.script)]),
    ))
    .parse_next(input)
}

fn group<'src>(input: &mut Input<'src>, style: MathStyle) -> ModalResult<Vec<Segment>> {
    delimited(
        '{',
        move |i: &mut Input<'src>| math_list(i, style),
        cut_err('}')
            .context(StrContext::Label("group"))
            .context(StrContext::Expected(StrContextValue::CharLiteral('}'))),
    )
    .parse_next(input)
}

fn command<'src>(input: &mut Input<'src>, style: MathStyle) -> ModalResult<Vec<Segment>> {
    let start = input.checkpoint();
    let name = command_name(input)?;

    if matches!(name, "mathrm" | "rm" | "text") {
        let upright = style.upright();
        return cut_err(move |i: &mut Input<'src>| atom(i, upright))
            .context(StrContext::Label("\\mathrm argument"))
            .parse_next(input);
    }

    match symbol(name) {
        Some((glyph, italic)) => Ok(vec![Segment::new(
            glyph,
            italic && !style.upright,
            style.script,
        )]),
        None => {
            input.reset(&start);
            let mut err = ContextError::new();
            err.push(StrContext::Label("command"));
            err.push(StrContext::Expected(StrContextValue::Description(
                "a supported math command",
            )));
            Err(ErrMode::Cut(err))
        }
    }
}

fn command_name<'src>(input: &mut Input<'src>) -> ModalResult<&'src str> {
    preceded(
        '\\',
        alt((
            alpha1,
            one_of([',', ';', '!', ' ', '{', '}', '$', '_', '\\']).take(),
        )),
    )
    .parse_next(input)
}

fn script_marker(input: &mut Input<'_>) -> ModalResult<char> {
    one_of(['_', '^']).parse_next(input)
}

fn letter(input: &mut Input<'_>) -> ModalResult<char> {
    one_of(|c: char| c.is_ascii_alphabetic()).parse_next(input)
}

fn symbol_char(input: &mut Input<'_>) -> ModalResult<char> {
    one_of(|c: char| !c.is_whitespace() && !matches!(c, '$' | '{' | '}' | '_' | '^' | '\\'))
        .parse_next(input)
}

fn skip_space(input: &mut Input<'_>) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

/// Maps a command name to its glyph and whether math mode slants it.
fn symbol(name: &str) -> Option<(&'static str, bool)> {
    let entry = match name {
        "alpha" => ("α", true),
        "beta" => ("β", true),
        "gamma" => ("γ", true),
        "delta" => ("δ", true),
        "epsilon" => ("ϵ", true),
        "varepsilon" => ("ε", true),
        "zeta" => ("ζ", true),
        "eta" => ("η", true),
        "theta" => ("θ", true),
        "iota" => ("ι", true),
        "kappa" => ("κ", true),
        "lambda" => ("λ", true),
        "mu" => ("μ", true),
        "nu" => ("ν", true),
        "xi" => ("ξ", true),
        "pi" => ("π", true),
        "rho" => ("ρ", true),
        "sigma" => ("σ", true),
        "tau" => ("τ", true),
        "upsilon" => ("υ", true),
        "phi" => ("ϕ", true),
        "varphi" => ("φ", true),
        "chi" => ("χ", true),
        "psi" => ("ψ", true),
        "omega" => ("ω", true),
        "Gamma" => ("Γ", false),
        "Delta" => ("Δ", false),
        "Theta" => ("Θ", false),
        "Lambda" => ("Λ", false),
        "Xi" => ("Ξ", false),
        "Pi" => ("Π", false),
        "Sigma" => ("Σ", false),
        "Phi" => ("Φ", false),
        "Psi" => ("Ψ", false),
        "Omega" => ("Ω", false),
        "ast" => ("∗", false),
        "star" => ("⋆", false),
        "ldots" => ("…", false),
        "cdots" => ("⋯", false),
        "cdot" => ("·", false),
        "times" => ("×", false),
        "infty" => ("∞", false),
        "sim" => ("∼", false),
        "prime" => ("′", false),
        "," => ("\u{2009}", false),
        ";" | " " => ("\u{2005}", false),
        "!" => ("", false),
        "{" => ("{", false),
        "}" => ("}", false),
        "$" => ("$", false),
        "_" => ("_", false),
        "\\" => ("\\", false),
        _ => return None,
    };
    Some(entry)
}

/// Joins neighbouring runs that share styling and drops empty ones.
fn merge_segments(segments: impl IntoIterator<Item = Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::new();
    for segment in segments {
        if segment.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.italic == segment.italic && last.script == segment.script => {
                last.text.push_str(&segment.text);
            }
            _ => merged.push(segment),
        }
    }
    merged
}
