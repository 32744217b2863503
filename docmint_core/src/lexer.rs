use logos::Logos;

/// Raw tokens produced by logos for inline style markers within one line.
///
/// Marker runs are maximal: `***` never lexes as `**` + `*`, so the three
/// marker kinds are unambiguous at every position.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[token("***")]
	TripleStar,
	#[token("**")]
	DoubleStar,
	#[token("*")]
	Star,
	#[regex(r"[^*]+")]
	Text,
}

/// Inline styling applied to a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
	Regular,
	Bold,
	Italic,
	BoldItalic,
}

/// A run of text rendered with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
	pub text: String,
	pub style: SpanStyle,
}

impl StyledSpan {
	pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
		Self {
			text: text.into(),
			style,
		}
	}
}

/// One logical line of styled content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
	/// An empty source line, preserved as vertical space in export.
	Blank,
	Paragraph(Vec<StyledSpan>),
	/// A line starting with `- `; spans cover the text after the marker.
	ListItem(Vec<StyledSpan>),
}

/// Styled representation of merged content.
///
/// Both exporters consume this, so the PDF and DOCX renditions of the same
/// content always share paragraph and list structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
	pub lines: Vec<Line>,
}

/// Lex merged content into styled lines.
///
/// Line grammar: an empty line is blank space, a `- ` prefix marks a list
/// item, anything else is a paragraph. Within a line, `***bold italic***`,
/// `**bold**`, and `*italic*` marker pairs produce styled spans; a marker
/// without a closing partner on the same line stays literal text.
pub fn parse_styled(content: &str) -> StyledText {
	let lines = content
		.lines()
		.map(|raw| {
			if raw.is_empty() {
				Line::Blank
			} else if let Some(item) = raw.strip_prefix("- ") {
				Line::ListItem(lex_spans(item))
			} else {
				Line::Paragraph(lex_spans(raw))
			}
		})
		.collect();

	StyledText { lines }
}

fn style_for(marker: &RawToken) -> SpanStyle {
	match marker {
		RawToken::TripleStar => SpanStyle::BoldItalic,
		RawToken::DoubleStar => SpanStyle::Bold,
		_ => SpanStyle::Italic,
	}
}

fn is_marker(token: &Result<RawToken, ()>, marker: &RawToken) -> bool {
	matches!(token, Ok(t) if t == marker)
}

fn push_span(spans: &mut Vec<StyledSpan>, text: &str, style: SpanStyle) {
	if !text.is_empty() {
		spans.push(StyledSpan::new(text, style));
	}
}

/// Walk the logos token stream of a single line, pairing style markers.
fn lex_spans(line: &str) -> Vec<StyledSpan> {
	let raw: Vec<_> = RawToken::lexer(line).spanned().collect();
	let mut spans = Vec::new();
	let mut cursor = 0;

	while cursor < raw.len() {
		let (token, range) = &raw[cursor];

		let marker = match token {
			Ok(RawToken::Text) | Err(()) => {
				push_span(&mut spans, &line[range.clone()], SpanStyle::Regular);
				cursor += 1;
				continue;
			}
			Ok(marker) => marker,
		};

		// Look for the matching closing marker on this line.
		let closing = raw[cursor + 1..]
			.iter()
			.position(|(candidate, _)| is_marker(candidate, marker));

		match closing {
			Some(offset) => {
				let close = cursor + 1 + offset;
				let inner_start = range.end;
				let inner_end = raw[close].1.start;
				// Different markers inside the pair stay literal.
				push_span(&mut spans, &line[inner_start..inner_end], style_for(marker));
				cursor = close + 1;
			}
			None => {
				// Unmatched marker: keep it as literal text.
				push_span(&mut spans, &line[range.clone()], SpanStyle::Regular);
				cursor += 1;
			}
		}
	}

	spans
}
