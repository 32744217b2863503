use std::io::Cursor;

use docx_rs::Docx;
use docx_rs::Paragraph;
use docx_rs::Run;

use crate::DocmintError;
use crate::DocmintResult;
use crate::lexer;
use crate::lexer::Line;
use crate::lexer::SpanStyle;
use crate::lexer::StyledSpan;

fn styled_run(span: &StyledSpan) -> Run {
	let run = Run::new().add_text(span.text.as_str());

	match span.style {
		SpanStyle::Regular => run,
		SpanStyle::Bold => run.bold(),
		SpanStyle::Italic => run.italic(),
		SpanStyle::BoldItalic => run.bold().italic(),
	}
}

fn paragraph(spans: &[StyledSpan], bullet: bool) -> Paragraph {
	let mut p = Paragraph::new();

	if bullet {
		p = p.add_run(Run::new().add_text("• "));
	}

	for span in spans {
		p = p.add_run(styled_run(span));
	}

	p
}

/// Convert merged content to DOCX bytes.
///
/// One docx paragraph per styled line; list items carry a literal bullet
/// prefix so the DOCX rendition matches the PDF without numbering
/// definitions. The builder touches no ambient state, so equal content
/// packs to identical bytes.
pub fn to_docx(content: &str) -> DocmintResult<Vec<u8>> {
	let mut docx = Docx::new();

	for line in &lexer::parse_styled(content).lines {
		docx = match line {
			Line::Blank => docx.add_paragraph(Paragraph::new()),
			Line::Paragraph(spans) => docx.add_paragraph(paragraph(spans, false)),
			Line::ListItem(spans) => docx.add_paragraph(paragraph(spans, true)),
		};
	}

	let mut cursor = Cursor::new(Vec::new());
	docx.build()
		.pack(&mut cursor)
		.map_err(|e| DocmintError::DocxRender(e.to_string()))?;

	Ok(cursor.into_inner())
}
