use genpdf::Document;
use genpdf::SimplePageDecorator;
use genpdf::elements::Break;
use genpdf::elements::Image;
use genpdf::elements::LinearLayout;
use genpdf::elements::Paragraph;
use genpdf::fonts::FontData;
use genpdf::fonts::FontFamily;
use genpdf::style::Style;
use genpdf::style::StyledString;

use crate::DocmintError;
use crate::DocmintResult;
use crate::lexer;
use crate::lexer::Line;
use crate::lexer::SpanStyle;
use crate::lexer::StyledSpan;
use crate::render::ExportOptions;

const FONT_SIZE_PT: u8 = 11;
const LETTERHEAD_DPI: f64 = 150.0;

/// Load the configured font family from the fonts directory.
///
/// genpdf expects `<family>-Regular.ttf`, `<family>-Bold.ttf`,
/// `<family>-Italic.ttf`, and `<family>-BoldItalic.ttf` inside the
/// directory.
fn load_fonts(options: &ExportOptions) -> DocmintResult<FontFamily<FontData>> {
	genpdf::fonts::from_files(&options.fonts_dir, &options.font_family, None).map_err(|e| {
		DocmintError::FontLoad {
			family: options.font_family.clone(),
			dir: options.fonts_dir.display().to_string(),
			reason: e.to_string(),
		}
	})
}

/// Configure a document with fonts, sizing, and page margins applied.
fn configure_document(options: &ExportOptions) -> DocmintResult<Document> {
	let mut doc = Document::new(load_fonts(options)?);

	if let Some(title) = &options.title {
		doc.set_title(title.as_str());
	}

	doc.set_font_size(FONT_SIZE_PT);
	doc.set_line_spacing(1.0);

	let mut decorator = SimplePageDecorator::new();
	decorator.set_margins(10);
	doc.set_page_decorator(decorator);

	Ok(doc)
}

fn styled_string(span: &StyledSpan) -> StyledString {
	let style = match span.style {
		SpanStyle::Regular => Style::new(),
		SpanStyle::Bold => Style::new().bold(),
		SpanStyle::Italic => Style::new().italic(),
		SpanStyle::BoldItalic => Style::new().bold().italic(),
	};

	StyledString::new(span.text.clone(), style)
}

fn paragraph(spans: &[StyledSpan]) -> Paragraph {
	let mut p = Paragraph::new("");
	for span in spans {
		p.push(styled_string(span));
	}
	p
}

fn list_item(spans: &[StyledSpan]) -> LinearLayout {
	let mut p = Paragraph::new("");
	p.push(StyledString::new("• ", Style::new()));
	for span in spans {
		p.push(styled_string(span));
	}

	let mut layout = LinearLayout::vertical();
	layout.push(p);
	layout
}

/// Convert merged content to PDF bytes.
///
/// The optional letterhead image renders above the content. Content
/// structure comes from the shared styled-text lexer, so the PDF mirrors the
/// DOCX rendition line for line.
pub fn to_pdf(content: &str, options: &ExportOptions) -> DocmintResult<Vec<u8>> {
	let mut doc = configure_document(options)?;

	if let Some(path) = &options.letterhead {
		let mut image = Image::from_path(path).map_err(|e| {
			DocmintError::LetterheadImage {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;
		image.set_dpi(LETTERHEAD_DPI);
		doc.push(image);
		doc.push(Break::new(1));
	}

	for line in &lexer::parse_styled(content).lines {
		match line {
			Line::Blank => doc.push(Break::new(1)),
			Line::Paragraph(spans) => doc.push(paragraph(spans)),
			Line::ListItem(spans) => doc.push(list_item(spans)),
		}
	}

	let mut bytes = Vec::new();
	doc.render(&mut bytes)
		.map_err(|e| DocmintError::PdfRender(e.to_string()))?;

	Ok(bytes)
}
