//! Paginated document export.
//!
//! Landscape pages with a shaded, bold header row repeated on every page.
//! Paper grows with the column count (A4 up to A1) so wide tables stay
//! readable without dropping columns. Cell text has its line breaks
//! collapsed to single spaces and is truncated to the column width.
//!
//! Uses the standard Helvetica fonts with WinAnsiEncoding. Latin-1 text
//! and common typographic punctuation print as-is; anything else becomes `?`.

use crate::constants::{
    PDF_AVG_GLYPH_WIDTH, PDF_FONT_SIZE, PDF_MARGIN, PDF_ROW_HEIGHT, PDF_TITLE_SIZE,
};
use crate::format::cell_text;
use crate::types::{Column, Row};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

/// Horizontal padding inside a cell
const CELL_PADDING: f32 = 3.0;

/// Landscape paper dimensions in points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaperSize {
    pub name: &'static str,
    pub width: f32,
    pub height: f32,
}

pub const A4: PaperSize = PaperSize { name: "A4", width: 841.89, height: 595.28 };
pub const A3: PaperSize = PaperSize { name: "A3", width: 1190.55, height: 841.89 };
pub const A2: PaperSize = PaperSize { name: "A2", width: 1683.78, height: 1190.55 };
pub const A1: PaperSize = PaperSize { name: "A1", width: 2383.94, height: 1683.78 };

/// Smallest paper that keeps `columns` legible
pub fn paper_for_columns(columns: usize) -> PaperSize {
    match columns {
        0..=6 => A4,
        7..=10 => A3,
        11..=16 => A2,
        _ => A1,
    }
}

/// Replace each run of line breaks with one space
pub fn collapse_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if c == '\n' || c == '\r' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}

/// Body rows that fit on a page
fn rows_per_page(paper: PaperSize, first_page: bool) -> usize {
    // Header row and footer line always take a row each
    let mut available = paper.height - 2.0 * PDF_MARGIN - 2.0 * PDF_ROW_HEIGHT;
    if first_page {
        available -= PDF_TITLE_SIZE + PDF_ROW_HEIGHT;
    }
    ((available / PDF_ROW_HEIGHT).floor() as usize).max(1)
}

/// Pages needed for `rows` body rows across `columns` columns
pub fn page_count(rows: usize, columns: usize) -> usize {
    let paper = paper_for_columns(columns);
    let first = rows_per_page(paper, true);
    if rows <= first {
        return 1;
    }
    1 + (rows - first).div_ceil(rows_per_page(paper, false))
}

/// WinAnsiEncoding code for `c`, if the standard fonts can show it
fn win_ansi(c: char) -> Option<u8> {
    let code = match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‰' => 0x89,
        'Š' => 0x8a,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        'š' => 0x9a,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(code)
}

fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi(c).unwrap_or(b'?')).collect()
}

/// Truncate to what fits in `width` points, replacing characters the
/// standard fonts cannot show
fn fit_text(text: &str, width: f32) -> String {
    let glyph = PDF_FONT_SIZE * PDF_AVG_GLYPH_WIDTH;
    let max_chars = (((width - 2.0 * CELL_PADDING) / glyph).floor() as usize).max(1);

    let shown: String = collapse_line_breaks(text)
        .chars()
        .map(|c| if win_ansi(c).is_some() { c } else { '?' })
        .collect();

    if shown.chars().count() <= max_chars {
        shown
    } else if max_chars > 3 {
        let mut cut: String = shown.chars().take(max_chars - 3).collect();
        cut.push_str("...");
        cut
    } else {
        shown.chars().take(max_chars).collect()
    }
}

fn show_text(content: &mut Content, font: Name<'_>, size: f32, x: f32, y: f32, text: &str) {
    content.begin_text();
    content.set_font(font, size);
    content.next_line(x, y);
    content.show(Str(&encode_win_ansi(text)));
    content.end_text();
}

/// Draw one row of cells with its baseline at `y`
fn draw_row(content: &mut Content, cells: &[String], font: Name<'_>, col_width: f32, y: f32) {
    for (i, cell) in cells.iter().enumerate() {
        let x = PDF_MARGIN + i as f32 * col_width + CELL_PADDING;
        show_text(content, font, PDF_FONT_SIZE, x, y, &fit_text(cell, col_width));
    }
}

fn draw_rule(content: &mut Content, paper: PaperSize, y: f32) {
    content.set_stroke_rgb(0.886, 0.910, 0.941);
    content.set_line_width(0.5);
    content.move_to(PDF_MARGIN, y);
    content.line_to(paper.width - PDF_MARGIN, y);
    content.stroke();
}

/// Build the content stream for one page
fn render_page(
    paper: PaperSize,
    title: Option<&str>,
    labels: &[String],
    body: &[Vec<String>],
    page_no: usize,
    total_pages: usize,
) -> Vec<u8> {
    let col_width = (paper.width - 2.0 * PDF_MARGIN) / labels.len().max(1) as f32;
    let text_offset = (PDF_ROW_HEIGHT - PDF_FONT_SIZE) / 2.0 + 1.0;
    let mut content = Content::new();
    let mut top = paper.height - PDF_MARGIN;

    if let Some(title) = title {
        show_text(
            &mut content,
            FONT_BOLD,
            PDF_TITLE_SIZE,
            PDF_MARGIN,
            top - PDF_TITLE_SIZE,
            &fit_text(title, paper.width),
        );
        top -= PDF_TITLE_SIZE + PDF_ROW_HEIGHT;
    }

    // Header band
    content.set_fill_rgb(0.886, 0.910, 0.941);
    content.rect(
        PDF_MARGIN,
        top - PDF_ROW_HEIGHT,
        paper.width - 2.0 * PDF_MARGIN,
        PDF_ROW_HEIGHT,
    );
    content.fill_nonzero();
    content.set_fill_rgb(0.2, 0.255, 0.333);
    draw_row(&mut content, labels, FONT_BOLD, col_width, top - PDF_ROW_HEIGHT + text_offset);
    top -= PDF_ROW_HEIGHT;

    content.set_fill_rgb(0.059, 0.090, 0.165);
    for cells in body {
        draw_row(&mut content, cells, FONT_REGULAR, col_width, top - PDF_ROW_HEIGHT + text_offset);
        top -= PDF_ROW_HEIGHT;
        draw_rule(&mut content, paper, top);
    }

    let footer = format!("Page {} of {}", page_no, total_pages);
    let footer_x = paper.width
        - PDF_MARGIN
        - footer.len() as f32 * PDF_FONT_SIZE * PDF_AVG_GLYPH_WIDTH;
    show_text(&mut content, FONT_REGULAR, PDF_FONT_SIZE, footer_x, PDF_MARGIN, &footer);

    content.finish().to_vec()
}

/// Render `rows` as a landscape PDF with `title` on the first page
pub fn write_pdf(rows: &[Row], columns: &[Column], title: &str) -> Vec<u8> {
    let paper = paper_for_columns(columns.len());
    let labels: Vec<String> = columns.iter().map(|c| c.label.clone()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| cell_text(c, row.get(&c.key)))
                .collect()
        })
        .collect();

    // Split body rows into pages
    let mut pages: Vec<&[Vec<String>]> = Vec::new();
    let mut rest: &[Vec<String>] = &body;
    let mut first = true;
    loop {
        let take = rows_per_page(paper, first).min(rest.len());
        let (page, tail) = rest.split_at(take);
        pages.push(page);
        rest = tail;
        first = false;
        if rest.is_empty() {
            break;
        }
    }

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let page_ids: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new(5 + 2 * i as i32))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);
    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let total_pages = pages.len();
    for (i, body) in pages.iter().enumerate() {
        let page_id = page_ids[i];
        let content_id = Ref::new(page_id.get() + 1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, paper.width, paper.height));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(FONT_REGULAR, regular_id)
            .pair(FONT_BOLD, bold_id);
        page.finish();

        let title = (i == 0).then_some(title);
        let stream = render_page(paper, title, &labels, body, i + 1, total_pages);
        pdf.stream(content_id, &stream);
    }

    pdf.finish()
}
