//! Exportación a PDF
//!
//! Este módulo dibuja los documentos A4 de la aplicación con `pdf-writer`:
//! el recibo de sueldo de un empleado y la tabla multipágina de movimientos
//! de stock. Con `PDF_FONT_PATH` se embebe una fuente TrueType (CIDFont con
//! codificación Identity-H) y el texto se dibuja tal cual; sin ella se usa
//! Helvetica y el texto se reduce a ASCII.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, TextRenderingMode, UnicodeCmap};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use rust_decimal::{Decimal, RoundingStrategy};
use ttf_parser::{name_id, Face, GlyphId};

use crate::dto::employee_dto::SalarySummaryResponse;
use crate::models::stock::StockMovement;
use crate::services::payroll::month_name;
use crate::utils::errors::{AppError, AppResult};

const PAGE_W: f32 = 595.0;
const PAGE_H: f32 = 842.0;
const MARGIN: f32 = 50.0;
const ROW_H: f32 = 20.0;

const FONT_SIZE: f32 = 10.0;
const HEADER_FONT_SIZE: f32 = 11.0;
const TITLE_FONT_SIZE: f32 = 14.0;

const STOCK_HEADERS: [&str; 6] = ["Date", "Material", "Type", "Quantity", "Unit", "Note"];

const IDENTITY: SystemInfo<'static> = SystemInfo {
    registry: Str(b"Adobe"),
    ordering: Str(b"Identity"),
    supplement: 0,
};

/// Helvetica sólo cubre ASCII; el resto se reemplaza por '?'
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// `1234.5` -> `1,234.50`
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let raw = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Fuente TrueType para los PDF, validada al cargarla
#[derive(Debug)]
pub struct EmbeddedFont {
    data: Vec<u8>,
    postscript_name: String,
    units_per_em: f32,
    ascent: f32,
    descent: f32,
    cap_height: f32,
    bbox: Rect,
}

impl EmbeddedFont {
    pub fn load(path: &str) -> AppResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| AppError::Export(format!("No se pudo leer la fuente '{}': {}", path, e)))?;
        Self::from_bytes(data)
    }

    /// Sólo contornos `glyf`; las OpenType CFF (`OTTO`) se rechazan
    pub fn from_bytes(data: Vec<u8>) -> AppResult<Self> {
        if data.starts_with(b"OTTO") {
            return Err(AppError::Export(
                "Sólo se admiten fuentes TrueType, no OpenType CFF".to_string(),
            ));
        }

        let (postscript_name, units_per_em, ascent, descent, cap_height, bbox) = {
            let face = Face::parse(&data, 0)
                .map_err(|e| AppError::Export(format!("Fuente inválida: {}", e)))?;

            let units_per_em = f32::from(face.units_per_em());
            let to_pdf = |v: i16| f32::from(v) * 1000.0 / units_per_em;

            let name: String = face
                .names()
                .into_iter()
                .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
                .find_map(|n| n.to_string())
                .unwrap_or_default()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect();

            let global = face.global_bounding_box();
            (
                if name.is_empty() { "EmbeddedFont".to_string() } else { name },
                units_per_em,
                to_pdf(face.ascender()),
                to_pdf(face.descender()),
                to_pdf(face.capital_height().unwrap_or_else(|| face.ascender())),
                Rect::new(
                    to_pdf(global.x_min),
                    to_pdf(global.y_min),
                    to_pdf(global.x_max),
                    to_pdf(global.y_max),
                ),
            )
        };

        Ok(Self {
            data,
            postscript_name,
            units_per_em,
            ascent,
            descent,
            cap_height,
            bbox,
        })
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, 0).ok()
    }
}

/// Fuentes del documento y glifos usados (para `/W` y `/ToUnicode`)
enum Fonts<'f> {
    Standard {
        regular: Ref,
        bold: Ref,
    },
    Embedded {
        font: &'f EmbeddedFont,
        face: Face<'f>,
        type0: Ref,
        used: BTreeMap<u16, (f32, char)>,
    },
}

impl<'f> Fonts<'f> {
    fn refs(&self) -> (Ref, Ref) {
        match self {
            Fonts::Standard { regular, bold } => (*regular, *bold),
            Fonts::Embedded { type0, .. } => (*type0, *type0),
        }
    }

    /// Avance de un carácter en puntos
    fn char_width(&self, c: char, size: f32) -> f32 {
        match self {
            Fonts::Standard { .. } => size * 0.5,
            Fonts::Embedded { font, face, .. } => {
                let gid = face.glyph_index(c).unwrap_or(GlyphId(0));
                f32::from(face.glyph_hor_advance(gid).unwrap_or(0)) * size / font.units_per_em
            }
        }
    }

    fn width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.char_width(c, size)).sum()
    }

    /// Prefijo del texto que entra en `max_width`
    fn clip(&self, text: &str, size: f32, max_width: f32) -> String {
        let mut used = 0.0;
        text.chars()
            .take_while(|c| {
                used += self.char_width(*c, size);
                used <= max_width
            })
            .collect()
    }

    fn encode(&mut self, text: &str) -> Vec<u8> {
        match self {
            Fonts::Standard { .. } => sanitize_text(text).into_bytes(),
            Fonts::Embedded {
                font, face, used, ..
            } => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for c in text.chars().filter(|c| !c.is_control()) {
                    let gid = face.glyph_index(c).unwrap_or(GlyphId(0));
                    let advance = f32::from(face.glyph_hor_advance(gid).unwrap_or(0)) * 1000.0
                        / font.units_per_em;
                    used.entry(gid.0).or_insert((advance, c));
                    bytes.extend_from_slice(&gid.0.to_be_bytes());
                }
                bytes
            }
        }
    }

    fn draw(&mut self, content: &mut Content, x: f32, y: f32, size: f32, bold: bool, text: &str) {
        let font: &[u8] = if bold { b"F2" } else { b"F1" };
        // la fuente embebida no tiene variante negrita: se rellena y contornea
        let fake_bold = bold && matches!(self, Fonts::Embedded { .. });
        let encoded = self.encode(text);

        content.begin_text();
        content.set_font(Name(font), size);
        if fake_bold {
            content.set_text_rendering_mode(TextRenderingMode::FillStroke);
            content.set_line_width(size * 0.03);
        }
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&encoded));
        if fake_bold {
            content.set_text_rendering_mode(TextRenderingMode::Fill);
        }
        content.end_text();
    }

    fn draw_right(&mut self, content: &mut Content, right: f32, y: f32, size: f32, bold: bool, text: &str) {
        let x = right - self.width(text, size);
        self.draw(content, x, y, size, bold, text);
    }

    /// Objetos de la fuente embebida: Type0, CIDFont, descriptor, archivo y ToUnicode
    fn write_embedded(&self, pdf: &mut Pdf, next_ref: &mut impl FnMut() -> Ref) {
        let Fonts::Embedded {
            font, type0, used, ..
        } = self
        else {
            return;
        };

        let cid_id = next_ref();
        let descriptor_id = next_ref();
        let file_id = next_ref();
        let cmap_id = next_ref();
        let base = Name(font.postscript_name.as_bytes());

        pdf.type0_font(*type0)
            .base_font(base)
            .encoding_predefined(Name(b"Identity-H"))
            .descendant_font(cid_id)
            .to_unicode(cmap_id);

        let mut cid = pdf.cid_font(cid_id);
        cid.subtype(CidFontType::Type2)
            .base_font(base)
            .system_info(IDENTITY)
            .font_descriptor(descriptor_id)
            .default_width(0.0)
            .cid_to_gid_map_predefined(Name(b"Identity"));
        let mut widths = cid.widths();
        for (gid, (advance, _)) in used {
            widths.consecutive(*gid, [*advance]);
        }
        drop(widths);
        drop(cid);

        pdf.font_descriptor(descriptor_id)
            .name(base)
            .flags(FontFlags::SYMBOLIC)
            .bbox(font.bbox)
            .italic_angle(0.0)
            .ascent(font.ascent)
            .descent(font.descent)
            .cap_height(font.cap_height)
            .stem_v(80.0)
            .font_file2(file_id);

        let mut stream = pdf.stream(file_id, &font.data);
        stream.pair(Name(b"Length1"), font.data.len() as i32);
        drop(stream);

        let mut cmap = UnicodeCmap::<u16>::new(Name(b"Custom"), IDENTITY);
        for (gid, (_, c)) in used {
            cmap.pair(*gid, *c);
        }
        let cmap_data = cmap.finish();
        pdf.cmap(cmap_id, &cmap_data);
    }
}

struct PdfDocument<'f> {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,
    next_id: i32,
    fonts: Fonts<'f>,
}

impl<'f> PdfDocument<'f> {
    fn new(font: Option<&'f EmbeddedFont>) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);

        let embedded = font.and_then(|font| font.face().map(|face| (font, face)));
        let fonts = match embedded {
            Some((font, face)) => Fonts::Embedded {
                font,
                face,
                type0: Ref::new(3),
                used: BTreeMap::new(),
            },
            None => {
                let regular = Ref::new(3);
                let bold = Ref::new(4);
                pdf.type1_font(regular).base_font(Name(b"Helvetica"));
                pdf.type1_font(bold).base_font(Name(b"Helvetica-Bold"));
                Fonts::Standard { regular, bold }
            }
        };

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,
            next_id: 5,
            fonts,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        let (regular, bold) = self.fonts.refs();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
            .contents(content_id);

        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(b"F1"), regular);
        fonts.pair(Name(b"F2"), bold);
        drop(fonts);
        drop(resources);
        drop(page);

        self.current_content_id = Some(content_id);
        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn finish(self) -> Vec<u8> {
        let PdfDocument {
            mut pdf,
            catalog_id,
            pages_id,
            page_refs,
            mut next_id,
            fonts,
            ..
        } = self;

        let mut next_ref = || {
            let id = Ref::new(next_id);
            next_id += 1;
            id
        };
        fonts.write_embedded(&mut pdf, &mut next_ref);

        pdf.catalog(catalog_id).pages(pages_id);
        let mut pages = pdf.pages(pages_id);
        pages.count(page_refs.len() as i32);
        pages.kids(page_refs.iter().copied());
        drop(pages);

        pdf.finish()
    }
}

fn draw_line(content: &mut Content, x1: f32, y: f32, x2: f32) {
    content.save_state();
    content.set_stroke_rgb(0.65, 0.65, 0.65);
    content.set_line_width(0.8);
    content.move_to(x1, y);
    content.line_to(x2, y);
    content.stroke();
    content.restore_state();
}

fn fill_band(content: &mut Content, y: f32, width: f32, gray: f32) {
    content.save_state();
    content.set_fill_rgb(gray, gray, gray);
    content.rect(MARGIN, y, width, ROW_H);
    content.fill_nonzero();
    content.restore_state();
}

/// Recibo de sueldo A4 de una nómina
pub fn salary_slip_pdf(
    entry: &SalarySummaryResponse,
    generated_at: DateTime<Utc>,
    font: Option<&EmbeddedFont>,
) -> Vec<u8> {
    let summary = &entry.summary;
    let employee = &entry.employee;

    let mut doc = PdfDocument::new(font);
    let mut content = doc.new_page();

    let left = MARGIN;
    let right = PAGE_W - MARGIN;
    let mut y = PAGE_H - MARGIN - 10.0;

    doc.fonts.draw(&mut content, left, y, 18.0, true, "SALARY SLIP");
    y -= 22.0;
    doc.fonts.draw(
        &mut content,
        left,
        y,
        HEADER_FONT_SIZE,
        false,
        &format!("Period: {} {}", month_name(summary.month), summary.year),
    );
    y -= 14.0;
    draw_line(&mut content, left, y, right);

    // empleado
    y -= 24.0;
    doc.fonts.draw(&mut content, left, y, HEADER_FONT_SIZE, true, "Employee");
    y -= 18.0;
    doc.fonts.draw(&mut content, left, y, FONT_SIZE, false, &format!("Name: {}", employee.name));
    y -= 15.0;
    doc.fonts.draw(
        &mut content,
        left,
        y,
        FONT_SIZE,
        false,
        &format!("Employee ID: {}", employee.id),
    );
    y -= 15.0;
    doc.fonts.draw(
        &mut content,
        left,
        y,
        FONT_SIZE,
        false,
        &format!(
            "Truck license: {}",
            employee.truck_license.as_deref().unwrap_or("-")
        ),
    );
    y -= 15.0;
    doc.fonts.draw(
        &mut content,
        left,
        y,
        FONT_SIZE,
        false,
        &format!("Rate per trip: {}", format_amount(employee.rate_per_trip)),
    );

    // desglose
    y -= 30.0;
    doc.fonts.draw(&mut content, left, y, HEADER_FONT_SIZE, true, "Breakdown");
    y -= 8.0;
    draw_line(&mut content, left, y, right);

    let breakdown = [
        ("Base salary".to_string(), format_amount(summary.base_salary)),
        ("Trips".to_string(), summary.total_trips.to_string()),
        ("Trip income".to_string(), format_amount(summary.total_trip_income)),
        (
            "Advances".to_string(),
            format!("-{}", format_amount(summary.total_advances)),
        ),
    ];

    for (label, value) in breakdown.iter() {
        y -= 18.0;
        doc.fonts.draw(&mut content, left, y, FONT_SIZE, false, label);
        doc.fonts.draw_right(&mut content, right, y, FONT_SIZE, false, value);
    }

    y -= 10.0;
    draw_line(&mut content, left, y, right);
    y -= 22.0;
    doc.fonts.draw(&mut content, left, y, TITLE_FONT_SIZE, true, "Net salary");
    doc.fonts.draw_right(
        &mut content,
        right,
        y,
        TITLE_FONT_SIZE,
        true,
        &format_amount(summary.net_salary),
    );

    // estado de pago
    y -= 30.0;
    let status = match (summary.is_paid, summary.paid_date) {
        (true, Some(date)) => format!("Status: Paid on {}", date.format("%Y-%m-%d")),
        (true, None) => "Status: Paid".to_string(),
        (false, _) => "Status: Unpaid".to_string(),
    };
    doc.fonts.draw(&mut content, left, y, FONT_SIZE, true, &status);

    doc.fonts.draw(
        &mut content,
        left,
        MARGIN - 15.0,
        8.0,
        false,
        &format!(
            "Generated on {} - this document is computer generated",
            generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
    );

    doc.finalize_page(content);
    doc.finish()
}

fn movement_row(movement: &StockMovement) -> Vec<String> {
    vec![
        movement.transaction_date.format("%Y-%m-%d").to_string(),
        movement.material_name.clone(),
        movement.kind.label().to_string(),
        format_amount(movement.quantity),
        movement.unit.clone(),
        movement.note.clone().unwrap_or_default(),
    ]
}

fn compute_col_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
    let mut widths: Vec<f32> = headers.iter().map(|h| h.len() as f32 * 6.5).collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = width.max(cell.chars().count() as f32 * 6.2);
            }
        }
    }

    let total: f32 = widths.iter().sum();
    let max = PAGE_W - 2.0 * MARGIN;
    if total > max {
        let scale = max / total;
        for w in &mut widths {
            *w *= scale;
        }
    }
    widths
}

fn draw_row(
    fonts: &mut Fonts<'_>,
    content: &mut Content,
    y: f32,
    col_widths: &[f32],
    row: &[String],
    size: f32,
    bold: bool,
) {
    let mut x = MARGIN;
    for (text, width) in row.iter().zip(col_widths) {
        // recorte para no invadir la columna siguiente
        let clipped = fonts.clip(text, size, (width - 8.0).max(size));
        fonts.draw(content, x + 4.0, y + 6.0, size, bold, &clipped);

        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, *width, ROW_H);
        content.stroke();
        content.restore_state();

        x += width;
    }
}

fn draw_page_frame(fonts: &mut Fonts<'_>, content: &mut Content, title: &str, subtitle: &str, page: usize) {
    fonts.draw(content, MARGIN, PAGE_H - MARGIN + 15.0, TITLE_FONT_SIZE, true, title);
    fonts.draw(content, MARGIN, PAGE_H - MARGIN, FONT_SIZE, false, subtitle);
    fonts.draw(
        content,
        PAGE_W - MARGIN - 60.0,
        MARGIN - 35.0,
        FONT_SIZE,
        false,
        &format!("Page {}", page),
    );
}

/// Tabla multipágina de movimientos de stock
pub fn stock_movements_pdf(
    movements: &[StockMovement],
    subtitle: &str,
    font: Option<&EmbeddedFont>,
) -> Vec<u8> {
    let title = "Stock transactions";
    let rows: Vec<Vec<String>> = movements.iter().map(movement_row).collect();
    let col_widths = compute_col_widths(&STOCK_HEADERS, &rows);
    let table_width: f32 = col_widths.iter().sum();
    let header_row: Vec<String> = STOCK_HEADERS.iter().map(|s| s.to_string()).collect();

    let mut doc = PdfDocument::new(font);
    let mut remaining: &[Vec<String>] = &rows;
    let mut page_idx = 1;

    loop {
        let mut content = doc.new_page();
        draw_page_frame(&mut doc.fonts, &mut content, title, subtitle, page_idx);

        let mut y = PAGE_H - MARGIN - 40.0;
        fill_band(&mut content, y, table_width, 0.85);
        draw_row(&mut doc.fonts, &mut content, y, &col_widths, &header_row, HEADER_FONT_SIZE, true);
        y -= ROW_H;

        if remaining.is_empty() {
            doc.fonts.draw(&mut content, MARGIN, y - 16.0, FONT_SIZE, false, "No transactions in range");
        }

        let mut consumed = 0;
        for (i, row) in remaining.iter().enumerate() {
            if y - ROW_H < MARGIN {
                break;
            }
            if i % 2 == 0 {
                fill_band(&mut content, y, table_width, 0.96);
            }
            draw_row(&mut doc.fonts, &mut content, y, &col_widths, row, FONT_SIZE, false);
            y -= ROW_H;
            consumed += 1;
        }

        doc.finalize_page(content);
        remaining = &remaining[consumed..];
        page_idx += 1;

        if remaining.is_empty() {
            break;
        }
    }

    doc.finish()
}
