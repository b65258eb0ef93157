//! A plotters drawing backend that writes a TikZ picture for inclusion in LaTeX documents.

use plotters_backend::{
    text_anchor::{HPos, VPos},
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};
use std::fmt::{self, Write};

/// Points per backend pixel used unless [`TikzBackend::with_unit`] says otherwise; a 1000 pixel
/// wide chart is then 350pt wide, about the text width of an A4 article.
pub const DEFAULT_UNIT_PT: f64 = 0.35;

/// Writes every drawing operation as a TikZ command. The picture is written into the target
/// string on [`DrawingBackend::present`] (or on drop).
///
/// Backend coordinates grow downwards; TikZ coordinates grow upwards, so `y` is flipped.
pub struct TikzBackend<'a> {
    target: &'a mut String,
    size: (u32, u32),
    unit_pt: f64,
    body: String,
    saved: bool,
}

impl<'a> TikzBackend<'a> {
    pub fn with_string(target: &'a mut String, size: (u32, u32)) -> Self {
        Self {
            target,
            size,
            unit_pt: DEFAULT_UNIT_PT,
            body: String::new(),
            saved: false,
        }
    }

    /// Sets the size in points of one backend pixel.
    pub fn with_unit(mut self, unit_pt: f64) -> Self {
        self.unit_pt = unit_pt;
        self
    }

    fn coord(&self, (x, y): BackendCoord) -> String {
        format!("({x},{})", self.size.1 as i32 - y)
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) -> Result<(), DrawingErrorKind<fmt::Error>> {
        self.body
            .write_fmt(line)
            .and_then(|_| self.body.write_char('\n'))
            .map_err(DrawingErrorKind::DrawingError)
    }
}

/// TikZ colour expression for `c`.
fn colour(c: &BackendColor) -> String {
    let (r, g, b) = c.rgb;
    format!("{{rgb,255:red,{r};green,{g};blue,{b}}}")
}

fn stroke_options(c: &BackendColor, width: u32) -> String {
    let mut opts = format!("draw={}, line width={width}", colour(c));
    if c.alpha < 1.0 {
        opts.push_str(&format!(", draw opacity={:.3}", c.alpha));
    }
    opts
}

fn fill_options(c: &BackendColor) -> String {
    let mut opts = format!("fill={}", colour(c));
    if c.alpha < 1.0 {
        opts.push_str(&format!(", fill opacity={:.3}", c.alpha));
    }
    opts
}

fn anchor(h: HPos, v: VPos) -> &'static str {
    match (h, v) {
        (HPos::Left, VPos::Top) => "north west",
        (HPos::Center, VPos::Top) => "north",
        (HPos::Right, VPos::Top) => "north east",
        (HPos::Left, VPos::Center) => "west",
        (HPos::Center, VPos::Center) => "center",
        (HPos::Right, VPos::Center) => "east",
        (HPos::Left, VPos::Bottom) => "south west",
        (HPos::Center, VPos::Bottom) => "south",
        (HPos::Right, VPos::Bottom) => "south east",
    }
}

/// Rotation in TikZ degrees (counter-clockwise) of a plotters transform (clockwise on screen).
fn rotation(transform: &FontTransform) -> i32 {
    match transform {
        FontTransform::None => 0,
        FontTransform::Rotate90 => -90,
        FontTransform::Rotate180 => 180,
        FontTransform::Rotate270 => 90,
    }
}

/// Escapes the characters LaTeX treats specially in text mode.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '$' | '&' | '#' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '<' => out.push_str("\\textless{}"),
            '>' => out.push_str("\\textgreater{}"),
            'μ' | 'µ' => out.push_str("$\\mu$"),
            _ => out.push(c),
        }
    }
    out
}

impl<'a> DrawingBackend for TikzBackend<'a> {
    type ErrorType = fmt::Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<fmt::Error>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<fmt::Error>> {
        if self.saved {
            return Ok(());
        }
        let unit = self.unit_pt;
        writeln!(self.target, "\\begin{{tikzpicture}}[x={unit}pt, y={unit}pt]")
            .and_then(|_| self.target.write_str(&self.body))
            .and_then(|_| writeln!(self.target, "\\end{{tikzpicture}}"))
            .map_err(DrawingErrorKind::DrawingError)?;
        self.saved = true;
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<fmt::Error>> {
        if color.alpha == 0.0 {
            return Ok(());
        }
        let from = self.coord(point);
        let to = self.coord((point.0 + 1, point.1 + 1));
        self.emit(format_args!("\\fill[{}] {from} rectangle {to};", fill_options(&color)))
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<fmt::Error>> {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (from, to) = (self.coord(from), self.coord(to));
        let opts = stroke_options(&color, style.stroke_width());
        self.emit(format_args!("\\draw[{opts}] {from} -- {to};"))
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<fmt::Error>> {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (a, b) = (self.coord(upper_left), self.coord(bottom_right));
        if fill {
            self.emit(format_args!("\\fill[{}] {a} rectangle {b};", fill_options(&color)))
        } else {
            let opts = stroke_options(&color, style.stroke_width());
            self.emit(format_args!("\\draw[{opts}] {a} rectangle {b};"))
        }
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<fmt::Error>> {
        let color = style.color();
        let points: Vec<String> = path.into_iter().map(|p| self.coord(p)).collect();
        if color.alpha == 0.0 || points.len() < 2 {
            return Ok(());
        }
        let opts = stroke_options(&color, style.stroke_width());
        self.emit(format_args!("\\draw[{opts}] {};", points.join(" -- ")))
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<fmt::Error>> {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let c = self.coord(center);
        let opts = if fill {
            fill_options(&color)
        } else {
            stroke_options(&color, style.stroke_width())
        };
        self.emit(format_args!("\\path[{opts}] {c} circle ({radius});"))
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<fmt::Error>> {
        let color = style.color();
        let points: Vec<String> = vert.into_iter().map(|p| self.coord(p)).collect();
        if color.alpha == 0.0 || points.len() < 3 {
            return Ok(());
        }
        self.emit(format_args!(
            "\\fill[{}] {} -- cycle;",
            fill_options(&color),
            points.join(" -- ")
        ))
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<fmt::Error>> {
        let color = style.color();
        if color.alpha == 0.0 || text.is_empty() {
            return Ok(());
        }
        let at = self.coord(pos);
        let text_anchor = style.anchor();
        let font_pt = style.size() * self.unit_pt;
        let line = format!(
            "\\node[anchor={}, rotate={}, inner sep=0pt, text={}, font={{\\fontsize{{{font_pt:.1}pt}}{{{:.1}pt}}\\selectfont}}] at {at} {{{}}};",
            anchor(text_anchor.h_pos, text_anchor.v_pos),
            rotation(&style.transform()),
            colour(&color),
            font_pt * 1.2,
            escape_latex(text),
        );
        self.emit(format_args!("{line}"))
    }
}

impl Drop for TikzBackend<'_> {
    fn drop(&mut self) {
        if !self.saved {
            // Errors can't be reported from drop; the picture is incomplete at worst.
            let _ = self.present();
        }
    }
}
