//! # SVG Path Data
//!
//! Parses the `d` attribute grammar (`M L H V C S Q T A Z`, absolute and
//! relative, implicit repeats, compact numbers such as `1.5.5` or `-1-2`)
//! into subpaths of lyon curve segments in `f64`.
//!
//! Every closing `Z` contributes an explicit line back to the subpath start,
//! so a closed subpath's segments always form a loop.

use crate::error::{SvgError, SvgResult};
use lyon::geom::{
    point, vector, Angle, Arc, ArcFlags, CubicBezierSegment, LineSegment, Point,
    QuadraticBezierSegment, SvgArc,
};

/// Chords used to approximate the length of one curved segment
const LENGTH_CHORDS: usize = 16;

/// One drawable segment of a subpath
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(LineSegment<f64>),
    Quadratic(QuadraticBezierSegment<f64>),
    Cubic(CubicBezierSegment<f64>),
    Arc(Arc<f64>),
}

impl Segment {
    pub fn from(&self) -> Point<f64> {
        match self {
            Segment::Line(s) => s.from,
            Segment::Quadratic(s) => s.from,
            Segment::Cubic(s) => s.from,
            Segment::Arc(s) => s.from(),
        }
    }

    pub fn to(&self) -> Point<f64> {
        match self {
            Segment::Line(s) => s.to,
            Segment::Quadratic(s) => s.to,
            Segment::Cubic(s) => s.to,
            Segment::Arc(s) => s.to(),
        }
    }

    /// Point at parameter `t` in `[0, 1]`
    pub fn sample(&self, t: f64) -> Point<f64> {
        match self {
            Segment::Line(s) => s.sample(t),
            Segment::Quadratic(s) => s.sample(t),
            Segment::Cubic(s) => s.sample(t),
            Segment::Arc(s) => s.sample(t),
        }
    }

    /// Arc length; exact for lines, chord-approximated for curves
    pub fn length(&self) -> f64 {
        match self {
            Segment::Line(s) => distance(s.from, s.to),
            _ => {
                let mut length = 0.0;
                let mut prev = self.sample(0.0);
                for i in 1..=LENGTH_CHORDS {
                    let next = self.sample(i as f64 / LENGTH_CHORDS as f64);
                    length += distance(prev, next);
                    prev = next;
                }
                length
            }
        }
    }
}

fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// A connected run of segments started by a move-to
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    pub segments: Vec<Segment>,
    /// Whether the subpath ended with `Z`
    pub closed: bool,
}

impl Subpath {
    pub fn start(&self) -> Option<Point<f64>> {
        self.segments.first().map(Segment::from)
    }

    pub fn length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }
}

/// Parsed path data
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub subpaths: Vec<Subpath>,
}

impl PathData {
    /// Parse a `d` attribute value
    pub fn parse(d: &str) -> SvgResult<Self> {
        PathParser::new(d).parse()
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|sp| sp.segments.is_empty())
    }

    /// Total length of all subpaths
    pub fn length(&self) -> f64 {
        self.subpaths.iter().map(Subpath::length).sum()
    }

    /// Number of segments across all subpaths
    pub fn segment_count(&self) -> usize {
        self.subpaths.iter().map(|sp| sp.segments.len()).sum()
    }
}

/// Byte cursor over path data
struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            bytes: d.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> SvgError {
        SvgError::PathData {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b',' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.bytes.len()
    }

    /// Next command letter, if the next token is one
    fn command(&mut self) -> Option<u8> {
        self.skip_separators();
        match self.bytes.get(self.pos) {
            Some(&b) if b.is_ascii_alphabetic() && b != b'e' && b != b'E' => {
                self.pos += 1;
                Some(b)
            }
            _ => None,
        }
    }

    /// True if a number starts at the next token
    fn number_follows(&mut self) -> bool {
        self.skip_separators();
        matches!(
            self.bytes.get(self.pos),
            Some(b'0'..=b'9' | b'-' | b'+' | b'.')
        )
    }

    fn number(&mut self) -> SvgResult<f64> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.bytes.get(self.pos), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let mut digits = self.digits();
        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            digits += self.digits();
        }
        if digits == 0 {
            self.pos = start;
            return Err(self.error("expected number"));
        }
        if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                // Not an exponent after all
                self.pos = mark;
            }
        }

        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .ok_or_else(|| self.error("malformed number"))
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.bytes.get(self.pos), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Arc flags are single characters and may be written without separators
    fn flag(&mut self) -> SvgResult<bool> {
        self.skip_separators();
        match self.bytes.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected arc flag")),
        }
    }

    fn pair(&mut self) -> SvgResult<(f64, f64)> {
        Ok((self.number()?, self.number()?))
    }
}

/// Which control point the next smooth curve may reflect
#[derive(Clone, Copy)]
enum LastControl {
    None,
    Cubic(Point<f64>),
    Quadratic(Point<f64>),
}

struct PathParser<'a> {
    lexer: Lexer<'a>,
    subpaths: Vec<Subpath>,
    current: Subpath,
    position: Point<f64>,
    subpath_start: Point<f64>,
    last_control: LastControl,
}

impl<'a> PathParser<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            lexer: Lexer::new(d),
            subpaths: Vec::new(),
            current: Subpath::default(),
            position: point(0.0, 0.0),
            subpath_start: point(0.0, 0.0),
            last_control: LastControl::None,
        }
    }

    fn parse(mut self) -> SvgResult<PathData> {
        let mut previous: Option<u8> = None;

        while !self.lexer.at_end() {
            let cmd = match self.lexer.command() {
                Some(cmd) => cmd,
                None => match previous {
                    // Implicit repeat; extra move-to pairs are line-tos
                    Some(b'M') => b'L',
                    Some(b'm') => b'l',
                    Some(b'Z' | b'z') | None => {
                        return Err(self.lexer.error("expected command"));
                    }
                    Some(prev) => prev,
                },
            };
            self.command(cmd)?;
            previous = Some(cmd);
        }

        self.finish_subpath();
        Ok(PathData {
            subpaths: self.subpaths,
        })
    }

    fn resolve(&self, relative: bool, x: f64, y: f64) -> Point<f64> {
        if relative {
            point(self.position.x + x, self.position.y + y)
        } else {
            point(x, y)
        }
    }

    fn command(&mut self, cmd: u8) -> SvgResult<()> {
        let relative = cmd.is_ascii_lowercase();

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let (x, y) = self.lexer.pair()?;
                let to = self.resolve(relative, x, y);
                self.finish_subpath();
                self.position = to;
                self.subpath_start = to;
                self.last_control = LastControl::None;
            }
            b'L' => {
                let (x, y) = self.lexer.pair()?;
                let to = self.resolve(relative, x, y);
                self.line_to(to);
            }
            b'H' => {
                let x = self.lexer.number()?;
                let x = if relative { self.position.x + x } else { x };
                self.line_to(point(x, self.position.y));
            }
            b'V' => {
                let y = self.lexer.number()?;
                let y = if relative { self.position.y + y } else { y };
                self.line_to(point(self.position.x, y));
            }
            b'C' => {
                let (x1, y1) = self.lexer.pair()?;
                let (x2, y2) = self.lexer.pair()?;
                let (x, y) = self.lexer.pair()?;
                let ctrl1 = self.resolve(relative, x1, y1);
                let ctrl2 = self.resolve(relative, x2, y2);
                let to = self.resolve(relative, x, y);
                self.cubic_to(ctrl1, ctrl2, to);
            }
            b'S' => {
                let (x2, y2) = self.lexer.pair()?;
                let (x, y) = self.lexer.pair()?;
                let ctrl1 = match self.last_control {
                    LastControl::Cubic(prev) => self.reflect(prev),
                    _ => self.position,
                };
                let ctrl2 = self.resolve(relative, x2, y2);
                let to = self.resolve(relative, x, y);
                self.cubic_to(ctrl1, ctrl2, to);
            }
            b'Q' => {
                let (x1, y1) = self.lexer.pair()?;
                let (x, y) = self.lexer.pair()?;
                let ctrl = self.resolve(relative, x1, y1);
                let to = self.resolve(relative, x, y);
                self.quadratic_to(ctrl, to);
            }
            b'T' => {
                let (x, y) = self.lexer.pair()?;
                let ctrl = match self.last_control {
                    LastControl::Quadratic(prev) => self.reflect(prev),
                    _ => self.position,
                };
                let to = self.resolve(relative, x, y);
                self.quadratic_to(ctrl, to);
            }
            b'A' => {
                let rx = self.lexer.number()?;
                let ry = self.lexer.number()?;
                let rotation = self.lexer.number()?;
                let large_arc = self.lexer.flag()?;
                let sweep = self.lexer.flag()?;
                let (x, y) = self.lexer.pair()?;
                let to = self.resolve(relative, x, y);
                self.arc_to(rx, ry, rotation, large_arc, sweep, to);
            }
            b'Z' => {
                self.close();
                // Numbers may not follow a close-path
                if self.lexer.number_follows() {
                    return Err(self.lexer.error("unexpected number after close-path"));
                }
            }
            _ => {
                return Err(self
                    .lexer
                    .error(format!("unknown command '{}'", cmd as char)))
            }
        }
        Ok(())
    }

    fn reflect(&self, control: Point<f64>) -> Point<f64> {
        point(
            2.0 * self.position.x - control.x,
            2.0 * self.position.y - control.y,
        )
    }

    /// Drawing after a close-path starts a new subpath at the close point
    fn begin_if_closed(&mut self) {
        if self.current.closed {
            self.finish_subpath();
            self.subpath_start = self.position;
        }
    }

    fn push(&mut self, segment: Segment) {
        self.begin_if_closed();
        self.position = segment.to();
        self.current.segments.push(segment);
    }

    fn line_to(&mut self, to: Point<f64>) {
        let from = self.position;
        self.push(Segment::Line(LineSegment { from, to }));
        self.last_control = LastControl::None;
    }

    fn cubic_to(&mut self, ctrl1: Point<f64>, ctrl2: Point<f64>, to: Point<f64>) {
        let from = self.position;
        self.push(Segment::Cubic(CubicBezierSegment {
            from,
            ctrl1,
            ctrl2,
            to,
        }));
        self.last_control = LastControl::Cubic(ctrl2);
    }

    fn quadratic_to(&mut self, ctrl: Point<f64>, to: Point<f64>) {
        let from = self.position;
        self.push(Segment::Quadratic(QuadraticBezierSegment { from, ctrl, to }));
        self.last_control = LastControl::Quadratic(ctrl);
    }

    fn arc_to(&mut self, rx: f64, ry: f64, rotation: f64, large_arc: bool, sweep: bool, to: Point<f64>) {
        let from = self.position;
        self.last_control = LastControl::None;
        if from == to {
            return;
        }
        if rx == 0.0 || ry == 0.0 {
            self.line_to(to);
            return;
        }
        let arc = SvgArc {
            from,
            to,
            radii: vector(rx.abs(), ry.abs()),
            x_rotation: Angle::degrees(rotation),
            flags: ArcFlags { large_arc, sweep },
        };
        self.push(Segment::Arc(arc.to_arc()));
    }

    fn close(&mut self) {
        if self.current.segments.is_empty() || self.current.closed {
            self.position = self.subpath_start;
            return;
        }
        if self.position != self.subpath_start {
            let from = self.position;
            self.current.segments.push(Segment::Line(LineSegment {
                from,
                to: self.subpath_start,
            }));
        }
        self.current.closed = true;
        self.position = self.subpath_start;
        self.last_control = LastControl::None;
    }

    fn finish_subpath(&mut self) {
        let subpath = std::mem::take(&mut self.current);
        if !subpath.segments.is_empty() {
            self.subpaths.push(subpath);
        }
    }
}
