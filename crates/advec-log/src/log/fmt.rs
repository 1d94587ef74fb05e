use std::io::{self, Write};

use compact_str::CompactString;

use termcolor::WriteColor;

use super::{ColorSpec, Color, Level};

#[derive(Default, Clone, Debug)]
pub struct LogSpec {
    pub color_spec: Option<ColorSpec>,
}

impl LogSpec {

    #[inline(always)]
    pub fn with_color_spec(mut self, f: impl FnOnce(&mut ColorSpec)) -> Self {
        let color_spec = self.color_spec.insert(ColorSpec::new());
        f(color_spec);
        self
    }
}

#[derive(Clone, Debug)]
pub enum SegmentSpec {
    Message(LogSpec),
    Text(CompactString, LogSpec),
}

/// Ordered output segments of one log level.
#[derive(Default, Clone, Debug)]
pub struct LogFmt {
    segments: Vec<SegmentSpec>,
}

impl LogFmt {

    /// `"<level>: <message>"` with the level tag colored.
    pub fn for_level(level: Level) -> Self {
        let color = match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Blue,
            Level::Trace => Color::Magenta,
        };
        let mut fmt = Self::default();
        LogFmtBuilder::new(&mut fmt)
            .text(level.as_str(), |spec| spec.with_color_spec(|c| {
                c.set_fg(Some(color)).set_bold(true);
            }))
            .text(": ", |spec| spec)
            .message(|spec| spec);
        fmt
    }

    fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn render<W: WriteColor>(&self, out: &mut W, msg: core::fmt::Arguments) -> io::Result<()> {
        for segment in self {
            let spec = match segment {
                SegmentSpec::Message(spec) | SegmentSpec::Text(_, spec) => spec,
            };
            if let Some(color_spec) = &spec.color_spec {
                out.set_color(color_spec)?;
            }
            match segment {
                SegmentSpec::Message(_) => write!(out, "{}", msg)?,
                SegmentSpec::Text(text, _) => out.write_all(text.as_bytes())?,
            }
            if spec.color_spec.is_some() {
                out.reset()?;
            }
        }
        out.write_all(b"\n")
    }
}

impl<'a> IntoIterator for &'a LogFmt {

    type Item = &'a SegmentSpec;
    type IntoIter = core::slice::Iter<'a, SegmentSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

pub struct LogFmtBuilder<'a> {
    fmt: &'a mut LogFmt,
}

impl<'a> LogFmtBuilder<'a> {

    #[inline(always)]
    pub fn new(fmt: &'a mut LogFmt) -> Self {
        fmt.clear();
        Self {
            fmt,
        }
    }

    #[inline(always)]
    pub fn message(&mut self, f: impl FnOnce(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.segments.push(SegmentSpec::Message(f(Default::default())));
        self
    }

    #[inline(always)]
    pub fn text(&mut self, text: &str, f: impl FnOnce(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.segments.push(SegmentSpec::Text(CompactString::new(text), f(Default::default())));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use termcolor::Buffer;

    fn render(fmt: &LogFmt, msg: core::fmt::Arguments) -> String {
        let mut buf = Buffer::no_color();
        fmt.render(&mut buf, msg).unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn level_default_format() {
        let fmt = LogFmt::for_level(Level::Trace);
        assert_eq!(render(&fmt, format_args!("grew to {}", 8)), "trace: grew to 8\n");
    }

    #[test]
    fn builder_replaces_segments() {
        let mut fmt = LogFmt::for_level(Level::Info);
        LogFmtBuilder::new(&mut fmt)
            .text("[", |spec| spec)
            .message(|spec| spec.with_color_spec(|c| { c.set_fg(Some(Color::Cyan)); }))
            .text("]", |spec| spec);
        assert_eq!(fmt.into_iter().count(), 3);
        assert_eq!(render(&fmt, format_args!("x")), "[x]\n");
    }
}
