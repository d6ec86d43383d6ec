//! Markdown rendering for assistant messages.
//!
//! `render` is a pure function from message content to terminal lines. It is
//! called on every frame with whatever has streamed in so far, so it must
//! cope with unterminated fences, half tables and dangling emphasis.

use once_cell::sync::Lazy;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const RULE_WIDTH: usize = 48;
const ELLIPSIS: &str = "…";

/// A rendered line plus how it may be laid out
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine {
    pub line: Line<'static>,
    /// Preformatted: clip instead of wrapping
    pub no_wrap: bool,
    /// Columns to indent continuation lines by when wrapping
    pub indent: usize,
}

impl RenderedLine {
    fn new(line: Line<'static>, indent: usize) -> Self {
        Self { line, no_wrap: false, indent }
    }

    fn preformatted(line: Line<'static>) -> Self {
        Self { line, no_wrap: true, indent: 0 }
    }

    fn blank() -> Self {
        Self::new(Line::default(), 0)
    }

    fn is_blank(&self) -> bool {
        self.line.spans.iter().all(|s| s.content.trim().is_empty())
    }

    /// Display width in terminal columns
    pub fn width(&self) -> usize {
        line_width(&self.line)
    }

    /// Plain text of the line without styles
    pub fn text(&self) -> String {
        self.line.spans.iter().map(|s| s.content.as_ref()).collect()
    }
}

// Styles

fn heading_style(level: HeadingLevel) -> Style {
    let base = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => base.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 | HeadingLevel::H3 => base,
        _ => Style::default().fg(Color::Yellow),
    }
}

fn inline_code_style() -> Style {
    Style::default().fg(Color::Green).bg(Color::Black)
}

fn code_block_style() -> Style {
    Style::default().fg(Color::Green)
}

fn frame_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn link_label_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
}

fn link_target_style() -> Style {
    Style::default().fg(Color::Blue).add_modifier(Modifier::ITALIC)
}

fn marker_style() -> Style {
    Style::default().fg(Color::Cyan)
}

fn syntect_style_to_ratatui(style: syntect::highlighting::Style) -> Style {
    Style::default().fg(Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b))
}

/// Replace terminal control characters. Newlines survive, tabs become spaces.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.push_str("    "),
            '\r' => {}
            c if c.is_control() => out.push('\u{FFFD}'),
            // Bidi overrides can reorder what the terminal shows
            '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

/// Render code. Inline code becomes a single styled line; block code is
/// highlighted by `lang` when syntect knows it and left plain otherwise.
pub fn render_code(code: &str, lang: Option<&str>, inline: bool) -> Vec<Line<'static>> {
    if inline {
        let text = code.replace('\n', " ");
        return vec![Line::from(Span::styled(text, inline_code_style()))];
    }

    let syntax = lang
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .and_then(|l| {
            SYNTAX_SET
                .find_syntax_by_token(l)
                .or_else(|| SYNTAX_SET.find_syntax_by_extension(l))
        });
    let theme = THEME_SET.themes.get(CODE_THEME);

    let (Some(syntax), Some(theme)) = (syntax, theme) else {
        return code
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), code_block_style())))
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(code)
        .map(|line| {
            let bare = line.trim_end_matches(|c| c == '\n' || c == '\r');
            match highlighter.highlight_line(line, &SYNTAX_SET) {
                Ok(ranges) => Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, text)| {
                            let text = text.trim_end_matches(|c| c == '\n' || c == '\r');
                            Span::styled(text.to_string(), syntect_style_to_ratatui(style))
                        })
                        .filter(|span| !span.content.is_empty())
                        .collect::<Vec<_>>(),
                ),
                Err(_) => Line::from(Span::styled(bare.to_string(), code_block_style())),
            }
        })
        .collect()
}

/// Parse and lay out `content` for a viewport `width` columns wide
pub fn render(content: &str, width: usize) -> Vec<RenderedLine> {
    layout(parse(content), width)
}

/// Lay out text verbatim, without Markdown interpretation
pub fn plain(content: &str, style: Style, width: usize) -> Vec<RenderedLine> {
    let lines = sanitize(content)
        .split('\n')
        .map(|l| RenderedLine::new(Line::from(Span::styled(l.to_string(), style)), 0))
        .collect();
    layout(lines, width)
}

/// Parse `content` into unwrapped lines
pub fn parse(content: &str) -> Vec<RenderedLine> {
    let clean = sanitize(content);
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let mut writer = Writer::default();
    for event in Parser::new_ext(&clean, options) {
        writer.handle(event);
    }
    writer.finish()
}

/// Wrap flowing lines and clip preformatted ones to `width` columns
pub fn layout(lines: Vec<RenderedLine>, width: usize) -> Vec<RenderedLine> {
    if width == 0 {
        return lines;
    }
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        if line.width() <= width {
            out.push(line);
        } else if line.no_wrap {
            out.push(RenderedLine::preformatted(clip(line.line, width)));
        } else {
            out.extend(wrap(line, width));
        }
    }
    out
}

fn line_width(line: &Line<'_>) -> usize {
    line.spans.iter().map(|s| s.content.width()).sum()
}

/// Append text to the last span when the style matches
fn push_piece(spans: &mut Vec<Span<'static>>, text: &str, style: Style) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.style == style {
            let mut joined = last.content.to_string();
            joined.push_str(text);
            last.content = joined.into();
            return;
        }
    }
    spans.push(Span::styled(text.to_string(), style));
}

fn clip(line: Line<'static>, width: usize) -> Line<'static> {
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut used = 0;
    let mut spans = Vec::new();
    'spans: for span in line.spans {
        let mut kept = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                push_piece(&mut spans, &kept, span.style);
                break 'spans;
            }
            used += w;
            kept.push(c);
        }
        push_piece(&mut spans, &kept, span.style);
    }
    spans.push(Span::styled(ELLIPSIS, frame_style()));
    Line::from(spans)
}

/// Split into chunks of one word plus its trailing whitespace
fn words(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut prev_space = false;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        if prev_space && !space && i > start {
            chunks.push(&text[start..i]);
            start = i;
        }
        prev_space = space;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

fn wrap(line: RenderedLine, width: usize) -> Vec<RenderedLine> {
    // Never let the indent eat the whole line
    let indent = if line.indent < width / 2 { line.indent } else { 0 };
    let pad = " ".repeat(indent);

    let mut out = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    let mut fresh = true;
    // Set when a word's trailing space was dropped at the right edge
    let mut full = false;

    let mut break_line = |current: &mut Vec<Span<'static>>, used: &mut usize, fresh: &mut bool| {
        out.push(RenderedLine::new(Line::from(std::mem::take(current)), line.indent));
        if indent > 0 {
            current.push(Span::raw(pad.clone()));
        }
        *used = indent;
        *fresh = true;
    };

    for span in &line.line.spans {
        for word in words(&span.content) {
            let visible = word.trim_end().width();
            if !fresh && (full || used + visible > width) {
                break_line(&mut current, &mut used, &mut fresh);
                full = false;
            }
            let word = if fresh && used > 0 { word.trim_start() } else { word };

            if used + word.width() <= width {
                push_piece(&mut current, word, span.style);
                used += word.width();
                fresh = false;
                continue;
            }
            let trimmed = word.trim_end();
            if used + trimmed.width() <= width {
                push_piece(&mut current, trimmed, span.style);
                used += trimmed.width();
                fresh = false;
                full = true;
                continue;
            }

            // Longer than a whole line: split by character
            let mut piece = String::new();
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if used + w > width && !(fresh && piece.is_empty()) {
                    push_piece(&mut current, &piece, span.style);
                    piece.clear();
                    break_line(&mut current, &mut used, &mut fresh);
                }
                piece.push(c);
                used += w;
                fresh = false;
            }
            push_piece(&mut current, &piece, span.style);
        }
    }
    if !current.is_empty() {
        out.push(RenderedLine::new(Line::from(current), line.indent));
    }
    out
}

// Event writer

#[derive(Default)]
struct CodeBlock {
    lang: Option<String>,
    text: String,
}

#[derive(Default)]
struct Table {
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
    header_rows: usize,
    in_head: bool,
}

struct Link {
    target: String,
    label: String,
}

#[derive(Default)]
struct Writer {
    lines: Vec<RenderedLine>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// One entry per open list: next ordinal for ordered lists
    lists: Vec<Option<u64>>,
    /// Marker of a list item whose content has not started yet
    pending_marker: Option<String>,
    /// Continuation indent of the open list item
    item_indent: usize,
    quote_depth: usize,
    code: Option<CodeBlock>,
    table: Option<Table>,
    link: Option<Link>,
}

impl Writer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::FootnoteReference(label) => {
                self.push_span(Span::styled(format!("[^{}]", label), marker_style()))
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.start_block();
                self.lines
                    .push(RenderedLine::preformatted(Line::from(Span::styled("─".repeat(RULE_WIDTH), frame_style()))));
            }
            Event::TaskListMarker(checked) => {
                if let Some(marker) = self.pending_marker.as_mut() {
                    let bullet_at = marker.len() - marker.trim_start().len();
                    marker.truncate(bullet_at);
                    marker.push_str(if checked { "[x] " } else { "[ ] " });
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.pending_marker.is_none() {
                    self.start_block();
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.styles.push(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBlock { lang, text: String::new() });
            }
            Tag::List(first) => {
                self.flush_marker();
                self.flush();
                self.lists.push(first);
            }
            Tag::Item => {
                self.flush_marker();
                self.start_block();
                let depth = self.lists.len().saturating_sub(1);
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let bullet = format!("{}. ", n);
                        *n += 1;
                        bullet
                    }
                    _ => "• ".to_string(),
                };
                self.pending_marker = Some(format!("{}{}", "  ".repeat(depth), bullet));
            }
            Tag::FootnoteDefinition(label) => {
                self.start_block();
                self.pending_marker = Some(format!("[^{}]: ", label));
            }
            Tag::Table(alignments) => {
                self.start_block();
                self.table = Some(Table { alignments, ..Table::default() });
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                    table.rows.push(Vec::new());
                }
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.rows.push(Vec::new());
                }
            }
            Tag::TableCell => {
                if let Some(row) = self.table.as_mut().and_then(|t| t.rows.last_mut()) {
                    row.push(String::new());
                }
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { dest_url, .. } => {
                self.push_style(link_label_style());
                self.link = Some(Link { target: dest_url.to_string(), label: String::new() });
            }
            Tag::Image { dest_url, .. } => {
                self.push_span(Span::styled("[image: ", marker_style()));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
                self.link = Some(Link { target: dest_url.to_string(), label: String::new() });
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush(),
            TagEnd::Heading(_) => {
                self.flush();
                self.styles.pop();
            }
            TagEnd::BlockQuote => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => self.end_code_block(),
            TagEnd::List(_) => {
                self.flush_marker();
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.item_indent = 0;
                }
            }
            TagEnd::Item => {
                self.flush_marker();
                self.flush();
            }
            TagEnd::FootnoteDefinition => {
                self.flush_marker();
                self.flush();
            }
            TagEnd::Table => self.end_table(),
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                    table.header_rows = table.rows.len();
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(link) = self.link.take() {
                    self.link_target(link);
                }
            }
            TagEnd::Image => {
                self.styles.pop();
                if let Some(link) = self.link.take() {
                    self.push_span(Span::styled("]", marker_style()));
                    self.link_target(link);
                }
            }
            _ => {}
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, style: Style) {
        let patched = self.style().patch(style);
        self.styles.push(patched);
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.text.push_str(text);
            return;
        }
        if let Some(link) = self.link.as_mut() {
            link.label.push_str(text);
        }
        if let Some(cell) = self.table.as_mut().and_then(|t| t.rows.last_mut()).and_then(|r| r.last_mut()) {
            cell.push_str(&text.replace('\n', " "));
            return;
        }

        let style = self.style();
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.flush();
            }
            if !part.is_empty() {
                self.push_span(Span::styled(part.to_string(), style));
            }
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(cell) = self.table.as_mut().and_then(|t| t.rows.last_mut()).and_then(|r| r.last_mut()) {
            cell.push_str(code);
            return;
        }
        if let Some(link) = self.link.as_mut() {
            link.label.push_str(code);
        }
        for line in render_code(code, None, true) {
            for span in line.spans {
                self.push_span(span);
            }
        }
    }

    /// Show the link target after its label, unless the label already is the target
    fn link_target(&mut self, link: Link) {
        if link.target.is_empty() || link.label.trim() == link.target {
            return;
        }
        if let Some(cell) = self.table.as_mut().and_then(|t| t.rows.last_mut()).and_then(|r| r.last_mut()) {
            cell.push_str(&format!(" ({})", link.target));
            return;
        }
        self.push_span(Span::raw(" ("));
        self.push_span(Span::styled(link.target, link_target_style()));
        self.push_span(Span::raw(")"));
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(marker) = self.pending_marker.take() {
            self.item_indent = marker.width();
            self.current.push(Span::styled(marker, marker_style()));
        }
        if self.current.is_empty() && self.quote_depth > 0 {
            self.current.push(Span::styled("│ ".repeat(self.quote_depth), frame_style()));
        }
        self.current.push(span);
    }

    /// Emit the marker of an item that never got any content
    fn flush_marker(&mut self) {
        if let Some(marker) = self.pending_marker.take() {
            self.item_indent = marker.width();
            self.current.push(Span::styled(marker, marker_style()));
        }
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.current);
        let indent = if self.lists.is_empty() { 0 } else { self.item_indent };
        self.lines.push(RenderedLine::new(Line::from(spans), indent));
    }

    /// Close the current line and separate the next block with a blank line
    fn start_block(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|l| !l.is_blank()) {
            self.lines.push(RenderedLine::blank());
        }
    }

    /// Indentation for preformatted lines inside list items and quotes
    fn block_prefix(&self) -> Vec<Span<'static>> {
        let mut prefix = Vec::new();
        if self.quote_depth > 0 {
            prefix.push(Span::styled("│ ".repeat(self.quote_depth), frame_style()));
        }
        if !self.lists.is_empty() && self.item_indent > 0 {
            prefix.push(Span::raw(" ".repeat(self.item_indent)));
        }
        prefix
    }

    fn push_preformatted(&mut self, spans: Vec<Span<'static>>) {
        let mut line = self.block_prefix();
        line.extend(spans);
        self.lines.push(RenderedLine::preformatted(Line::from(line)));
    }

    fn end_code_block(&mut self) {
        let Some(block) = self.code.take() else {
            return;
        };
        self.flush_marker();
        self.flush();

        let title = match &block.lang {
            Some(lang) => format!("┌─ {} ", lang),
            None => "┌─".to_string(),
        };
        self.push_preformatted(vec![Span::styled(title, frame_style())]);
        for line in render_code(&block.text, block.lang.as_deref(), false) {
            let mut spans = vec![Span::styled("│ ", frame_style())];
            spans.extend(line.spans);
            self.push_preformatted(spans);
        }
        self.push_preformatted(vec![Span::styled("└─", frame_style())]);
    }

    fn end_table(&mut self) {
        let Some(table) = self.table.take() else {
            return;
        };
        let columns = table
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(table.alignments.len());
        if columns == 0 {
            return;
        }

        let mut widths = vec![0usize; columns];
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.trim().width());
            }
        }

        let border = |left: &str, mid: &str, right: &str| -> Vec<Span<'static>> {
            let body: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            vec![Span::styled(format!("{}{}{}", left, body.join(mid), right), frame_style())]
        };

        self.push_preformatted(border("┌", "┬", "┐"));
        for (r, row) in table.rows.iter().enumerate() {
            let header = r < table.header_rows;
            let cell_style = if header {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled("│", frame_style())];
            for (i, width) in widths.iter().enumerate() {
                let cell = row.get(i).map(|c| c.trim()).unwrap_or("");
                let alignment = table.alignments.get(i).copied().unwrap_or(Alignment::None);
                spans.push(Span::styled(format!(" {} ", align(cell, *width, alignment)), cell_style));
                spans.push(Span::styled("│", frame_style()));
            }
            self.push_preformatted(spans);
            if header && r + 1 == table.header_rows && table.rows.len() > table.header_rows {
                self.push_preformatted(border("├", "┼", "┤"));
            }
        }
        self.push_preformatted(border("└", "┴", "┘"));
    }

    fn finish(mut self) -> Vec<RenderedLine> {
        // Unterminated constructs still show what arrived
        self.end_code_block();
        self.end_table();
        self.flush_marker();
        self.flush();

        while self.lines.last().is_some_and(RenderedLine::is_blank) {
            self.lines.pop();
        }
        self.lines
    }
}

fn align(text: &str, width: usize, alignment: Alignment) -> String {
    let gap = width.saturating_sub(text.width());
    match alignment {
        Alignment::Right => format!("{}{}", " ".repeat(gap), text),
        Alignment::Center => format!("{}{}{}", " ".repeat(gap / 2), text, " ".repeat(gap - gap / 2)),
        Alignment::Left | Alignment::None => format!("{}{}", text, " ".repeat(gap)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[RenderedLine]) -> Vec<String> {
        lines.iter().map(RenderedLine::text).collect()
    }

    const SAMPLE: &str = "# 沖繩行程\n\nDay one is **busy** and *fun* with ~~no~~ rest.\n\n\
        - Shuri Castle\n- [Churaumi](https://churaumi.okinawa)\n  - nested stop\n\n\
        1. first\n2. second\n\n- [x] packed\n- [ ] tickets\n\n\
        | Place | Hours |\n|:--|--:|\n| Aquarium | 8:30 |\n| Market | 10:00 |\n\n\
        ```rust\nfn main() {\n    println!(\"hai sai\");\n}\n```\n\n\
        > Bring sunscreen\n\nInline `code` and a footnote[^1].\n\n[^1]: Really.\n\n---\n";

    #[test]
    fn test_basic_markdown_parsing() {
        let lines = parse(SAMPLE);
        let all = texts(&lines).join("\n");
        assert!(all.contains("沖繩行程"));
        assert!(all.contains("busy"));
        assert!(all.contains("• Shuri Castle"));
        assert!(all.contains("1. first"));
        assert!(all.contains("2. second"));
        assert!(all.contains("[x] packed"));
        assert!(all.contains("[ ] tickets"));
        assert!(all.contains("│ Bring sunscreen"));
        assert!(all.contains("[^1]: Really."));
    }

    #[test]
    fn test_truncated_prefixes_never_panic() {
        let chars: Vec<char> = SAMPLE.chars().collect();
        for end in 0..=chars.len() {
            let prefix: String = chars[..end].iter().collect();
            for width in [0, 1, 5, 20, 80] {
                let _ = render(&prefix, width);
            }
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render(SAMPLE, 40), render(SAMPLE, 40));
        assert_eq!(render("**unterminated `code", 30), render("**unterminated `code", 30));
    }

    #[test]
    fn test_link_shows_label_then_target() {
        let lines = parse("See [the aquarium](https://churaumi.okinawa/en) today");
        assert_eq!(texts(&lines), vec!["See the aquarium (https://churaumi.okinawa/en) today"]);
        let target = lines[0]
            .line
            .spans
            .iter()
            .find(|s| s.content == "https://churaumi.okinawa/en")
            .unwrap();
        assert_eq!(target.style, link_target_style());
    }

    #[test]
    fn test_autolink_is_not_duplicated() {
        let lines = parse("<https://hackmd.io/@okinawa/trip>");
        assert_eq!(texts(&lines), vec!["https://hackmd.io/@okinawa/trip"]);
    }

    #[test]
    fn test_list_items_are_separate_blocks() {
        let lines = parse("- one\n- two\n  - nested");
        assert_eq!(texts(&lines), vec!["• one", "", "• two", "", "  • nested"]);
    }

    #[test]
    fn test_code_flag_separates_inline_and_block() {
        let inline = render_code("let x = 1;", Some("rust"), true);
        assert_eq!(inline.len(), 1);
        assert_eq!(inline[0].spans[0].style, inline_code_style());

        let block = render_code("let x = 1;\nlet y = 2;\n", Some("rust"), false);
        assert_eq!(block.len(), 2);
        let first: String = block[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, "let x = 1;");
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let block = render_code("whatever", Some("no-such-lang"), false);
        assert_eq!(block[0].spans[0].style, code_block_style());
    }

    #[test]
    fn test_preformatted_lines_are_clipped() {
        let long = format!("```\n{}\n```", "x".repeat(100));
        let lines = render(&long, 20);
        assert!(lines.iter().all(|l| l.width() <= 20));
        let body = lines.iter().find(|l| l.text().contains('x')).unwrap();
        assert!(body.no_wrap);
        assert!(body.text().ends_with(ELLIPSIS));
    }

    #[test]
    fn test_paragraphs_wrap_to_width() {
        let text = "Okinawa has beautiful beaches and a long history worth exploring slowly";
        let lines = render(text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width() <= 20));
        let joined: Vec<String> = texts(&lines).iter().map(|t| t.trim().to_string()).collect();
        assert_eq!(joined.join(" "), text);
    }

    #[test]
    fn test_wide_characters_wrap_by_columns() {
        let lines = render(&"沖繩".repeat(20), 10);
        assert!(lines.iter().all(|l| l.width() <= 10));
        assert_eq!(texts(&lines).concat(), "沖繩".repeat(20));
    }

    #[test]
    fn test_table_renders_with_borders() {
        let lines = parse("| a | b |\n|---|---|\n| 1 | 22 |");
        let all = texts(&lines);
        assert_eq!(all[0], "┌───┬────┐");
        assert_eq!(all[1], "│ a │ b  │");
        assert_eq!(all[2], "├───┼────┤");
        assert_eq!(all[3], "│ 1 │ 22 │");
        assert!(lines.iter().all(|l| l.no_wrap));
    }

    #[test]
    fn test_sanitize_control_characters() {
        assert_eq!(sanitize("a\x1b[31mred\x07\r\n\tb"), "a\u{FFFD}[31mred\u{FFFD}\n    b");
        let lines = parse("hi \x1b[2J there");
        assert!(!texts(&lines).concat().contains('\x1b'));
    }
}
