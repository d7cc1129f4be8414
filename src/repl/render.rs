//! Markdown to ANSI rendering for answers
//!
//! Answers from the service are markdown (bold headings, bullet lists, fee
//! tables). This walks the pulldown-cmark event stream and emits terminal
//! text styled with the active [`Palette`].

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use super::colors::ansi::*;
use super::colors::Palette;

pub struct MarkdownRenderer {
    palette: Palette,
}

impl MarkdownRenderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Render a whole markdown document
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut writer = Writer::new(self.palette);
        for event in Parser::new_ext(markdown, options) {
            writer.event(event);
        }
        writer.finish()
    }
}

/// Table being collected; rendered once its end tag arrives
#[derive(Default)]
struct Table {
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
    header_rows: usize,
    cell: Option<String>,
}

struct Writer {
    palette: Palette,
    out: String,
    styles: Vec<&'static str>,
    /// `Some(next_number)` for ordered lists, `None` for bullets
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    /// Quote bars still owed to the current line
    pending_prefix: bool,
    in_code_block: bool,
    link: Option<(String, String)>,
    table: Option<Table>,
}

impl Writer {
    fn new(palette: Palette) -> Self {
        Self {
            palette,
            out: String::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            pending_prefix: false,
            in_code_block: false,
            link: None,
            table: None,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.emit_prefix();
                let styled = format!("{}{}{}", self.palette.code, code, RESET);
                self.write(&styled, &code);
                self.restore_styles();
            }
            Event::Html(html) | Event::InlineHtml(html) => self.write(&html, &html),
            Event::SoftBreak => self.write(" ", " "),
            Event::HardBreak => self.newline(),
            Event::Rule => {
                self.block_gap();
                let rule = self.palette.separator(40);
                self.out.push_str(&rule);
                self.out.push('\n');
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.write(marker, marker);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.block_gap();
                }
            }
            Tag::Heading { level, .. } => {
                self.block_gap();
                self.push_style(BOLD);
                self.push_style(self.palette.heading);
                if level == pulldown_cmark::HeadingLevel::H1 {
                    self.push_style(UNDERLINE);
                }
            }
            Tag::BlockQuote(_) => {
                self.block_gap();
                self.quote_depth += 1;
                self.pending_prefix = true;
            }
            Tag::CodeBlock(kind) => {
                self.block_gap();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        let label = format!("  {}{}{}\n", self.palette.muted, lang, RESET);
                        self.out.push_str(&label);
                    }
                }
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.block_gap();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.line_start();
                self.emit_prefix();
                let depth = self.lists.len().saturating_sub(1);
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let b = format!("{}. ", n);
                        *n += 1;
                        b
                    }
                    _ => "• ".to_string(),
                };
                let indent = "  ".repeat(depth);
                let marker = format!("{}{}{}{}", indent, self.palette.accent, bullet, RESET);
                self.out.push_str(&marker);
                self.restore_styles();
            }
            Tag::Table(alignments) => {
                self.block_gap();
                self.table = Some(Table {
                    alignments,
                    ..Table::default()
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    if table.rows.last().is_none_or(|row| !row.is_empty()) {
                        table.rows.push(Vec::new());
                    }
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell = Some(String::new());
                }
            }
            Tag::Emphasis => self.push_style(ITALIC),
            Tag::Strong => self.push_style(BOLD),
            Tag::Strikethrough => self.push_style(STRIKE),
            Tag::Link { dest_url, .. } => {
                self.link = Some((dest_url.to_string(), String::new()));
                self.push_style(UNDERLINE);
                self.push_style(self.palette.link);
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.newline(),
            TagEnd::Heading(level) => {
                if level == pulldown_cmark::HeadingLevel::H1 {
                    self.pop_style();
                }
                self.pop_style();
                self.pop_style();
                self.newline();
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pending_prefix = false;
                if !self.out.ends_with('\n') {
                    self.out.push_str(RESET);
                    self.restore_styles();
                }
                self.line_start();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.line_start();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.line_start();
            }
            TagEnd::Item => self.line_start(),
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    let rendered = self.render_table(&table);
                    self.out.push_str(&rendered);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header_rows = table.rows.len();
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = table.cell.take().unwrap_or_default();
                    if let Some(row) = table.rows.last_mut() {
                        row.push(cell.trim().to_string());
                    }
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                self.pop_style();
                if let Some((url, text)) = self.link.take() {
                    if !url.is_empty() && url != text {
                        let suffix = format!(" ({})", url);
                        let styled = format!("{}{}{}", self.palette.muted, suffix, RESET);
                        self.write(&styled, &suffix);
                        self.restore_styles();
                    }
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, link_text)) = self.link.as_mut() {
            link_text.push_str(text);
        }

        if self.in_code_block {
            for line in text.lines() {
                let styled = format!("    {}{}{}\n", self.palette.code, line, RESET);
                self.out.push_str(&styled);
            }
            return;
        }

        if self.table.is_some() {
            self.write(text, text);
            return;
        }

        // Keep quote bars on every line of multi-line text
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            if !line.is_empty() {
                self.emit_prefix();
                self.out.push_str(line);
            }
            if lines.peek().is_some() {
                self.newline();
            }
        }
    }

    /// Append styled text, or the plain form when inside a table cell
    fn write(&mut self, styled: &str, plain: &str) {
        match self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => cell.push_str(plain),
            None => self.out.push_str(styled),
        }
    }

    fn push_style(&mut self, code: &'static str) {
        self.styles.push(code);
        if self.table.is_none() {
            self.out.push_str(code);
        }
    }

    fn pop_style(&mut self) {
        self.styles.pop();
        if self.table.is_none() {
            self.out.push_str(RESET);
            self.restore_styles();
        }
    }

    /// Re-apply the open styles after a RESET
    fn restore_styles(&mut self) {
        if self.table.is_some() {
            return;
        }
        for code in &self.styles {
            self.out.push_str(code);
        }
    }

    fn newline(&mut self) {
        if self.table.is_some() {
            self.write(" ", " ");
            return;
        }
        if self.quote_depth > 0 {
            // Drop the quote italics before the line ends
            self.out.push_str(RESET);
            self.restore_styles();
            self.pending_prefix = true;
        }
        self.out.push('\n');
    }

    /// Write the quote bars owed to this line, then switch to italics
    fn emit_prefix(&mut self) {
        if !self.pending_prefix || self.quote_depth == 0 {
            return;
        }
        self.pending_prefix = false;
        let bars = "│ ".repeat(self.quote_depth);
        let prefix = format!("{}{}{}", self.palette.muted, bars, RESET);
        self.out.push_str(&prefix);
        self.restore_styles();
        self.out.push_str(ITALIC);
    }

    /// Make sure the next output starts on a fresh line
    fn line_start(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            if self.quote_depth > 0 {
                self.out.push_str(RESET);
                self.restore_styles();
                self.pending_prefix = true;
            }
            self.out.push('\n');
        }
    }

    /// Separate top-level blocks with one blank line
    fn block_gap(&mut self) {
        if self.out.is_empty() {
            return;
        }
        self.line_start();
        if !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn render_table(&self, table: &Table) -> String {
        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for (r, row) in table.rows.iter().enumerate() {
            let is_header = r < table.header_rows;
            let cells: Vec<String> = (0..columns)
                .map(|i| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let align = table.alignments.get(i).copied().unwrap_or(Alignment::None);
                    let padded = pad(cell, widths[i], align);
                    if is_header {
                        format!("{}{}{}{}", BOLD, self.palette.heading, padded, RESET)
                    } else {
                        padded
                    }
                })
                .collect();

            let divider = format!(" {}│{} ", self.palette.muted, RESET);
            out.push_str(&cells.join(&divider));
            out.push('\n');

            if is_header && r + 1 == table.header_rows {
                let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
                out.push_str(&format!(
                    "{}{}{}\n",
                    self.palette.muted,
                    rule.join("─┼─"),
                    RESET
                ));
            }
        }
        out
    }

    fn finish(mut self) -> String {
        if !self.styles.is_empty() {
            self.out.push_str(RESET);
        }
        let trimmed = self.out.trim_end_matches('\n').len();
        self.out.truncate(trimmed);
        self.out
    }
}

fn pad(cell: &str, width: usize, align: Alignment) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(fill), cell),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(fill - left))
        }
        Alignment::Left | Alignment::None => format!("{}{}", cell, " ".repeat(fill)),
    }
}

/// Remove ANSI escape sequences, for output that is not a terminal
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}
