//! Markdown subset used by assistant answers
//!
//! Answers are short and mostly tables of farm data, so this covers what the
//! server actually produces: headings, paragraphs, list items, fenced code,
//! horizontal rules, pipe tables and the `**strong**`, `*emphasis*` and
//! `` `code` `` inline spans. Anything else renders as plain text.

/// Inline run of text
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Strong(String),
    Emphasis(String),
    Code(String),
}

impl Span {
    /// The text without markup
    pub fn as_str(&self) -> &str {
        match self {
            Span::Text(s) | Span::Strong(s) | Span::Emphasis(s) | Span::Code(s) => s,
        }
    }
}

/// One table cell
pub type Cell = Vec<Span>;

/// Block-level element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    ListItem(Vec<Span>),
    /// Every row has exactly as many cells as the header
    Table { header: Vec<Cell>, rows: Vec<Vec<Cell>> },
    CodeBlock(String),
    Rule,
}

/// Parse markdown text into blocks
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            flush_paragraph(&mut paragraph, &mut blocks);
            let mut code = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim_start().starts_with("```") {
                code.push(lines[i]);
                i += 1;
            }
            // Skip the closing fence; an unclosed fence runs to the end
            i += 1;
            blocks.push(Block::CodeBlock(code.join("\n")));
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            i += 1;
            continue;
        }

        if let Some(next) = lines.get(i + 1) {
            if let Some(table) = table_start(trimmed, next.trim()) {
                flush_paragraph(&mut paragraph, &mut blocks);
                let width = table.len();
                let mut rows = Vec::new();
                i += 2;
                while i < lines.len() {
                    let row = lines[i].trim();
                    if row.is_empty() || !has_cell_divider(row) {
                        break;
                    }
                    rows.push(fit_row(split_row(row), width));
                    i += 1;
                }
                blocks.push(Block::Table {
                    header: to_cells(table),
                    rows: rows.into_iter().map(to_cells).collect(),
                });
                continue;
            }
        }

        if let Some((level, content)) = heading(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading {
                level,
                spans: parse_inline(content),
            });
        } else if is_rule(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Rule);
        } else if let Some(item) = list_item(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::ListItem(parse_inline(item)));
        } else {
            paragraph.push(trimmed);
        }
        i += 1;
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !lines.is_empty() {
        blocks.push(Block::Paragraph(parse_inline(&lines.join(" "))));
        lines.clear();
    }
}

/// Header cells, if `line` opens a table whose separator is `next`
fn table_start(line: &str, next: &str) -> Option<Vec<String>> {
    if !has_cell_divider(line) || !is_separator_row(next) {
        return None;
    }
    let header = split_row(line);
    (header.len() == split_row(next).len()).then_some(header)
}

/// True if `line` has a pipe outside code spans that is not escaped
fn has_cell_divider(line: &str) -> bool {
    let mut in_code = false;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '`' => in_code = !in_code,
            '|' if !in_code => return true,
            _ => {}
        }
    }
    false
}

/// True for a table delimiter row such as `|---|:---:|`
pub fn is_separator_row(line: &str) -> bool {
    if !line.contains('-') {
        return false;
    }
    let cells = split_row(line);
    !cells.is_empty()
        && cells.iter().all(|cell| {
            let dashes = cell.trim_start_matches(':').trim_end_matches(':');
            !dashes.is_empty() && dashes.chars().all(|c| c == '-')
        })
}

/// Split a table row into trimmed cell texts
///
/// Pipes inside backtick spans and escaped pipes (`\|`) stay in the cell.
pub fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => line,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_code = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '`' => {
                in_code = !in_code;
                cell.push(c);
            }
            '|' if !in_code => {
                cells.push(cell.trim().to_string());
                cell.clear();
            }
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn fit_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize(width, String::new());
    row
}

fn to_cells(row: Vec<String>) -> Vec<Cell> {
    row.iter().map(|text| parse_inline(text)).collect()
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if rest.is_empty() {
        return Some((hashes as u8, ""));
    }
    rest.strip_prefix(' ')
        .map(|content| (hashes as u8, content.trim()))
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let Some(first) = compact.chars().next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && compact.len() >= 3 && compact.chars().all(|c| c == first)
}

fn list_item(line: &str) -> Option<&str> {
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return Some(rest.trim_start());
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if rest.starts_with(". ") || rest.starts_with(") ") {
            // Keep the number; the view does not renumber items
            return Some(line);
        }
    }
    None
}

/// Parse inline markup
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some((span, consumed)) = delimited(rest) {
            if !plain.is_empty() {
                spans.push(Span::Text(std::mem::take(&mut plain)));
            }
            spans.push(span);
            rest = &rest[consumed..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            plain.push(c);
        }
        rest = chars.as_str();
    }

    if !plain.is_empty() {
        spans.push(Span::Text(plain));
    }
    spans
}

/// A closed inline span at the start of `text`, with the bytes it covers
fn delimited(text: &str) -> Option<(Span, usize)> {
    const MARKERS: [&str; 4] = ["`", "***", "**", "*"];

    for marker in MARKERS {
        let Some(body) = text.strip_prefix(marker) else {
            continue;
        };
        let Some(end) = body.find(marker) else {
            continue;
        };
        let inner = &body[..end];
        if inner.is_empty() {
            continue;
        }

        let consumed = marker.len() * 2 + end;
        let span = match marker {
            "`" => Span::Code(inner.to_string()),
            _ if inner.starts_with(char::is_whitespace) || inner.ends_with(char::is_whitespace) => {
                continue
            }
            // Bold italic renders as bold
            "***" | "**" => Span::Strong(inner.to_string()),
            _ => Span::Emphasis(inner.to_string()),
        };
        return Some((span, consumed));
    }
    None
}
