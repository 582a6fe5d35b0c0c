pub mod sink;

use anyhow::Result;

pub use sink::{FileSink, StdoutSink, SummarySink};

/// Append-only markdown document, flushed to its sink in one write.
pub struct Summary {
    buffer: String,
    sink: Box<dyn SummarySink>,
}

impl Summary {
    pub fn new(sink: Box<dyn SummarySink>) -> Self {
        Self {
            buffer: String::new(),
            sink,
        }
    }

    /// Heading levels outside 1..=6 are clamped.
    pub fn add_heading(&mut self, text: &str, level: u8) -> &mut Self {
        let level = level.clamp(1, 6) as usize;
        self.buffer.push_str(&"#".repeat(level));
        self.buffer.push(' ');
        self.buffer.push_str(text.trim());
        self.buffer.push_str("\n\n");
        self
    }

    pub fn add_raw(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str(text);
        self
    }

    pub fn add_eol(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// First row is the header. Cells are markdown; `|` is escaped.
    pub fn add_table(&mut self, rows: &[Vec<String>]) -> &mut Self {
        let Some((header, body)) = rows.split_first() else {
            return self;
        };

        self.buffer.push_str(&table_row(header));
        self.buffer.push('|');
        for _ in header {
            self.buffer.push_str("---|");
        }
        self.buffer.push('\n');
        for row in body {
            self.buffer.push_str(&table_row(row));
        }
        self.buffer.push('\n');
        self
    }

    pub fn add_code_block(&mut self, code: &str, lang: Option<&str>) -> &mut Self {
        self.buffer.push_str(&code_block(code, lang));
        self.buffer.push('\n');
        self
    }

    /// Collapsible section. `label` is plain text; `body` appends the
    /// section content through the same builder.
    pub fn add_details(&mut self, label: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.buffer.push_str("<details><summary>");
        self.buffer.push_str(&escape_html(label));
        self.buffer.push_str("</summary>\n\n");
        body(self);
        while !self.buffer.ends_with("\n\n") {
            self.buffer.push('\n');
        }
        self.buffer.push_str("</details>\n\n");
        self
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[cfg(test)]
    pub fn stringify(&self) -> &str {
        &self.buffer
    }

    /// Hand the whole document to the sink and reset the buffer.
    pub async fn write(&mut self) -> Result<()> {
        self.sink.write(&self.buffer).await?;
        self.buffer.clear();
        Ok(())
    }
}

fn table_row(cells: &[String]) -> String {
    let mut row = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(&cell.replace('|', "\\|").replace('\n', " "));
        row.push_str(" |");
    }
    row.push('\n');
    row
}

/// Fenced code block, without trailing blank line.
fn code_block(code: &str, lang: Option<&str>) -> String {
    let fence = fence_for(code);
    format!(
        "{fence}{}\n{}\n{fence}\n",
        lang.unwrap_or(""),
        code.trim_end_matches('\n')
    )
}

/// A backtick fence longer than any run inside `code`.
fn fence_for(code: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn link(text: &str, href: &str) -> String {
    format!("[{}]({})", text.replace('[', "\\[").replace(']', "\\]"), href)
}

pub fn bold(text: &str) -> String {
    format!("**{}**", text)
}
