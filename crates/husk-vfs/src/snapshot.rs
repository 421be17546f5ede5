//! Tree snapshots.
//!
//! A snapshot is a nested-tag text rendering of the whole tree:
//!
//! ```text
//! <d name='/' path='/'>
//!   <c>
//!     <f name='cool.txt' path='/'><contents>hi</contents></f>
//!     <d name='docs' path='/docs/'>
//!       <c>
//!       </c>
//!     </d>
//!   </c>
//! </d>
//! ```
//!
//! Directories are `d` tags carrying their own absolute path (trailing
//! slash) and a `c` container for children; files are `f` tags carrying
//! the parent's path and a `contents` payload. Names, paths and payloads
//! are entity-escaped so arbitrary content round-trips; payloads are
//! written tightly (no whitespace added inside `contents`).
//!
//! `path` attributes are derivable from nesting and ignored on restore.
//! Timestamps are not persisted; restored units get fresh ones.

use husk_types::error::{HuskError, Result};

use crate::fs::FileSystem;
use crate::unit::{UnitId, UnitKind};

/// Render the whole tree to snapshot text.
pub fn render(fs: &FileSystem) -> String {
    let mut out = String::new();
    out.push_str("<d name='/' path='/'>\n  <c>\n");
    for &child in fs.children(fs.root()) {
        render_unit(fs, child, "/", 2, &mut out);
    }
    out.push_str("  </c>\n</d>\n");
    out
}

fn render_unit(fs: &FileSystem, id: UnitId, parent_path: &str, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let unit = fs.unit(id);
    match &unit.kind {
        UnitKind::File { content } => {
            out.push_str(&format!(
                "{indent}<f name='{}' path='{}'><contents>{}</contents></f>\n",
                escape(&unit.name),
                escape(parent_path),
                escape(content),
            ));
        }
        UnitKind::Dir { children } => {
            let own_path = format!("{parent_path}{}/", unit.name);
            out.push_str(&format!(
                "{indent}<d name='{}' path='{}'>\n{indent}  <c>\n",
                escape(&unit.name),
                escape(&own_path),
            ));
            for &child in children {
                render_unit(fs, child, &own_path, depth + 2, out);
            }
            out.push_str(&format!("{indent}  </c>\n{indent}</d>\n"));
        }
        // reserved, never constructed
        UnitKind::Link => {}
    }
}

/// Rebuild a tree from snapshot text. The restored pointer is the root.
pub fn parse(text: &str) -> Result<FileSystem> {
    let mut fs = FileSystem::new();
    let mut cur = Cursor::new(text);
    cur.skip_whitespace();
    cur.expect("<d")?;
    let _name = cur.attr("name")?;
    let _path = cur.attr("path")?;
    cur.expect(">")?;
    cur.skip_whitespace();
    cur.expect("<c>")?;
    let root = fs.root();
    parse_entries(&mut cur, &mut fs, root)?;
    cur.skip_whitespace();
    cur.expect("</d>")?;
    cur.skip_whitespace();
    if !cur.at_end() {
        return Err(HuskError::Snapshot(format!(
            "trailing input at byte {}",
            cur.pos
        )));
    }
    Ok(fs)
}

/// Parse the entries of one `<c>` container, consuming its `</c>`.
fn parse_entries(cur: &mut Cursor<'_>, fs: &mut FileSystem, parent: UnitId) -> Result<()> {
    loop {
        cur.skip_whitespace();
        if cur.eat("</c>") {
            return Ok(());
        }
        if cur.eat("<f") {
            let name = cur.attr("name")?;
            let _path = cur.attr("path")?;
            cur.expect(">")?;
            cur.expect("<contents>")?;
            let content = unescape(cur.read_until("</contents>")?);
            cur.expect("</f>")?;
            let file = fs.create_file(&name, &content);
            fs.attach(parent, file)?;
        } else if cur.eat("<d") {
            let name = cur.attr("name")?;
            let _path = cur.attr("path")?;
            cur.expect(">")?;
            cur.skip_whitespace();
            cur.expect("<c>")?;
            let dir = fs.create_dir(&name);
            fs.attach(parent, dir)?;
            parse_entries(cur, fs, dir)?;
            cur.skip_whitespace();
            cur.expect("</d>")?;
        } else {
            return Err(HuskError::Snapshot(format!(
                "unexpected input at byte {}",
                cur.pos
            )));
        }
    }
}

// ---------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, literal: &str) -> Result<()> {
        if self.eat(literal) {
            Ok(())
        } else {
            Err(HuskError::Snapshot(format!(
                "expected '{literal}' at byte {}",
                self.pos
            )))
        }
    }

    /// Consume up to and including `terminator`, returning the text
    /// before it.
    fn read_until(&mut self, terminator: &str) -> Result<&'a str> {
        match self.rest().find(terminator) {
            Some(idx) => {
                let text = &self.rest()[..idx];
                self.pos += idx + terminator.len();
                Ok(text)
            }
            None => Err(HuskError::Snapshot(format!(
                "missing '{terminator}' after byte {}",
                self.pos
            ))),
        }
    }

    /// Consume a `key='value'` attribute and return the unescaped value.
    fn attr(&mut self, key: &str) -> Result<String> {
        self.skip_whitespace();
        self.expect(key)?;
        self.expect("='")?;
        Ok(unescape(self.read_until("'")?))
    }
}

// ---------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------

/// Escape the four characters that collide with the snapshot grammar.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Invert [`escape`]. Unrecognized references stay literal.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        let decoded = rest.find(';').and_then(|end| {
            let ch = match &rest[1..end] {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "apos" | "#39" => '\'',
                _ => return None,
            };
            Some((ch, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
