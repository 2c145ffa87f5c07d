use std::io::Write;

use anyhow::{bail, Context, Result};

use crate::model::{Comment, Post, Reaction, UNKNOWN};

const BOM: char = '\u{FEFF}';
const HEADER: &str = "類型,使用者,內容,時間";

/// Which comments to export. Empty filter keeps everything.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub reaction: Option<Reaction>,
    /// Case-insensitive substring of the user id.
    pub user: Option<String>,
}

impl CommentFilter {
    pub fn matches(&self, comment: &Comment) -> bool {
        let reaction_ok = self.reaction.map_or(true, |r| r == comment.reaction);
        let user_ok = match &self.user {
            Some(q) => comment.user.to_lowercase().contains(&q.to_lowercase()),
            None => true,
        };
        reaction_ok && user_ok
    }

    /// Matching comments in their original order.
    pub fn apply<'a>(&self, comments: &'a [Comment]) -> Vec<&'a Comment> {
        comments.iter().filter(|c| self.matches(c)).collect()
    }
}

/// One comment as read back from an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub reaction: Reaction,
    pub user: String,
    pub content: String,
    pub timestamp: String,
}

impl From<&Comment> for CsvRow {
    fn from(c: &Comment) -> Self {
        Self {
            reaction: c.reaction,
            user: c.user.clone(),
            content: c.content.clone(),
            timestamp: c.timestamp.clone(),
        }
    }
}

pub fn to_csv(comments: &[&Comment]) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(HEADER);
    out.push('\n');

    let rows: Vec<String> = comments
        .iter()
        .map(|c| {
            format!(
                "{},{},\"{}\",{}",
                c.reaction.symbol(),
                c.user,
                c.content.replace('"', "\"\""),
                c.timestamp
            )
        })
        .collect();
    out.push_str(&rows.join("\n"));
    out
}

pub fn write_csv<W: Write>(comments: &[&Comment], mut writer: W) -> Result<()> {
    writer
        .write_all(to_csv(comments).as_bytes())
        .context("Failed to write CSV export")?;
    writer.flush()?;
    Ok(())
}

/// Parse an export produced by [`to_csv`]. Quoted fields may hold commas,
/// doubled quotes and line breaks.
pub fn read_csv(text: &str) -> Result<Vec<CsvRow>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut records = split_records(text)?.into_iter();

    match records.next() {
        Some(header) if header.join(",") == HEADER => {}
        Some(header) => bail!("Unexpected CSV header: {:?}", header),
        None => bail!("CSV export is empty"),
    }

    records
        .enumerate()
        .map(|(i, fields)| {
            let [tag, user, content, timestamp]: [String; 4] = fields
                .try_into()
                .map_err(|f: Vec<String>| anyhow::anyhow!("Row {}: expected 4 fields, got {}", i + 1, f.len()))?;
            let reaction = Reaction::from_tag(&tag)
                .with_context(|| format!("Row {}: unknown reaction tag {:?}", i + 1, tag))?;
            Ok(CsvRow {
                reaction,
                user,
                content,
                timestamp,
            })
        })
        .collect()
}

fn split_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        bail!("Unterminated quoted field in CSV export");
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }
    Ok(records)
}

/// `ptt_stock_<date>.csv`, with a local timestamp when the post has no date.
pub fn export_file_name(post: &Post) -> String {
    let stamp = if post.date() == UNKNOWN || post.date().is_empty() {
        chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
    } else {
        post.date()
            .chars()
            .map(|c| if c == ':' || c == '/' || c.is_whitespace() { '_' } else { c })
            .collect()
    };
    format!("ptt_stock_{}.csv", stamp)
}
