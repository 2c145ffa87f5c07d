use super::lines::{classify, lines_with_offsets, HeaderLabel, LineKind, FOOTER_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Body,
    Footer,
    CommentBlock,
}

/// A region of the normalized text, as a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub start: usize,
    pub end: usize,
}

impl Section {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Walk the lines of `text` through Header → Body → Footer → CommentBlock.
///
/// The footer marker closes the header or body wherever it appears, even
/// inside a line that also reads as a header. Empty regions are dropped, so a
/// paste without a body yields no `Body` section.
pub fn cluster_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = if has_header_end(text) {
        SectionKind::Header
    } else {
        SectionKind::Body
    };
    let mut start = 0;

    for (offset, line, terminated) in lines_with_offsets(text) {
        let line_end = offset + line.len() + usize::from(terminated);
        let footer_at = line.find(FOOTER_MARKER);

        let split = match (current, classify(line), footer_at) {
            (SectionKind::Header | SectionKind::Body, _, Some(at)) => Some((offset + at, SectionKind::Footer)),
            (SectionKind::Header, LineKind::Header { label: HeaderLabel::Date, .. }, None) if terminated => {
                Some((line_end, SectionKind::Body))
            }
            (SectionKind::Footer, LineKind::Reaction(_), _) => Some((offset, SectionKind::CommentBlock)),
            _ => None,
        };

        if let Some((at, next)) = split {
            push_section(&mut sections, current, start, at);
            current = next;
            start = at;
        }
    }

    push_section(&mut sections, current, start, text.len());
    sections
}

fn push_section(sections: &mut Vec<Section>, kind: SectionKind, start: usize, end: usize) {
    if end > start {
        sections.push(Section { kind, start, end });
    }
}

/// The header block only counts as closed by a date line that has a line break after it.
fn has_header_end(text: &str) -> bool {
    lines_with_offsets(text).any(|(_, line, terminated)| {
        terminated
            && matches!(
                classify(line),
                LineKind::Header {
                    label: HeaderLabel::Date,
                    ..
                }
            )
    })
}

// ── Tests ──
