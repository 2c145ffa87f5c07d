use crate::model::Meta;
use crate::parser::lines::{classify, HeaderLabel, LineKind};

/// Title, author and date from the labeled header lines; first match per label wins.
pub fn extract(text: &str) -> Meta {
    let mut title = None;
    let mut author = None;
    let mut date = None;

    for line in text.lines() {
        if let LineKind::Header { label, value } = classify(line) {
            let slot = match label {
                HeaderLabel::Title => &mut title,
                HeaderLabel::Author => &mut author,
                HeaderLabel::Date => &mut date,
            };
            if slot.is_none() {
                *slot = header_value(label, value);
            }
        }
        if title.is_some() && author.is_some() && date.is_some() {
            break;
        }
    }

    let defaults = Meta::default();
    Meta {
        title: title.unwrap_or(defaults.title),
        author: author.unwrap_or(defaults.author),
        date: date.unwrap_or(defaults.date),
    }
}

fn header_value(label: HeaderLabel, value: &str) -> Option<String> {
    let value = match label {
        // IDs never contain spaces; the rest is the nickname and board name.
        HeaderLabel::Author => value.split_whitespace().next()?,
        HeaderLabel::Title | HeaderLabel::Date => value.trim(),
    };
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{UNKNOWN, UNTITLED};

    #[test]
    fn labeled_fields() {
        let m = extract("作者: abc123 (Nick)\n標題: Re: [新聞] 測試  \n時間: Wed Jan  1 10:00:00 2025\n");
        assert_eq!(m.author, "abc123");
        assert_eq!(m.title, "Re: [新聞] 測試");
        assert_eq!(m.date, "Wed Jan  1 10:00:00 2025");
    }

    #[test]
    fn terminal_layout_without_colons() {
        let m = extract(" 作者  nobody\n作者  abc123 (Nick)  看板  Stock\n標題  [心得] 存股\n");
        assert_eq!(m.author, "abc123");
        assert_eq!(m.title, "[心得] 存股");
        assert_eq!(m.date, UNKNOWN);
    }

    #[test]
    fn first_match_wins() {
        let m = extract("標題: first\n標題: second\n");
        assert_eq!(m.title, "first");
    }

    #[test]
    fn missing_fields_default() {
        let m = extract("收件者: me\n主旨: hello\n");
        assert_eq!(m.title, UNTITLED);
        assert_eq!(m.author, UNKNOWN);
        assert_eq!(m.date, UNKNOWN);
    }
}
