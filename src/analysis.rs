//! Input and output shapes for the sentiment-analysis collaborator.
//!
//! Nothing here judges sentiment; it only renders a post the way the
//! collaborator expects it and reads its answer back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisSettings;
use crate::model::{truncate_chars, Post};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisInput {
    pub title: String,
    pub excerpt: String,
    /// `"<reaction> <user>: <content>"` lines, cut at the comment budget.
    pub comments: String,
}

impl AnalysisInput {
    pub fn from_post(post: &Post, settings: &AnalysisSettings) -> Self {
        let lines: Vec<String> = post
            .comments()
            .iter()
            .map(|c| format!("{} {}: {}", c.reaction.symbol(), c.user, c.content))
            .collect();

        Self {
            title: post.title().to_string(),
            excerpt: truncate_chars(post.body(), settings.excerpt_chars),
            comments: truncate_chars(&lines.join("\n"), settings.comment_budget),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "You are a stock market sentiment analyst. Analyze the following comments from a PTT Stock board post.\n\n\
             Post Title: {}\n\
             Post Content (Summary): {}...\n\n\
             Comments:\n{}\n\n\
             (Truncated if too long)\n\n\
             Respond with a JSON object:\n\
             1. sentiment: \"bullish\", \"bearish\" or \"neutral\".\n\
             2. summary: one short paragraph in Traditional Chinese on the overall mood (max 100 words).\n\
             3. keyPoints: an array of 3 strings in Traditional Chinese with the main arguments or jokes.\n",
            self.title, self.excerpt, self.comments
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl AnalysisResult {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse sentiment analysis response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Comment, Meta, Reaction, PASTED_SOURCE};

    fn post_with(comments: Vec<Comment>, body: &str) -> Post {
        let meta = Meta {
            title: "[新聞] 測試".into(),
            ..Meta::default()
        };
        Post::finalize(meta, PASTED_SOURCE, body, comments)
    }

    fn comment(i: usize, reaction: Reaction, content: &str) -> Comment {
        Comment {
            id: format!("c-{}", i),
            reaction,
            user: format!("user{}", i),
            content: content.into(),
            timestamp: String::new(),
        }
    }

    #[test]
    fn renders_comment_lines() {
        let post = post_with(
            vec![comment(1, Reaction::Push, "漲"), comment(2, Reaction::Boo, "跌")],
            "body",
        );
        let input = AnalysisInput::from_post(&post, &AnalysisSettings::default());
        assert_eq!(input.comments, "推 user1: 漲\n噓 user2: 跌");
        assert_eq!(input.excerpt, "body");
        assert!(input.prompt().contains("Post Title: [新聞] 測試"));
    }

    #[test]
    fn respects_budgets() {
        let comments = (0..50).map(|i| comment(i, Reaction::Arrow, "字字字字字")).collect();
        let post = post_with(comments, &"內文".repeat(400));
        let settings = AnalysisSettings {
            comment_budget: 40,
            excerpt_chars: 10,
        };
        let input = AnalysisInput::from_post(&post, &settings);
        assert_eq!(input.comments.chars().count(), 40);
        assert_eq!(input.excerpt.chars().count(), 10);
    }

    #[test]
    fn parses_result() {
        let r = AnalysisResult::from_json(
            r#"{"sentiment":"bearish","summary":"氣氛悲觀","keyPoints":["a","b","c"]}"#,
        )
        .unwrap();
        assert_eq!(r.sentiment, Sentiment::Bearish);
        assert_eq!(r.key_points.len(), 3);
        assert!(AnalysisResult::from_json(r#"{"sentiment":"moon","summary":""}"#).is_err());
    }
}
