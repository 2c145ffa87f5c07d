use thiserror::Error;

/// Conditions that halt an extraction. Heuristic misses never end up here;
/// they resolve to defaults or the fallback comment scan instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("article not found (404); check that the URL is correct")]
    NotFound,
    #[error("article is on an age-restricted board; copy the page text and paste it instead")]
    AgeRestricted,
    #[error("could not find a recognizable PTT article structure")]
    MalformedStructure,
    #[error("webmail links cannot be read directly; open the mail, select all, copy and paste its text")]
    AmbiguousSource,
    #[error("input is empty; enter a PTT URL or paste the article text")]
    EmptyInput,
    #[error("input is too short ({len} chars); enter a PTT URL or paste the full article text")]
    TooShort { len: usize },
    #[error("could not reach PTT through any endpoint ({}); paste the article text instead", attempts.join(", "))]
    FetchUnavailable { attempts: Vec<String> },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
