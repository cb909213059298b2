use std::fmt;

use crate::constants::kinds;
use crate::error::QueryError;

/// Coordinate of an addressable video (`<kind>:<author>:<slug>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoAddress {
    pub kind: u16,
    pub author: String,
    pub slug: String,
}

impl VideoAddress {
    /// Build the coordinate when both parts are known. Empty parts count as missing.
    pub fn new(author: Option<&str>, slug: Option<&str>) -> Option<Self> {
        let author = author.filter(|a| !a.is_empty())?;
        let slug = slug.filter(|s| !s.is_empty())?;
        Some(Self {
            kind: kinds::VIDEO,
            author: author.to_string(),
            slug: slug.to_string(),
        })
    }

    pub fn parse(coordinate: &str) -> Result<Self, QueryError> {
        let mut parts = coordinate.splitn(3, ':');
        let (Some(kind), Some(author), Some(slug)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(QueryError::Malformed(format!(
                "expected kind:author:slug, got {coordinate}"
            )));
        };
        let kind = kind
            .parse::<u16>()
            .map_err(|_| QueryError::Malformed(format!("invalid kind in {coordinate}")))?;
        if author.is_empty() || slug.is_empty() {
            return Err(QueryError::Malformed(format!(
                "empty author or slug in {coordinate}"
            )));
        }
        Ok(Self {
            kind,
            author: author.to_string(),
            slug: slug.to_string(),
        })
    }
}

impl fmt::Display for VideoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.author, self.slug)
    }
}

/// A video as addressed by callers: its event id plus, when known, the
/// author and slug that make up its addressable coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoRef {
    pub id: String,
    pub author: Option<String>,
    pub slug: Option<String>,
}

impl VideoRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: None,
            slug: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn address(&self) -> Option<VideoAddress> {
        VideoAddress::new(self.author.as_deref(), self.slug.as_deref())
    }
}
