//! Sort key definitions

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// One sort key: a column and its direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }

    /// Parse `column`, `column:asc` or `column:desc`
    pub fn parse(input: &str) -> Result<Self, String> {
        let (column, direction) = match input.rsplit_once(':') {
            Some((column, dir)) => match dir.to_lowercase().as_str() {
                "asc" => (column, SortDirection::Asc),
                "desc" => (column, SortDirection::Desc),
                _ => {
                    return Err(format!(
                        "Invalid sort direction '{}'. Valid options: asc, desc",
                        dir
                    ));
                }
            },
            None => (input, SortDirection::Asc),
        };
        let column = column.trim();
        if column.is_empty() {
            return Err("Sort column must not be empty".to_string());
        }
        Ok(Self::new(column, direction))
    }
}
