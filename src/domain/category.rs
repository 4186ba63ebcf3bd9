use serde::Serialize;
use thiserror::Error;

/// The fixed set of spending categories an expense can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Food,
    Travel,
    Shopping,
    Bills,
    Entertainment,
    Health,
    Others,
}

impl Category {
    /// All categories, in the order they are offered for selection.
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Travel,
        Category::Shopping,
        Category::Bills,
        Category::Entertainment,
        Category::Health,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Others => "Others",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Food => "🍔",
            Category::Travel => "🚖",
            Category::Shopping => "🛍️",
            Category::Bills => "💡",
            Category::Entertainment => "🎬",
            Category::Health => "🏥",
            Category::Others => "✨",
        }
    }

    /// Name followed by its emoji, e.g. "Food 🍔".
    pub fn label(&self) -> String {
        format!("{} {}", self.as_str(), self.emoji())
    }

    /// Parse a category name, ignoring case and anything after the first word.
    /// Accepts both "food" and decorated labels such as "Food 🍔".
    pub fn parse_label(s: &str) -> Option<Self> {
        let name = s.split_whitespace().next()?;
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse_label(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
