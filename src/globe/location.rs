use serde::Deserialize;

/// Kind of site. The two kinds are mutually exclusive tabs in the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sales,
    Technical,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Sales => "Sales",
            Category::Technical => "Technical",
        }
    }

    /// Panel heading for the list of this category
    pub fn heading(self) -> &'static str {
        match self {
            Category::Sales => "Sales Offices",
            Category::Technical => "Technical Centers",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Category::Sales => Category::Technical,
            Category::Technical => Category::Sales,
        }
    }
}

/// One office or site shown on the globe. Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub description: String,
    pub offices: u32,
    pub employees: u32,
    pub category: Category,
}

impl Location {
    /// Case-insensitive substring match on name, city or description.
    /// `query` must already be lowercased.
    fn matches_lowered(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.city.to_lowercase().contains(query)
            || self.description.to_lowercase().contains(query)
    }

    fn is_visible(&self, category: Category, query: Option<&str>) -> bool {
        self.category == category && query.map_or(true, |q| self.matches_lowered(q))
    }
}

/// Lowercased search text, or `None` for a blank search. Only blankness is
/// judged on the trimmed text; matching keeps surrounding spaces.
fn normalize_query(search: &str) -> Option<String> {
    (!search.trim().is_empty()).then(|| search.to_lowercase())
}

/// Indices of the visible subset: active category, narrowed by the search
/// text. Source order is preserved.
pub fn visible_indices<'a>(
    locations: &'a [Location],
    category: Category,
    search: &str,
) -> impl Iterator<Item = usize> + 'a {
    let query = normalize_query(search);
    locations
        .iter()
        .enumerate()
        .filter(move |(_, loc)| loc.is_visible(category, query.as_deref()))
        .map(|(i, _)| i)
}
