//! Typed list filter and its translation to the store's native query.

use serde::Deserialize;
use serde_json::Value;

use crate::store::{Direction, Filter, Query, Sort};

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";
pub const DEFAULT_SORT_FIELD: &str = "name";

/// Raw list parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub in_stock: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

/// One active restriction on the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Substring of name, description or any category, ignoring case.
    Search(String),
    /// Exact member of `categories`.
    Category(String),
    InStock(bool),
}

impl Predicate {
    fn to_filter(&self) -> Filter {
        match self {
            Predicate::Search(text) => Filter::Or(vec![
                Filter::contains("name", text),
                Filter::contains("description", text),
                Filter::contains("categories", text),
            ]),
            Predicate::Category(category) => {
                Filter::is_in("categories", vec![Value::String(category.clone())])
            }
            Predicate::InStock(in_stock) => Filter::equals("inStock", *in_stock),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` sorts descending; anything else ascends.
    pub fn parse(raw: &str) -> Self {
        if raw == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// Conditions ANDed together, plus the ordering of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantFilter {
    predicates: Vec<Predicate>,
    sort_field: String,
    order: SortOrder,
}

impl Default for PlantFilter {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            order: SortOrder::Asc,
        }
    }
}

impl PlantFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from query-string parameters.
    ///
    /// Empty `search`/`category` values are ignored, as is `category=all`.
    /// A present `inStock` is true only for the exact text `true`.
    pub fn from_params(params: &ListParams) -> Self {
        let mut filter = Self::new();

        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            filter = filter.search(search);
        }
        if let Some(category) = params
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
        {
            filter = filter.category(category);
        }
        if let Some(in_stock) = params.in_stock.as_deref() {
            filter = filter.in_stock(in_stock == "true");
        }
        if let Some(sort) = params.sort.as_deref().filter(|s| !s.is_empty()) {
            filter.sort_field = sort.to_string();
        }
        if let Some(order) = params.order.as_deref() {
            filter.order = SortOrder::parse(order);
        }

        filter
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Search(text.into()));
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Category(category.into()));
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.predicates.push(Predicate::InStock(in_stock));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = field.into();
        self.order = order;
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Translate to the store's query form.
    pub fn to_query(&self) -> Query {
        let filter = Filter::all_of(self.predicates.iter().map(Predicate::to_filter).collect());
        let direction = match self.order {
            SortOrder::Asc => Direction::Ascending,
            SortOrder::Desc => Direction::Descending,
        };
        Query::new(filter).sorted(Sort::new(self.sort_field.clone(), direction))
    }
}

impl From<&ListParams> for PlantFilter {
    fn from(params: &ListParams) -> Self {
        Self::from_params(params)
    }
}
