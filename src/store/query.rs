//! Native query form understood by every plant store.
//!
//! A `Query` is a `Filter` tree plus an optional `Sort`, evaluated against
//! JSON documents. Field names are the wire names (`name`, `inStock`, ...)
//! and may be dotted paths.

use std::cmp::Ordering;

use serde_json::Value;

/// Predicate tree over a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    /// Every child matches. An empty list matches everything.
    And(Vec<Filter>),
    /// At least one child matches. An empty list matches nothing.
    Or(Vec<Filter>),
    /// Case-insensitive substring of a string field, or of any string
    /// element when the field is an array. `needle` is stored lowercased.
    Contains { field: String, needle: String },
    /// Field equals `value`, or the field is an array holding `value`.
    Eq { field: String, value: Value },
    /// Field (or one of its array elements) equals any of `values`.
    In { field: String, values: Vec<Value> },
}

impl Filter {
    pub fn contains(field: impl Into<String>, needle: &str) -> Self {
        Filter::Contains {
            field: field.into(),
            needle: needle.to_lowercase(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Filter::In {
            field: field.into(),
            values,
        }
    }

    /// Combine a list of conditions, collapsing the trivial cases.
    pub fn all_of(mut filters: Vec<Filter>) -> Self {
        match filters.len() {
            0 => Filter::All,
            1 => filters.remove(0),
            _ => Filter::And(filters),
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::And(children) => children.iter().all(|f| f.matches(doc)),
            Filter::Or(children) => children.iter().any(|f| f.matches(doc)),
            Filter::Contains { field, needle } => match lookup(doc, field) {
                Some(Value::String(s)) => s.to_lowercase().contains(needle.as_str()),
                Some(Value::Array(items)) => items.iter().any(|item| match item {
                    Value::String(s) => s.to_lowercase().contains(needle.as_str()),
                    _ => false,
                }),
                _ => false,
            },
            Filter::Eq { field, value } => field_equals(lookup(doc, field), value),
            Filter::In { field, values } => {
                let found = lookup(doc, field);
                values.iter().any(|value| field_equals(found, value))
            }
        }
    }
}

fn field_equals(found: Option<&Value>, expected: &Value) -> bool {
    match found {
        Some(Value::Array(items)) => {
            items.iter().any(|item| item == expected)
                || (matches!(expected, Value::Array(_)) && found == Some(expected))
        }
        Some(value) => value == expected,
        None => expected.is_null(),
    }
}

/// Resolve a dotted path inside a document.
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Single-field sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Order two documents by this sort. Ties compare equal so a stable sort
    /// keeps the incoming (creation) order.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ka = self.sort_key(lookup(a, &self.field));
        let kb = self.sort_key(lookup(b, &self.field));
        let ord = compare_values(ka, kb);
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }

    /// Arrays sort by their smallest element ascending and their largest
    /// descending; an empty array sorts like a missing field.
    fn sort_key<'a>(&self, value: Option<&'a Value>) -> Option<&'a Value> {
        match value {
            Some(Value::Array(items)) => {
                items.iter().reduce(|best, item| {
                    let ord = compare_values(Some(item), Some(best));
                    let better = match self.direction {
                        Direction::Ascending => ord == Ordering::Less,
                        Direction::Descending => ord == Ordering::Greater,
                    };
                    if better {
                        item
                    } else {
                        best
                    }
                })
            }
            other => other,
        }
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Total order over JSON values: missing/null, numbers, strings, objects,
/// arrays, booleans. Strings compare lexicographically.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(xs)), Some(Value::Array(ys))) => {
            for (x, y) in xs.iter().zip(ys.iter()) {
                let ord = compare_values(Some(x), Some(y));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            xs.len().cmp(&ys.len())
        }
        (Some(x @ Value::Object(_)), Some(y @ Value::Object(_))) => x.to_string().cmp(&y.to_string()),
        _ => Ordering::Equal,
    }
}

/// A complete find request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<Sort>,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self { filter, sort: None }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Filter and order documents given in creation order.
    pub fn run<I>(&self, docs: I) -> Vec<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut matched: Vec<Value> = docs.into_iter().filter(|doc| self.filter.matches(doc)).collect();
        if let Some(sort) = &self.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }
        matched
    }
}

/// Distinct values of a field across documents, array elements flattened,
/// in first-seen order.
pub fn distinct_values<'a, I>(field: &str, docs: I) -> Vec<Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut seen: Vec<Value> = Vec::new();
    let mut push = |value: &Value| {
        if !seen.contains(value) {
            seen.push(value.clone());
        }
    };
    for doc in docs {
        match lookup(doc, field) {
            Some(Value::Array(items)) => items.iter().for_each(&mut push),
            Some(Value::Null) | None => {}
            Some(value) => push(value),
        }
    }
    seen
}
