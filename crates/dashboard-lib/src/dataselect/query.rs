//! Wire form of a selection query

use serde::{Deserialize, Serialize};

use super::{DataSelectQuery, FilterQuery, PaginationQuery, PropertyName, SortBy, SortQuery};
use crate::error::DashboardError;

/// Selection parameters as supplied by the presentation layer
///
/// `sortBy` uses the `a,name,d,creationTimestamp` pair syntax and wins over
/// `sortField`/`sortAscending` when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_text: Option<String>,
    /// Comma separated properties the filter text is matched against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_ascending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl TryFrom<SelectionRequest> for DataSelectQuery {
    type Error = DashboardError;

    fn try_from(request: SelectionRequest) -> Result<Self, Self::Error> {
        let filter = match request.filter_text {
            Some(text) if !text.is_empty() => {
                let mut properties = match request.filter_by.as_deref() {
                    Some(list) => parse_property_list(list)?,
                    None => Vec::new(),
                };
                if properties.is_empty() {
                    properties.push(PropertyName::Name);
                }
                Some(FilterQuery::new(text, properties))
            }
            _ => None,
        };

        let sort = match (request.sort_by.as_deref(), request.sort_field.as_deref()) {
            (Some(pairs), _) => Some(parse_sort_pairs(pairs)?),
            (None, Some(field)) => {
                let property = field.parse()?;
                Some(SortQuery::new(vec![SortBy {
                    property,
                    ascending: request.sort_ascending.unwrap_or(true),
                }]))
            }
            (None, None) => None,
        };

        let pagination = request
            .page_size
            .map(|size| PaginationQuery::new(size, request.page_number.unwrap_or(0)));

        Ok(DataSelectQuery {
            filter,
            sort,
            pagination,
        })
    }
}

fn parse_property_list(list: &str) -> Result<Vec<PropertyName>, DashboardError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

fn parse_sort_pairs(pairs: &str) -> Result<SortQuery, DashboardError> {
    let parts: Vec<&str> = pairs
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() % 2 != 0 {
        return Err(DashboardError::InvalidQuery(format!(
            "sortBy must be a list of order,property pairs, got '{}'",
            pairs
        )));
    }

    let by = parts
        .chunks(2)
        .map(|pair| {
            let ascending = match pair[0] {
                "a" => true,
                "d" => false,
                other => {
                    return Err(DashboardError::InvalidQuery(format!(
                        "unknown sort order '{}', expected 'a' or 'd'",
                        other
                    )))
                }
            };
            Ok(SortBy {
                property: pair[1].parse()?,
                ascending,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SortQuery::new(by))
}
