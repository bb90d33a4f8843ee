//! Tests for the generic data selector
//!
//! These use a minimal item type so the selector is exercised independently
//! of any cluster resource.

#[cfg(test)]
mod selector_tests {
    use crate::dataselect::*;
    use chrono::{TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        name: &'static str,
        namespace: &'static str,
        replicas: Option<i64>,
        created_secs: i64,
    }

    impl DataCell for Item {
        fn property(&self, name: PropertyName) -> Option<ComparableValue> {
            match name {
                PropertyName::Name => Some(ComparableValue::Str(self.name.to_string())),
                PropertyName::Namespace => {
                    Some(ComparableValue::Str(self.namespace.to_string()))
                }
                PropertyName::CreationTimestamp => Some(ComparableValue::Time(
                    Utc.timestamp_opt(self.created_secs, 0).unwrap(),
                )),
                PropertyName::DesiredReplicas => self.replicas.map(ComparableValue::Int),
                PropertyName::ObservedReplicas => None,
            }
        }
    }

    fn item(id: u32, name: &'static str, namespace: &'static str, replicas: i64) -> Item {
        Item {
            id,
            name,
            namespace,
            replicas: Some(replicas),
            created_secs: 1_700_000_000 + id as i64,
        }
    }

    fn fixture() -> Vec<Item> {
        vec![
            item(0, "frontend", "web", 3),
            item(1, "backend-api", "web", 2),
            item(2, "Redis-Cache", "data", 1),
            item(3, "api-gateway", "edge", 2),
            item(4, "worker", "data", 5),
            item(5, "scheduler", "ops", 2),
        ]
    }

    fn ids(items: &[Item]) -> Vec<u32> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let selected = select(fixture(), &DataSelectQuery::all());
        assert_eq!(selected.total_items, 6);
        assert_eq!(ids(&selected.items), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let query = DataSelectQuery::all().with_filter(FilterQuery::by_name("API"));
        let selected = select(fixture(), &query);
        assert_eq!(ids(&selected.items), vec![1, 3]);

        let query = DataSelectQuery::all().with_filter(FilterQuery::by_name("redis"));
        assert_eq!(ids(&select(fixture(), &query).items), vec![2]);
    }

    #[test]
    fn test_filter_matches_any_listed_property() {
        let query = DataSelectQuery::all().with_filter(FilterQuery::new(
            "data",
            vec![PropertyName::Name, PropertyName::Namespace],
        ));
        let selected = select(fixture(), &query);
        assert_eq!(ids(&selected.items), vec![2, 4]);
    }

    #[test]
    fn test_filter_ignores_non_string_properties() {
        let query = DataSelectQuery::all()
            .with_filter(FilterQuery::new("2", vec![PropertyName::DesiredReplicas]));
        let selected = select(fixture(), &query);
        assert!(selected.items.is_empty());
        assert_eq!(selected.total_items, 0);
    }

    #[test]
    fn test_empty_filter_text_keeps_everything() {
        let query = DataSelectQuery::all().with_filter(FilterQuery::by_name(""));
        assert_eq!(select(fixture(), &query).total_items, 6);
    }

    #[test]
    fn test_sort_by_string_ascending_and_descending() {
        let query = DataSelectQuery::all()
            .with_sort(SortQuery::new(vec![SortBy::ascending(PropertyName::Name)]));
        // Lexicographic byte order puts the capitalised name first
        assert_eq!(ids(&select(fixture(), &query).items), vec![2, 3, 1, 0, 5, 4]);

        let query = DataSelectQuery::all()
            .with_sort(SortQuery::new(vec![SortBy::descending(PropertyName::Name)]));
        assert_eq!(ids(&select(fixture(), &query).items), vec![4, 5, 0, 1, 3, 2]);
    }

    #[test]
    fn test_sort_by_timestamp_descending() {
        let query = DataSelectQuery::all().with_sort(SortQuery::new(vec![SortBy::descending(
            PropertyName::CreationTimestamp,
        )]));
        assert_eq!(ids(&select(fixture(), &query).items), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let query = DataSelectQuery::all().with_sort(SortQuery::new(vec![SortBy::ascending(
            PropertyName::DesiredReplicas,
        )]));
        // 1, 3, 5 all have two replicas and keep their input order
        assert_eq!(ids(&select(fixture(), &query).items), vec![2, 1, 3, 5, 0, 4]);

        let query = DataSelectQuery::all().with_sort(SortQuery::new(vec![SortBy::descending(
            PropertyName::DesiredReplicas,
        )]));
        assert_eq!(ids(&select(fixture(), &query).items), vec![4, 0, 1, 3, 5, 2]);
    }

    #[test]
    fn test_sort_uses_secondary_criterion_on_ties() {
        let query = DataSelectQuery::all().with_sort(SortQuery::new(vec![
            SortBy::ascending(PropertyName::Namespace),
            SortBy::descending(PropertyName::Name),
        ]));
        assert_eq!(ids(&select(fixture(), &query).items), vec![4, 2, 3, 5, 0, 1]);
    }

    #[test]
    fn test_missing_property_sorts_first() {
        let mut items = fixture();
        items[4].replicas = None;
        let query = DataSelectQuery::all().with_sort(SortQuery::new(vec![SortBy::ascending(
            PropertyName::DesiredReplicas,
        )]));
        assert_eq!(select(items, &query).items[0].id, 4);
    }

    #[test]
    fn test_total_counts_filtered_items_regardless_of_page() {
        let filter = FilterQuery::new("r", vec![PropertyName::Name]);
        let expected = select(
            fixture(),
            &DataSelectQuery::all().with_filter(filter.clone()),
        )
        .total_items;
        assert_eq!(expected, 4);

        for size in [1, 2, 4, 10] {
            for page in 0..4 {
                let query = DataSelectQuery::all()
                    .with_filter(filter.clone())
                    .with_pagination(PaginationQuery::new(size, page));
                assert_eq!(select(fixture(), &query).total_items, expected);
            }
        }

        let query = DataSelectQuery::all()
            .with_filter(FilterQuery::by_name("a"))
            .with_pagination(PaginationQuery::new(1, 0));
        let selected = select(fixture(), &query);
        assert_eq!(selected.items.len(), 1);
        assert_eq!(selected.total_items, 3);
    }

    #[test]
    fn test_consecutive_pages_are_contiguous() {
        let sort = SortQuery::new(vec![SortBy::ascending(PropertyName::Name)]);
        let full = select(fixture(), &DataSelectQuery::all().with_sort(sort.clone()));

        let page = |number| {
            select(
                fixture(),
                &DataSelectQuery::all()
                    .with_sort(sort.clone())
                    .with_pagination(PaginationQuery::new(4, number)),
            )
            .items
        };

        let first = page(0);
        let second = page(1);
        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 2);

        let rebuilt: Vec<Item> = first.into_iter().chain(second).collect();
        assert_eq!(rebuilt, full.items);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let query = DataSelectQuery::all().with_pagination(PaginationQuery::new(4, 7));
        let selected = select(fixture(), &query);
        assert!(selected.items.is_empty());
        assert_eq!(selected.total_items, 6);

        let query = DataSelectQuery::all().with_pagination(PaginationQuery::new(usize::MAX, 3));
        assert!(select(fixture(), &query).items.is_empty());
    }

    #[test]
    fn test_zero_page_size_is_empty() {
        let query = DataSelectQuery::all().with_pagination(PaginationQuery::new(0, 0));
        let selected = select(fixture(), &query);
        assert!(selected.items.is_empty());
        assert_eq!(selected.total_items, 6);
    }

    #[test]
    fn test_comparable_value_ordering() {
        assert!(ComparableValue::Int(2) < ComparableValue::Int(10));
        assert!(ComparableValue::Str("10".into()) < ComparableValue::Str("2".into()));
        assert!(ComparableValue::Str("z".into()) < ComparableValue::Int(0));
    }
}

#[cfg(test)]
mod request_tests {
    use crate::dataselect::*;
    use crate::error::DashboardError;

    #[test]
    fn test_empty_request_selects_everything() {
        let query = DataSelectQuery::try_from(SelectionRequest::default()).unwrap();
        assert_eq!(query, DataSelectQuery::all());
    }

    #[test]
    fn test_request_with_all_fields() {
        let request = SelectionRequest {
            filter_text: Some("api".into()),
            filter_by: Some("name, namespace".into()),
            sort_field: Some("creationTimestamp".into()),
            sort_ascending: Some(false),
            page_number: Some(2),
            page_size: Some(10),
            ..Default::default()
        };
        let query = DataSelectQuery::try_from(request).unwrap();

        assert_eq!(
            query.filter,
            Some(FilterQuery::new(
                "api",
                vec![PropertyName::Name, PropertyName::Namespace]
            ))
        );
        assert_eq!(
            query.sort,
            Some(SortQuery::new(vec![SortBy::descending(
                PropertyName::CreationTimestamp
            )]))
        );
        assert_eq!(query.pagination, Some(PaginationQuery::new(10, 2)));
    }

    #[test]
    fn test_blank_filter_by_falls_back_to_name() {
        for filter_by in ["", " , "] {
            let request = SelectionRequest {
                filter_text: Some("a".into()),
                filter_by: Some(filter_by.into()),
                ..Default::default()
            };
            let query = DataSelectQuery::try_from(request).unwrap();

            assert_eq!(
                query.filter,
                Some(FilterQuery::new("a", vec![PropertyName::Name]))
            );
        }
    }

    #[test]
    fn test_sort_pairs_take_precedence() {
        let request = SelectionRequest {
            sort_by: Some("d,namespace,a,name".into()),
            sort_field: Some("desiredReplicas".into()),
            ..Default::default()
        };
        let query = DataSelectQuery::try_from(request).unwrap();
        assert_eq!(
            query.sort,
            Some(SortQuery::new(vec![
                SortBy::descending(PropertyName::Namespace),
                SortBy::ascending(PropertyName::Name),
            ]))
        );
    }

    #[test]
    fn test_sort_field_defaults_to_ascending() {
        let request = SelectionRequest {
            sort_field: Some("name".into()),
            ..Default::default()
        };
        let query = DataSelectQuery::try_from(request).unwrap();
        assert_eq!(
            query.sort,
            Some(SortQuery::new(vec![SortBy::ascending(PropertyName::Name)]))
        );
    }

    #[test]
    fn test_page_number_without_size_is_ignored() {
        let request = SelectionRequest {
            page_number: Some(3),
            ..Default::default()
        };
        let query = DataSelectQuery::try_from(request).unwrap();
        assert_eq!(query.pagination, None);
    }

    #[test]
    fn test_invalid_requests_are_rejected() {
        let bad = [
            SelectionRequest {
                sort_field: Some("color".into()),
                ..Default::default()
            },
            SelectionRequest {
                sort_by: Some("a,name,d".into()),
                ..Default::default()
            },
            SelectionRequest {
                sort_by: Some("up,name".into()),
                ..Default::default()
            },
            SelectionRequest {
                filter_text: Some("x".into()),
                filter_by: Some("name,labels".into()),
                ..Default::default()
            },
        ];

        for request in bad {
            let err = DataSelectQuery::try_from(request).unwrap_err();
            assert!(matches!(err, DashboardError::InvalidQuery(_)));
        }
    }

    #[test]
    fn test_request_deserializes_from_camel_case() {
        let request: SelectionRequest = serde_json::from_str(
            r#"{"filterText":"web","sortField":"name","sortAscending":false,"pageNumber":1,"pageSize":5}"#,
        )
        .unwrap();
        assert_eq!(request.filter_text.as_deref(), Some("web"));
        assert_eq!(request.sort_ascending, Some(false));
        assert_eq!(request.page_size, Some(5));
    }
}
