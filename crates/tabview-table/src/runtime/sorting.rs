use super::*;
use crate::filter_types::SortDirection;

impl TableRuntime {
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Apply a sort, or clear it with `None` to fall back to canonical order
    ///
    /// Returns false when sorting is disabled, the field is not a sortable column, or the
    /// sort is unchanged.
    pub fn set_sort(&mut self, spec: Option<SortSpec>) -> bool {
        if !self.config.sorting.enabled {
            return false;
        }
        if let Some(spec) = &spec {
            if !Self::sortable_in(&self.config, &spec.field) {
                return false;
            }
        }
        if self.sort == spec {
            return false;
        }

        let event = match (&spec, &self.sort) {
            (Some(next), _) => TableEvent::SortChange {
                field: next.field.clone(),
                direction: Some(next.direction),
            },
            (None, Some(previous)) => TableEvent::SortChange {
                field: previous.field.clone(),
                direction: None,
            },
            (None, None) => return false,
        };

        self.sort = spec;
        self.refresh_view_from_first_page();
        self.emit(event);
        true
    }

    /// Header click: ascending, then descending, then cleared
    pub fn toggle_sort(&mut self, field: &str) -> bool {
        let next = match &self.sort {
            Some(current) if current.field == field => match current.direction {
                SortDirection::Ascending => Some(SortSpec::descending(field)),
                SortDirection::Descending => None,
            },
            _ => Some(SortSpec::ascending(field)),
        };
        self.set_sort(next)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ColumnDescriptor;

    fn runtime() -> TableRuntime {
        let config = TableConfig::new(
            "devices",
            vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("note", "Note").sortable(false),
            ],
        );
        TableRuntime::new(config).with_rows(vec![
            Row::new().with("name", "delta"),
            Row::new().with("name", "alpha"),
            Row::new().with("name", "charlie"),
        ])
    }

    fn names(runtime: &TableRuntime) -> Vec<String> {
        runtime
            .view_rows()
            .iter()
            .map(|row| row.value("name").display_text())
            .collect()
    }

    #[test]
    fn test_toggle_cycles_and_clear_restores_canonical_order() {
        let mut runtime = runtime();

        assert!(runtime.toggle_sort("name"));
        assert_eq!(names(&runtime), vec!["alpha", "charlie", "delta"]);

        assert!(runtime.toggle_sort("name"));
        assert_eq!(names(&runtime), vec!["delta", "charlie", "alpha"]);

        assert!(runtime.toggle_sort("name"));
        assert_eq!(runtime.sort(), None);
        assert_eq!(names(&runtime), vec!["delta", "alpha", "charlie"]);

        let events = runtime.drain_events();
        assert_eq!(
            events.last(),
            Some(&TableEvent::SortChange {
                field: "name".into(),
                direction: None
            })
        );
    }

    #[test]
    fn test_unsortable_and_unknown_fields_are_ignored() {
        let mut runtime = runtime();
        assert!(!runtime.toggle_sort("note"));
        assert!(!runtime.set_sort(Some(SortSpec::ascending("ghost"))));
        assert!(runtime.drain_events().is_empty());
    }

    #[test]
    fn test_default_sort_applies_on_init() {
        let mut config = runtime().config().clone();
        config.sorting.default_sort = Some(SortSpec::descending("name"));
        let runtime = TableRuntime::new(config).with_rows(vec![
            Row::new().with("name", "a"),
            Row::new().with("name", "b"),
        ]);
        assert_eq!(names(&runtime), vec!["b", "a"]);
    }
}
