use super::entries::TimeEntry;

/// Which entries a report covers with respect to billability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BillableFilter {
    BillableOnly,
    #[default]
    All,
}

impl BillableFilter {
    /// `"billable"` selects billable entries; anything else means all entries
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("billable") => Self::BillableOnly,
            _ => Self::All,
        }
    }
}

/// Date range and filters of a report request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub start: String,
    pub end: String,
    pub billable: BillableFilter,
    pub client_id: Option<String>,
    pub project_ids: Vec<String>,
    pub task_ids: Vec<String>,
    pub description: Option<String>,
    pub without_task: bool,
    pub without_description: bool,
}

impl ReportFilter {
    /// Whether a fetched entry satisfies the filters
    ///
    /// Entries lacking the field a filter inspects are kept, except for the
    /// project/task id lists and the "without" switches, which are strict.
    #[must_use]
    pub fn matches(&self, entry: &TimeEntry) -> bool {
        if self.billable == BillableFilter::BillableOnly && entry.billable == Some(false) {
            return false;
        }

        if let (Some(wanted), Some(actual)) = (&self.client_id, &entry.client_id) {
            if wanted != actual {
                return false;
            }
        }

        if !self.project_ids.is_empty()
            && !entry
                .project_id
                .as_ref()
                .is_some_and(|id| self.project_ids.contains(id))
        {
            return false;
        }

        if self.without_task {
            if entry.task_id.is_some() {
                return false;
            }
        } else if !self.task_ids.is_empty()
            && !entry
                .task_id
                .as_ref()
                .is_some_and(|id| self.task_ids.contains(id))
        {
            return false;
        }

        if self.without_description {
            return entry.description.is_none();
        }

        match self.description.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => entry
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle.to_lowercase())),
            _ => true,
        }
    }

    /// Keep only the entries matching the filters
    #[must_use]
    pub fn apply(&self, entries: Vec<TimeEntry>) -> Vec<TimeEntry> {
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(project: &str, task: Option<&str>, description: Option<&str>) -> TimeEntry {
        TimeEntry {
            project_id: Some(project.to_string()),
            task_id: task.map(str::to_string),
            description: description.map(str::to_string),
            client_id: Some("c1".to_string()),
            ..TimeEntry::default()
        }
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let filter = ReportFilter::default();
        assert!(filter.matches(&entry("p1", None, None)));
        assert!(filter.matches(&TimeEntry::default()));
    }

    #[test]
    fn test_project_and_task_filters() {
        let filter = ReportFilter {
            project_ids: vec!["p1".to_string()],
            task_ids: vec!["t1".to_string()],
            ..ReportFilter::default()
        };
        assert!(filter.matches(&entry("p1", Some("t1"), None)));
        assert!(!filter.matches(&entry("p1", Some("t2"), None)));
        assert!(!filter.matches(&entry("p2", Some("t1"), None)));
        assert!(!filter.matches(&entry("p1", None, None)));
    }

    #[test]
    fn test_without_switches() {
        let filter = ReportFilter {
            without_task: true,
            without_description: true,
            // Ignored while without_task is set
            task_ids: vec!["t1".to_string()],
            ..ReportFilter::default()
        };
        assert!(filter.matches(&entry("p1", None, None)));
        assert!(!filter.matches(&entry("p1", Some("t1"), None)));
        assert!(!filter.matches(&entry("p1", None, Some("notes"))));
    }

    #[test]
    fn test_description_contains_case_insensitive() {
        let filter = ReportFilter {
            description: Some(" Review ".to_string()),
            ..ReportFilter::default()
        };
        assert!(filter.matches(&entry("p1", None, Some("Design review"))));
        assert!(!filter.matches(&entry("p1", None, Some("Coding"))));
        assert!(!filter.matches(&entry("p1", None, None)));
    }

    #[test]
    fn test_billable_and_client() {
        let filter = ReportFilter {
            billable: BillableFilter::from_param(Some("billable")),
            client_id: Some("c1".to_string()),
            ..ReportFilter::default()
        };

        let mut e = entry("p1", None, None);
        assert!(filter.matches(&e));
        e.billable = Some(false);
        assert!(!filter.matches(&e));
        e.billable = Some(true);
        e.client_id = Some("c2".to_string());
        assert!(!filter.matches(&e));

        assert_eq!(
            BillableFilter::from_param(Some("billable_and_nonbillable")),
            BillableFilter::All
        );
    }
}
