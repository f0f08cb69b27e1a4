//! The page-link tab list behind the page-links popup.

use analysis::page_views::{PageTab, ViewRegistry};
use bevy::prelude::*;

/// Externally linked tabs collected from all active page views, rebuilt on
/// every reconciliation pass. Duplicates are simply listed.
#[derive(Resource, Debug, Default, Clone)]
pub struct PageTabList {
    pub entries: Vec<PageTab>,
}

impl PageTabList {
    /// Collects every tab carrying a link and sorts case-insensitively by
    /// title. The sort is stable, so equal titles keep registry order.
    pub fn rebuild(&mut self, registry: &ViewRegistry) {
        self.entries = registry
            .page_views
            .iter()
            .flat_map(|view| view.tabs.iter())
            .filter(|tab| tab.link.is_some())
            .cloned()
            .collect();
        self.entries.sort_by(|a, b| {
            a.title.to_lowercase().cmp(&b.title.to_lowercase())
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::page_views::PageView;

    fn tab(title: &str, link: Option<&str>) -> PageTab {
        PageTab {
            title: title.to_string(),
            link: link.map(str::to_string),
        }
    }

    #[test]
    fn collects_linked_tabs_sorted_case_insensitively() {
        let registry = ViewRegistry {
            page_views: vec![
                PageView {
                    tabs: vec![
                        tab("zebra", Some("https://example.org/z")),
                        tab("Notes", None),
                    ],
                },
                PageView {
                    tabs: vec![tab("Alpha", Some("https://example.org/a"))],
                },
            ],
            supplemental_files: Vec::new(),
        };
        let mut list = PageTabList::default();
        list.rebuild(&registry);
        let titles: Vec<&str> = list.entries.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "zebra"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let registry = ViewRegistry {
            page_views: vec![PageView {
                tabs: vec![
                    tab("Guide", Some("https://example.org/1")),
                    tab("Guide", Some("https://example.org/2")),
                ],
            }],
            supplemental_files: Vec::new(),
        };
        let mut list = PageTabList::default();
        list.rebuild(&registry);
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.entries[0].link.as_deref(), Some("https://example.org/1"));
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let mut list = PageTabList::default();
        list.entries.push(tab("stale", Some("x")));
        list.rebuild(&ViewRegistry::default());
        assert!(list.is_empty());
    }
}
