//! View registry: page views, their tabs, and supplemental file paths.
//!
//! The toolbar's page-link popup is assembled from this registry every
//! refresh; the registry itself is maintained by the view layer.

use bevy::prelude::*;

/// One tab of a page view. Only tabs carrying a link appear in the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTab {
    pub title: String,
    pub link: Option<String>,
}

/// A page view holding reference tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub tabs: Vec<PageTab>,
}

/// All active page views plus supplemental files attached to the document.
#[derive(Resource, Debug, Clone, Default)]
pub struct ViewRegistry {
    pub page_views: Vec<PageView>,
    pub supplemental_files: Vec<String>,
}
