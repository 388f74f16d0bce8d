//! Filters over rendered objects.
//!
//! A filter chain is an AND: an object is kept only when every filter
//! accepts it. An empty chain keeps everything. Input order is preserved.

use std::collections::HashSet;

use kubeplate_core::RenderedObject;

pub type FilterFunc = Box<dyn Fn(&RenderedObject) -> bool + Send + Sync>;

const NAMESPACE_KIND: &str = "Namespace";

/// Keep the objects accepted by every filter in `filters`.
pub fn filter(objs: Vec<RenderedObject>, filters: &[FilterFunc]) -> Vec<RenderedObject> {
    objs.into_iter()
        .filter(|obj| filters.iter().all(|accept| accept(obj)))
        .collect()
}

/// Keep `Namespace` objects only.
pub fn retain_namespaces() -> FilterFunc {
    Box::new(|obj| obj.kind() == Some(NAMESPACE_KIND))
}

/// Keep everything except `Namespace` objects.
pub fn retain_all_but_namespaces() -> FilterFunc {
    Box::new(|obj| obj.kind() != Some(NAMESPACE_KIND))
}

/// Keep objects whose kind is one of `kinds`.
pub fn retain_kinds<I, S>(kinds: I) -> FilterFunc
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let kinds: HashSet<String> = kinds.into_iter().map(Into::into).collect();
    Box::new(move |obj| obj.kind().is_some_and(|kind| kinds.contains(kind)))
}
