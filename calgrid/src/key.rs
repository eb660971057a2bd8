/// Identity of a resource row.
///
/// Keys are hashed to address cache rows and compared to decide whether a new resource list
/// is the same list (no reset) or a different one (full reset).
pub trait ResourceKey: core::hash::Hash + Eq + Clone {}
impl<K: core::hash::Hash + Eq + Clone> ResourceKey for K {}

/// An opaque row handle supplied by the host.
///
/// The engine never inspects a resource beyond its key; the handle is passed back untouched
/// to render iteration and to `on_date_range_selected`.
pub trait GridResource {
    type Key: ResourceKey;

    fn key(&self) -> Self::Key;
}

impl GridResource for String {
    type Key = String;

    fn key(&self) -> String {
        self.clone()
    }
}

impl GridResource for u32 {
    type Key = u32;

    fn key(&self) -> u32 {
        *self
    }
}

impl GridResource for u64 {
    type Key = u64;

    fn key(&self) -> u64 {
        *self
    }
}
