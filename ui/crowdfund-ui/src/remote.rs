//! Tri-state for a value that lives on-chain.

use std::fmt::Display;

/// `Loading` until the first read completes, then whatever the latest read
/// produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Remote<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Remote::Loading
    }
}

impl<T> Remote<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Remote::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Remote::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Remote::Ready(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Clone> Remote<T> {
    pub fn cloned(&self) -> Option<T> {
        self.value().cloned()
    }
}

impl<T, E: Display> From<Result<T, E>> for Remote<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Remote::Ready(v),
            Err(e) => Remote::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_loading() {
        let r: Remote<u32> = Remote::default();
        assert!(r.is_loading());
        assert_eq!(r.value(), None);
        assert_eq!(r.error(), None);
    }

    #[test]
    fn test_from_result() {
        let ok: Remote<u32> = Ok::<_, String>(5).into();
        assert_eq!(ok.value(), Some(&5));

        let failed: Remote<u32> = Err::<u32, _>("execution reverted").into();
        assert_eq!(failed.error(), Some("execution reverted"));
        assert!(!failed.is_loading());
    }
}
