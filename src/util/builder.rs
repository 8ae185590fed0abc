//! Inline configuration helper.

/// Applies `configure` to `instance` and returns it.
///
/// ```
/// use viewkit::util::build;
///
/// let list = build(Vec::new(), |v| {
///     v.push(1);
///     v.push(2);
/// });
/// assert_eq!(list, vec![1, 2]);
/// ```
pub fn build<T>(mut instance: T, configure: impl FnOnce(&mut T)) -> T {
    configure(&mut instance);
    instance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{FallbackImage, Tint};

    #[test]
    fn test_build_configures_in_place() {
        let fallback = build(FallbackImage::default(), |f| {
            f.tint = Tint::rgb(1, 2, 3);
            f.image = None;
        });
        assert_eq!(fallback.tint, Tint::rgb(1, 2, 3));
        assert!(fallback.image.is_none());
    }
}
