use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Implement this for a type to use it as a third-party tag kind.
///
/// ```
/// use nbtx::CustomKind;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Uuid(u128);
///
/// impl CustomKind for Uuid {
///     const KIND: &'static str = "TAG_Uuid";
/// }
/// ```
///
/// The type then carries through [`Payload::Custom`][`crate::Payload::Custom`]
/// and [`Value::Custom`][`crate::Value::Custom`]. Registering an adapter for
/// [`TagKind::Custom`][`crate::TagKind::Custom`]`(Uuid::KIND)` and a
/// [`CustomConverter`][`crate::converter::CustomConverter`] makes it readable
/// and writable.
pub trait CustomKind {
    /// Name identifying the kind. Must be unique among registered kinds.
    const KIND: &'static str;
}

/// Object-safe face of a [`CustomKind`]. Implemented automatically.
pub trait CustomTag: fmt::Debug + Send + Sync + 'static {
    fn kind_name(&self) -> &'static str;
    fn clone_box(&self) -> Box<dyn CustomTag>;
    fn eq_dyn(&self, other: &dyn CustomTag) -> bool;
    fn hash_dyn(&self, state: &mut dyn Hasher);
    fn as_any(&self) -> &dyn Any;
}

impl<T> CustomTag for T
where
    T: CustomKind + Clone + PartialEq + Hash + fmt::Debug + Send + Sync + 'static,
{
    fn kind_name(&self) -> &'static str {
        T::KIND
    }

    fn clone_box(&self) -> Box<dyn CustomTag> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn CustomTag) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn hash_dyn(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn CustomTag {
    pub fn downcast_ref<T: CustomTag>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for dyn CustomTag {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other)
    }
}

impl Eq for dyn CustomTag {}

impl Hash for dyn CustomTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_name().hash(state);
        self.hash_dyn(state);
    }
}

impl Clone for Box<dyn CustomTag> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}
