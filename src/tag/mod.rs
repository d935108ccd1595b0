mod compound;
mod custom;
mod display;
mod list;

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

pub use compound::TagCompound;
pub use custom::{CustomKind, CustomTag};
pub use list::TagList;

use crate::error::{Error, Result};
use crate::TagKind;

static NEXT_CONTAINER: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`TagList`] or [`TagCompound`]. A child's parent marker holds
/// one of these. It is only ever compared, never used to reach the container,
/// so ownership stays strictly parent to child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
    pub(crate) fn next() -> Self {
        ContainerId(NEXT_CONTAINER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Compound,
}

/// Back-reference from a tag to the container that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Parent {
    container: ContainerId,
    kind: ContainerKind,
}

impl Parent {
    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }
}

/// The data carried by a [`Tag`]. There is one variant per tag kind except
/// End, which never appears in a tree.
#[derive(Debug, Clone)]
pub enum Payload {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(TagList),
    Compound(TagCompound),
    IntArray(Vec<i32>),
    Boolean(bool),
    DoubleArray(Vec<f64>),
    FloatArray(Vec<f32>),
    LongArray(Vec<i64>),
    ShortArray(Vec<i16>),
    StringArray(Vec<String>),
    Custom(Box<dyn CustomTag>),
}

impl Payload {
    pub fn kind(&self) -> TagKind {
        match self {
            Payload::Byte(_) => TagKind::Byte,
            Payload::Short(_) => TagKind::Short,
            Payload::Int(_) => TagKind::Int,
            Payload::Long(_) => TagKind::Long,
            Payload::Float(_) => TagKind::Float,
            Payload::Double(_) => TagKind::Double,
            Payload::ByteArray(_) => TagKind::ByteArray,
            Payload::String(_) => TagKind::String,
            Payload::List(_) => TagKind::List,
            Payload::Compound(_) => TagKind::Compound,
            Payload::IntArray(_) => TagKind::IntArray,
            Payload::Boolean(_) => TagKind::Boolean,
            Payload::DoubleArray(_) => TagKind::DoubleArray,
            Payload::FloatArray(_) => TagKind::FloatArray,
            Payload::LongArray(_) => TagKind::LongArray,
            Payload::ShortArray(_) => TagKind::ShortArray,
            Payload::StringArray(_) => TagKind::StringArray,
            Payload::Custom(c) => TagKind::Custom(c.kind_name()),
        }
    }
}

// Floats compare by bit pattern so that Eq and Hash agree: NaN equals
// itself, 0.0 and -0.0 differ.
fn f32s_eq(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn f64s_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        use Payload::*;
        match (self, other) {
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (ByteArray(a), ByteArray(b)) => a == b,
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Compound(a), Compound(b)) => a == b,
            (IntArray(a), IntArray(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (DoubleArray(a), DoubleArray(b)) => f64s_eq(a, b),
            (FloatArray(a), FloatArray(b)) => f32s_eq(a, b),
            (LongArray(a), LongArray(b)) => a == b,
            (ShortArray(a), ShortArray(b)) => a == b,
            (StringArray(a), StringArray(b)) => a == b,
            (Custom(a), Custom(b)) => a.eq_dyn(b.as_ref()),
            _ => false,
        }
    }
}

impl Eq for Payload {}

impl Hash for Payload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use Payload::*;
        self.kind().hash(state);
        match self {
            Byte(v) => v.hash(state),
            Short(v) => v.hash(state),
            Int(v) => v.hash(state),
            Long(v) => v.hash(state),
            Float(v) => v.to_bits().hash(state),
            Double(v) => v.to_bits().hash(state),
            ByteArray(v) => v.hash(state),
            String(v) => v.hash(state),
            List(v) => v.hash(state),
            Compound(v) => v.hash(state),
            IntArray(v) => v.hash(state),
            Boolean(v) => v.hash(state),
            DoubleArray(v) => {
                v.len().hash(state);
                v.iter().for_each(|d| d.to_bits().hash(state));
            }
            FloatArray(v) => {
                v.len().hash(state);
                v.iter().for_each(|f| f.to_bits().hash(state));
            }
            LongArray(v) => v.hash(state),
            ShortArray(v) => v.hash(state),
            StringArray(v) => v.hash(state),
            Custom(v) => v.hash(state),
        }
    }
}

/// A named node of an NBT tree.
///
/// The empty string is the "unnamed" name; tags inside a [`TagList`] are
/// always unnamed. A tag belongs to at most one container at a time: adding
/// it to a list or compound moves it in and marks its parent, and removing it
/// clears the mark again.
///
/// Equality and hashing are structural over name and payload. The parent is
/// ignored. Cloning is deep, and the clone has no parent.
#[derive(Debug)]
pub struct Tag {
    name: String,
    parent: Option<Parent>,
    payload: Payload,
}

impl Tag {
    pub fn new(name: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            payload: payload.into(),
        }
    }

    /// A tag with the empty name, as stored in lists.
    pub fn unnamed(payload: impl Into<Payload>) -> Self {
        Self::new(String::new(), payload)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the tag. Fails if the tag is owned by a list and the new name
    /// is not empty, or if it is owned by a compound, whose keys must always
    /// equal the names of their tags.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        match self.parent.map(|p| p.kind) {
            Some(ContainerKind::List) if !name.is_empty() => Err(Error::ownership(format!(
                "{} belongs to a list and can not be named",
                self.kind()
            ))),
            Some(ContainerKind::Compound) if name != self.name => Err(Error::ownership(format!(
                "{} belongs to a compound under {:?}, remove it to rename",
                self.kind(),
                self.name
            ))),
            _ => {
                self.name = name;
                Ok(())
            }
        }
    }

    pub fn kind(&self) -> TagKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Replace the payload with one of the same kind. A tag never changes
    /// kind, since a list relies on its elements keeping theirs.
    pub fn set_payload(&mut self, payload: impl Into<Payload>) -> Result<()> {
        let payload = payload.into();
        if payload.kind() != self.kind() {
            return Err(Error::mismatch(self.kind(), payload.kind()));
        }
        self.payload = payload;
        Ok(())
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn attach(&mut self, container: ContainerId, kind: ContainerKind) {
        self.parent = Some(Parent { container, kind });
    }

    pub(crate) fn detach(mut self) -> Self {
        self.parent = None;
        self
    }

    pub(crate) fn is_owned_by(&self, container: ContainerId) -> bool {
        matches!(self.parent, Some(p) if p.container == container)
    }

    pub(crate) fn name_mut(&mut self) -> &mut String {
        &mut self.name
    }

    pub fn as_list(&self) -> Option<&TagList> {
        match &self.payload {
            Payload::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut TagList> {
        match &mut self.payload {
            Payload::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&TagCompound> {
        match &self.payload {
            Payload::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut TagCompound> {
        match &mut self.payload {
            Payload::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&dyn CustomTag> {
        match &self.payload {
            Payload::Custom(c) => Some(c.as_ref()),
            _ => None,
        }
    }
}

macro_rules! copy_accessor {
    ($($fn:ident -> $variant:ident: $t:ty),* $(,)?) => {
        impl Tag {
            $(
                pub fn $fn(&self) -> Option<$t> {
                    match self.payload {
                        Payload::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

copy_accessor! {
    as_i8 -> Byte: i8,
    as_i16 -> Short: i16,
    as_i32 -> Int: i32,
    as_i64 -> Long: i64,
    as_f32 -> Float: f32,
    as_f64 -> Double: f64,
    as_bool -> Boolean: bool,
}

// Arrays are only handed out as slices. Changing one means setting a new
// payload, so nothing outside the tag can hold on to its storage.
macro_rules! slice_accessor {
    ($($fn:ident -> $variant:ident: $t:ty),* $(,)?) => {
        impl Tag {
            $(
                pub fn $fn(&self) -> Option<&[$t]> {
                    match &self.payload {
                        Payload::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

slice_accessor! {
    as_byte_array -> ByteArray: i8,
    as_short_array -> ShortArray: i16,
    as_int_array -> IntArray: i32,
    as_long_array -> LongArray: i64,
    as_float_array -> FloatArray: f32,
    as_double_array -> DoubleArray: f64,
    as_string_array -> StringArray: String,
}

impl Clone for Tag {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            parent: None,
            payload: self.payload.clone(),
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.payload == other.payload
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.payload.hash(state);
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Payload {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(bool, Boolean);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<i8>, ByteArray);
from!(Vec<i16>, ShortArray);
from!(Vec<i32>, IntArray);
from!(Vec<i64>, LongArray);
from!(Vec<f32>, FloatArray);
from!(Vec<f64>, DoubleArray);
from!(Vec<String>, StringArray);
from!(TagList, List);
from!(TagCompound, Compound);
from!(Box<dyn CustomTag>, Custom);
