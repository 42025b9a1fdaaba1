//! Describe implementations for standard library and ecosystem types.

use super::{Describe, Shape, TypeRef};
use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Opaque binary payload, described as a byte array.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Bytes(pub Vec<u8>);

macro_rules! describe_as {
    ($shape:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::$shape
                }
            }
        )+
    };
}

describe_as!(String: String, &'static str, char);
describe_as!(Boolean: bool);
describe_as!(Integer: i8, i16, i32, u8, u16, u32);
describe_as!(Long: i64, u64, i128, u128, isize, usize);
describe_as!(Float: f32);
describe_as!(Double: f64);
describe_as!(Decimal: serde_json::Number);
describe_as!(Uuid: uuid::Uuid);
describe_as!(Date: chrono::NaiveDate);
describe_as!(DateTime: chrono::NaiveDateTime, std::time::SystemTime);
describe_as!(ByteArray: Bytes);
describe_as!(File: std::path::PathBuf, std::fs::File);

impl Describe for serde_json::Value {
    fn shape() -> Shape {
        tracing::debug!("serde_json::Value described as an untyped schema");
        Shape::Untyped
    }
}

impl<Tz: chrono::TimeZone + 'static> Describe for chrono::DateTime<Tz> {
    fn shape() -> Shape {
        Shape::DateTime
    }
}

macro_rules! describe_collection {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl<T: Describe> Describe for $ty<T> {
                fn shape() -> Shape {
                    Shape::Collection(TypeRef::of::<T>())
                }
            }
        )+
    };
}

describe_collection!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: Describe, S: 'static> Describe for HashSet<T, S> {
    fn shape() -> Shape {
        Shape::Collection(TypeRef::of::<T>())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> Shape {
        Shape::Collection(TypeRef::of::<T>())
    }
}

impl<K: 'static, V: Describe, S: 'static> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map(TypeRef::of::<V>())
    }
}

impl<K: 'static, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(TypeRef::of::<V>())
    }
}

impl<K: 'static, V: Describe, S: 'static> Describe for indexmap::IndexMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map(TypeRef::of::<V>())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn type_name() -> String {
        T::type_name()
    }

    fn shape() -> Shape {
        T::shape()
    }

    fn identity() -> TypeId {
        T::identity()
    }

    fn optional() -> bool {
        true
    }
}

macro_rules! describe_pointer {
    ($($ptr:ident),+ $(,)?) => {
        $(
            impl<T: Describe> Describe for $ptr<T> {
                fn type_name() -> String {
                    T::type_name()
                }

                fn shape() -> Shape {
                    T::shape()
                }

                fn identity() -> TypeId {
                    T::identity()
                }

                fn optional() -> bool {
                    T::optional()
                }
            }
        )+
    };
}

describe_pointer!(Box, Rc, Arc);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_types_share_identity() {
        assert_eq!(TypeRef::of::<Box<String>>(), TypeRef::of::<String>());
        assert_eq!(TypeRef::of::<Option<Arc<i32>>>(), TypeRef::of::<i32>());
        assert!(TypeRef::of::<Option<i32>>().is_optional());
        assert!(!TypeRef::of::<i32>().is_optional());
    }

    #[test]
    fn test_collection_and_map_shapes() {
        assert!(matches!(TypeRef::of::<Vec<u8>>().shape(), Shape::Collection(_)));
        assert!(matches!(TypeRef::of::<[i64; 3]>().shape(), Shape::Collection(_)));
        assert!(matches!(
            TypeRef::of::<BTreeMap<String, f32>>().shape(),
            Shape::Map(_)
        ));
        assert!(matches!(TypeRef::of::<Bytes>().shape(), Shape::ByteArray));
        assert!(matches!(
            TypeRef::of::<chrono::DateTime<chrono::Utc>>().shape(),
            Shape::DateTime
        ));
    }
}
