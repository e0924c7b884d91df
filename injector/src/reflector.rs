//! Discovery and caching of injectable fields.
//!
//! Every [`Injectable`] type declares its fields once through
//! [`Injectable::describe`]. The resulting [`TypeInfo`] is stored in a
//! process-wide cache keyed by `TypeId` and shared by all injectors. The
//! cache is append-only: types do not change shape at runtime, so an entry is
//! never recomputed or evicted.

use crate::core::{downcast_instance, InjectionKey};
use crate::injectable::Injectable;
use crate::slot::Inject;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

type Assign = Arc<dyn Fn(&dyn Any, &dyn Any) -> bool + Send + Sync>;
type Hook = Arc<dyn Fn(&dyn Any) + Send + Sync>;

// Populated on first reflection of each type, read-mostly afterwards.
static TYPE_INFO: Lazy<DashMap<TypeId, Arc<TypeInfo>>> = Lazy::new(DashMap::new);

/// Returns the field list of `T`, computing and caching it on first use.
///
/// `T::describe` runs outside of any cache lock, so a type may reflect its
/// embedded ancestors while being described. If two threads race on the same
/// type, the first insert wins and both callers get that entry.
pub fn reflect<T: Injectable>() -> Arc<TypeInfo> {
  let type_id = TypeId::of::<T>();
  if let Some(cached) = TYPE_INFO.get(&type_id) {
    return Arc::clone(cached.value());
  }

  let mut fields = Fields::<T>::new();
  T::describe(&mut fields);
  let info = Arc::new(fields.finish(std::any::type_name::<T>()));
  debug!(
    type_name = info.type_name,
    fields = info.fields.len(),
    post_construct = info.post_construct.is_some(),
    "reflected injectable type"
  );

  Arc::clone(TYPE_INFO.entry(type_id).or_insert(info).value())
}

/// Reports whether `T` already has a cached entry.
pub fn is_reflected<T: ?Sized + Any>() -> bool {
  TYPE_INFO.contains_key(&TypeId::of::<T>())
}

/// One injectable field: the key it is resolved with and how to assign it.
pub struct FieldDescriptor {
  name: &'static str,
  key: InjectionKey,
  assign: Assign,
}

impl FieldDescriptor {
  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn key(&self) -> &InjectionKey {
    &self.key
  }

  /// Writes `value` (an erased instance handle) into this field of `target`.
  /// Returns `false` if either side is not of the expected type.
  pub(crate) fn assign(&self, target: &dyn Any, value: &dyn Any) -> bool {
    (self.assign)(target, value)
  }
}

impl fmt::Debug for FieldDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FieldDescriptor")
      .field("name", &self.name)
      .field("key", &self.key)
      .finish()
  }
}

/// The cached description of one injectable type.
pub struct TypeInfo {
  type_name: &'static str,
  fields: Vec<FieldDescriptor>,
  post_construct: Option<Hook>,
}

impl TypeInfo {
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Injectable fields in declaration order, embedded ancestors included.
  pub fn fields(&self) -> &[FieldDescriptor] {
    &self.fields
  }

  pub fn has_post_construct(&self) -> bool {
    self.post_construct.is_some()
  }

  /// Runs the post-construct hook, if the type declared one.
  pub(crate) fn post_construct(&self, target: &dyn Any) -> bool {
    match &self.post_construct {
      Some(hook) => {
        hook(target);
        true
      }
      None => false,
    }
  }
}

impl fmt::Debug for TypeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeInfo")
      .field("type_name", &self.type_name)
      .field("fields", &self.fields)
      .field("post_construct", &self.post_construct.is_some())
      .finish()
  }
}

/// Collects the declaration made in [`Injectable::describe`].
pub struct Fields<T> {
  fields: Vec<FieldDescriptor>,
  post_construct: Option<Hook>,
  _marker: PhantomData<fn(&T)>,
}

impl<T: Injectable> Fields<T> {
  fn new() -> Self {
    Self {
      fields: Vec::new(),
      post_construct: None,
      _marker: PhantomData,
    }
  }

  /// Declares an injectable field. Fields are injected in declaration order.
  pub fn field<D: ?Sized + Injectable>(
    &mut self,
    name: &'static str,
    accessor: fn(&T) -> &Inject<D>,
  ) -> &mut Self {
    let assign: Assign = Arc::new(move |target: &dyn Any, value: &dyn Any| {
      match (target.downcast_ref::<T>(), downcast_instance::<D>(value)) {
        (Some(target), Some(value)) => {
          accessor(target).set(value);
          true
        }
        _ => false,
      }
    });
    self.fields.push(FieldDescriptor {
      name,
      key: InjectionKey::of::<D>(),
      assign,
    });
    self
  }

  /// Includes every field of an embedded value of type `B`.
  ///
  /// This is how a type "inherits" the dependencies of a type it is built
  /// from. `B`'s post-construct hook is inherited too, unless `T` declares
  /// its own.
  pub fn extend<B: Injectable>(&mut self, accessor: fn(&T) -> &B) -> &mut Self {
    let base = reflect::<B>();
    for field in base.fields() {
      let inner = Arc::clone(&field.assign);
      let assign: Assign = Arc::new(move |target: &dyn Any, value: &dyn Any| {
        match target.downcast_ref::<T>() {
          Some(target) => {
            let base: &dyn Any = accessor(target);
            inner(base, value)
          }
          None => false,
        }
      });
      self.fields.push(FieldDescriptor {
        name: field.name,
        key: field.key,
        assign,
      });
    }

    if self.post_construct.is_none() {
      if let Some(hook) = &base.post_construct {
        let hook = Arc::clone(hook);
        self.post_construct = Some(Arc::new(move |target: &dyn Any| {
          if let Some(target) = target.downcast_ref::<T>() {
            let base: &dyn Any = accessor(target);
            hook(base);
          }
        }));
      }
    }
    self
  }

  /// Declares the hook run by [`Injector::post_bindings`](crate::Injector::post_bindings)
  /// once every bound instance has been injected.
  pub fn post_construct(&mut self, hook: fn(&T)) -> &mut Self {
    self.post_construct = Some(Arc::new(move |target: &dyn Any| {
      if let Some(target) = target.downcast_ref::<T>() {
        hook(target);
      }
    }));
    self
  }

  fn finish(self, type_name: &'static str) -> TypeInfo {
    TypeInfo {
      type_name,
      fields: self.fields,
      post_construct: self.post_construct,
    }
  }
}
