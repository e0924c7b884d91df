//! Core, mostly non-public data structures for the injector.

use crate::injectable::{Injectable, Reflect};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// The identity a binding is stored under.
///
/// Keys are derived from a type, never from a string. The type name is kept
/// around for diagnostics only; two keys are equal exactly when their
/// `TypeId`s are.
#[derive(Clone, Copy)]
pub struct InjectionKey {
  type_id: TypeId,
  type_name: &'static str,
}

impl InjectionKey {
  /// Returns the key for `T`, which may be a trait object such as `dyn Greeter`.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl PartialEq for InjectionKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for InjectionKey {}

impl Hash for InjectionKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for InjectionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({})", self.type_name)
  }
}

impl fmt::Display for InjectionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.type_name)
  }
}

/// One entry of a binding table.
///
/// `instance` holds either an `Rc<T>` or, for the injector's own
/// self-binding, a `Weak<T>`. `target` re-exposes a strong handle as an
/// injection target so the post-bind pass can work on erased entries.
#[derive(Clone)]
pub(crate) struct Binding {
  pub(crate) instance: Rc<dyn Any>,
  target: fn(&dyn Any) -> Option<&dyn Reflect>,
}

impl Binding {
  pub(crate) fn strong<T: ?Sized + Injectable>(instance: Rc<T>) -> Self {
    Self {
      instance: Rc::new(instance),
      target: target_of::<T>,
    }
  }

  pub(crate) fn weak<T: ?Sized + Injectable>(instance: Weak<T>) -> Self {
    Self {
      instance: Rc::new(instance),
      target: no_target,
    }
  }

  pub(crate) fn target(&self) -> Option<&dyn Reflect> {
    (self.target)(&*self.instance)
  }
}

fn target_of<T: ?Sized + Injectable>(instance: &dyn Any) -> Option<&dyn Reflect> {
  instance
    .downcast_ref::<Rc<T>>()
    .map(|rc| (**rc).as_reflect())
}

fn no_target(_: &dyn Any) -> Option<&dyn Reflect> {
  None
}

/// Recovers a typed handle from an erased binding entry.
pub(crate) fn downcast_instance<T: ?Sized + Any>(instance: &dyn Any) -> Option<Rc<T>> {
  if let Some(rc) = instance.downcast_ref::<Rc<T>>() {
    return Some(Rc::clone(rc));
  }
  instance
    .downcast_ref::<Weak<T>>()
    .and_then(Weak::upgrade)
}
