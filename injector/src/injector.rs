//! The hierarchical `Injector` and its binding table.

use crate::core::{downcast_instance, Binding, InjectionKey};
use crate::error::{InjectorError, Result};
use crate::injectable::{Injectable, Reflect};
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// A single-threaded dependency injection container.
///
/// An injector maps type keys to shared instances. Lookups that miss locally
/// are delegated to the parent injector, so the nearest binding always wins
/// and a child can shadow anything its ancestors provide.
///
/// Injectors are always handled through `Rc`. A child keeps only a weak
/// reference to its parent; the parent's lifetime is managed by whoever
/// created it. Every injector is bound under its own key, so types can ask
/// for the `Injector` that injected them.
pub struct Injector {
  parent: Option<Weak<Injector>>,
  bindings: RefCell<HashMap<InjectionKey, Binding>>,
}

impl Injectable for Injector {}

impl Injector {
  /// Creates a root injector.
  pub fn new() -> Rc<Self> {
    Self::create(None)
  }

  /// Creates an injector that falls back to `parent` on a miss.
  pub fn with_parent(parent: &Rc<Injector>) -> Rc<Self> {
    Self::create(Some(Rc::downgrade(parent)))
  }

  /// Shorthand for `Injector::with_parent(self)`.
  pub fn child(self: &Rc<Self>) -> Rc<Self> {
    Self::with_parent(self)
  }

  fn create(parent: Option<Weak<Injector>>) -> Rc<Self> {
    Rc::new_cyclic(|this: &Weak<Injector>| {
      // Held weakly: a strong self-binding would keep the injector alive forever.
      let mut bindings = HashMap::new();
      bindings.insert(InjectionKey::of::<Injector>(), Binding::weak(this.clone()));
      Injector {
        parent,
        bindings: RefCell::new(bindings),
      }
    })
  }

  /// The parent injector, if one was given and is still alive.
  pub fn parent(&self) -> Option<Rc<Injector>> {
    self.parent.as_ref().and_then(Weak::upgrade)
  }

  // --- Binding ---

  /// Binds `instance` under the key of `T`.
  ///
  /// `T` is the key, so the caller decides what the instance is visible as:
  /// `bind::<dyn Greeter>(..)` and `bind::<EnglishGreeter>(..)` are separate
  /// bindings, and neither makes the instance resolvable under the other key.
  /// A previous binding for the same key in this injector is replaced;
  /// ancestors are never touched.
  pub fn bind<T: ?Sized + Injectable>(&self, instance: Rc<T>) {
    let key = InjectionKey::of::<T>();
    trace!(key = key.type_name(), "binding instance");
    self.bindings.borrow_mut().insert(key, Binding::strong(instance));
  }

  /// Wraps `instance` in an `Rc`, binds it under its own type and returns it.
  pub fn bind_instance<T: Injectable>(&self, instance: T) -> Rc<T> {
    let instance = Rc::new(instance);
    self.bind(Rc::clone(&instance));
    instance
  }

  /// Whether this injector itself (ignoring ancestors) has a binding for `T`.
  pub fn is_bound<T: ?Sized + Injectable>(&self) -> bool {
    self.bindings.borrow().contains_key(&InjectionKey::of::<T>())
  }

  // --- Resolution ---

  /// Resolves `T` from this injector or the nearest ancestor that binds it.
  pub fn get<T: ?Sized + Injectable>(&self) -> Result<Rc<T>> {
    let key = InjectionKey::of::<T>();
    let instance = self.lookup(&key)?;
    downcast_instance::<T>(&*instance).ok_or(InjectorError::UnboundDependency(key))
  }

  /// Type-erased resolution by key.
  ///
  /// The returned handle wraps the bound `Rc`; use [`Injector::get`] for a
  /// typed result.
  pub fn lookup(&self, key: &InjectionKey) -> Result<Rc<dyn Any>> {
    if let Some(instance) = self.local(key) {
      return Ok(instance);
    }

    let mut ancestor = self.parent();
    while let Some(injector) = ancestor {
      if let Some(instance) = injector.local(key) {
        return Ok(instance);
      }
      ancestor = injector.parent();
    }

    debug!(key = key.type_name(), "unbound dependency");
    Err(InjectorError::UnboundDependency(*key))
  }

  fn local(&self, key: &InjectionKey) -> Option<Rc<dyn Any>> {
    self
      .bindings
      .borrow()
      .get(key)
      .map(|binding| Rc::clone(&binding.instance))
  }

  // --- Injection ---

  /// Fills every declared [`Inject`](crate::Inject) field of `target`.
  ///
  /// Fields are resolved in declaration order. The first field that cannot
  /// be resolved aborts the call with [`InjectorError::UnboundDependency`];
  /// fields assigned before it keep their new values.
  pub fn inject<T: ?Sized + Injectable>(&self, target: &T) -> Result<()> {
    self.inject_target(target.as_reflect())
  }

  fn inject_target(&self, target: &dyn Reflect) -> Result<()> {
    let info = target.type_info();
    trace!(
      type_name = info.type_name(),
      fields = info.fields().len(),
      "injecting"
    );

    for field in info.fields() {
      let instance = self.lookup(field.key())?;
      if !field.assign(target.as_any(), &*instance) {
        return Err(InjectorError::UnboundDependency(*field.key()));
      }
      trace!(
        type_name = info.type_name(),
        field = field.name(),
        dependency = field.key().type_name(),
        "injected field"
      );
    }
    Ok(())
  }

  /// Injects every instance bound in this injector, then runs their
  /// post-construct hooks.
  ///
  /// Only local bindings take part; ancestors are used for resolution but
  /// their instances are left alone. All injection happens before the first
  /// hook runs, so a hook can rely on its siblings being injected. An
  /// instance bound under several keys is injected and post-constructed
  /// once. Hooks may bind new instances; those are not part of this pass.
  /// The injector's own self-binding is held weakly and skipped: an
  /// `Injector` declares no fields and no hook, so visiting it would be a no-op.
  pub fn post_bindings(&self) -> Result<()> {
    let bound: Vec<Binding> = self.bindings.borrow().values().cloned().collect();

    let mut seen = HashSet::new();
    let targets: Vec<&dyn Reflect> = bound
      .iter()
      .filter_map(Binding::target)
      .filter(|target| seen.insert(address_of(*target)))
      .collect();

    for target in &targets {
      self.inject_target(*target)?;
    }

    let mut hooks = 0usize;
    for target in &targets {
      if target.type_info().post_construct(target.as_any()) {
        hooks += 1;
      }
    }

    debug!(
      bindings = bound.len(),
      injected = targets.len(),
      hooks,
      "post-bind pass complete"
    );
    Ok(())
  }
}

fn address_of(target: &dyn Reflect) -> *const () {
  target.as_any() as *const dyn Any as *const ()
}

impl fmt::Debug for Injector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bindings = self.bindings.borrow();
    f.debug_struct("Injector")
      .field("bindings", &bindings.keys().collect::<Vec<_>>())
      .field("has_parent", &self.parent.is_some())
      .finish()
  }
}
