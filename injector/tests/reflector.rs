use fibre_injector::reflector::{is_reflected, reflect};
use fibre_injector::{injectable, Fields, Inject, Injectable, InjectionKey, Injector};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

struct Database;
injectable!(Database);

struct Cache;
injectable!(Cache);

struct Metrics;
injectable!(Metrics);

static DESCRIBE_CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct CountedService {
  database: Inject<Database>,
}

impl Injectable for CountedService {
  fn describe(fields: &mut Fields<Self>) {
    DESCRIBE_CALLS.fetch_add(1, Ordering::SeqCst);
    fields.field("database", |this| &this.database);
  }
}

// An "ancestor" type that other services are built on.
#[derive(Default)]
struct BaseService {
  database: Inject<Database>,
  started: Cell<bool>,
}

impl Injectable for BaseService {
  fn describe(fields: &mut Fields<Self>) {
    fields
      .field("database", |this| &this.database)
      .post_construct(|this| this.started.set(true));
  }
}

#[derive(Default)]
struct DerivedService {
  base: BaseService,
  cache: Inject<Cache>,
}

impl Injectable for DerivedService {
  fn describe(fields: &mut Fields<Self>) {
    fields
      .extend(|this| &this.base)
      .field("cache", |this| &this.cache);
  }
}

#[derive(Default)]
struct OverridingService {
  base: BaseService,
  metrics: Inject<Metrics>,
  ready: Cell<bool>,
}

impl Injectable for OverridingService {
  fn describe(fields: &mut Fields<Self>) {
    fields
      .post_construct(|this| this.ready.set(true))
      .extend(|this| &this.base)
      .field("metrics", |this| &this.metrics);
  }
}

struct NeverReflected;
injectable!(NeverReflected);

fn field_names(fields: &[fibre_injector::FieldDescriptor]) -> Vec<&'static str> {
  fields.iter().map(|field| field.name()).collect()
}

// --- Reflector Tests ---

#[test]
fn test_reflection_is_computed_once() {
  let first = reflect::<CountedService>();
  let second = reflect::<CountedService>();

  let injector = Injector::new();
  injector.bind_instance(Database);
  for _ in 0..5 {
    injector.inject(&CountedService::default()).unwrap();
  }

  assert!(Arc::ptr_eq(&first, &second));
  assert!(Arc::ptr_eq(&first, &reflect::<CountedService>()));
  assert_eq!(DESCRIBE_CALLS.load(Ordering::SeqCst), 1);
  assert!(is_reflected::<CountedService>());
}

#[test]
fn test_reflection_is_stable() {
  let info = reflect::<DerivedService>();

  for _ in 0..3 {
    assert_eq!(
      field_names(reflect::<DerivedService>().fields()),
      field_names(info.fields())
    );
  }
  assert!(info.type_name().ends_with("DerivedService"));
}

#[test]
fn test_unreflected_type_is_not_cached() {
  assert!(!is_reflected::<NeverReflected>());
}

#[test]
fn test_marker_type_has_no_fields() {
  let info = reflect::<Database>();

  assert!(info.fields().is_empty());
  assert!(!info.has_post_construct());
}

#[test]
fn test_fields_include_ancestor_fields() {
  let info = reflect::<DerivedService>();

  assert_eq!(field_names(info.fields()), vec!["database", "cache"]);
  assert_eq!(info.fields()[0].key(), &InjectionKey::of::<Database>());
  assert_eq!(info.fields()[1].key(), &InjectionKey::of::<Cache>());
  assert!(info.has_post_construct());
}

#[test]
fn test_inject_fills_ancestor_fields() {
  let injector = Injector::new();
  injector.bind_instance(Database);
  injector.bind_instance(Cache);
  let derived = DerivedService::default();

  injector.inject(&derived).unwrap();

  assert!(derived.base.database.is_injected());
  assert!(derived.cache.is_injected());
}

#[test]
fn test_ancestor_hook_is_inherited() {
  let injector = Injector::new();
  injector.bind_instance(Database);
  injector.bind_instance(Cache);
  let derived = injector.bind_instance(DerivedService::default());

  injector.post_bindings().unwrap();

  assert!(derived.base.started.get());
}

#[test]
fn test_own_hook_overrides_ancestor_hook() {
  let injector = Injector::new();
  injector.bind_instance(Database);
  injector.bind_instance(Metrics);
  let service = injector.bind_instance(OverridingService::default());

  injector.post_bindings().unwrap();

  assert!(service.ready.get());
  assert!(!service.base.started.get());
  assert!(service.base.database.is_injected());
  assert_eq!(
    field_names(reflect::<OverridingService>().fields()),
    vec!["database", "metrics"]
  );
}

#[test]
fn test_reflection_from_many_threads() {
  #[derive(Default)]
  struct Shared {
    database: Inject<Database>,
  }
  injectable!(Shared { database });

  let infos: Vec<_> = std::thread::scope(|s| {
    let handles: Vec<_> = (0..8)
      .map(|_| s.spawn(reflect::<Shared>))
      .collect();
    handles
      .into_iter()
      .map(|handle| handle.join().unwrap())
      .collect()
  });

  for info in &infos {
    assert!(Arc::ptr_eq(info, &infos[0]));
    assert_eq!(field_names(info.fields()), vec!["database"]);
  }
}
