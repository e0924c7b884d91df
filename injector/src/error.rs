use crate::core::InjectionKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectorError {
  /// No binding for the key exists in the injector or any of its ancestors.
  #[error("could not get {0} from injector")]
  UnboundDependency(InjectionKey),
}

impl InjectorError {
  /// The key that failed to resolve.
  pub fn key(&self) -> &InjectionKey {
    match self {
      InjectorError::UnboundDependency(key) => key,
    }
  }
}

pub type Result<T, E = InjectorError> = std::result::Result<T, E>;
