mod errors;
mod store;

pub use errors::KeyStoreError;
pub use store::KeyStore;
