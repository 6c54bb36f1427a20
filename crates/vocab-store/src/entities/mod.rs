//! Database entities

pub mod entry;

pub use entry::Entity as Entry;

pub mod prelude {
    pub use super::entry::Entity as Entry;
}
