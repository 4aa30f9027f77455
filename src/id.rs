//! Code for handling IDs
use anyhow::{Context, Result};
use indexmap::IndexSet;

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(
            Clone,
            std::hash::Hash,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            serde::Deserialize,
            Debug,
            serde::Serialize,
        )]
        /// An ID type (e.g. `ScenarioID`)
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }
        }
    };
}

define_id_type!(ScenarioID);

/// Check that every ID yielded by `iter` is unique, returning them as a set
pub fn check_ids_unique<'a, I>(iter: I) -> Result<IndexSet<ScenarioID>>
where
    I: IntoIterator<Item = &'a ScenarioID>,
{
    let mut ids = IndexSet::new();
    for id in iter {
        ids.insert(id.clone())
            .then_some(())
            .with_context(|| format!("Duplicate ID found: {id}"))?;
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;

    #[test]
    fn test_check_ids_unique() {
        let ids: Vec<ScenarioID> = vec!["flexible".into(), "rigid".into()];
        let set = check_ids_unique(&ids).unwrap();
        assert_eq!(set.len(), 2);

        let ids: Vec<ScenarioID> = vec!["flexible".into(), "flexible".into()];
        assert_error!(check_ids_unique(&ids), "Duplicate ID found: flexible");
    }
}
