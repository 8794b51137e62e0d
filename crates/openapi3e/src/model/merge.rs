//! Field-by-field merging of two partially filled model objects

use std::fmt::Debug;

/// Both sides set one field to different values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConflict {
    pub field: String,
    pub existing: String,
    pub incoming: String,
}

impl FieldConflict {
    fn new(field: &str, existing: &impl Debug, incoming: &impl Debug) -> Self {
        Self {
            field: field.to_string(),
            existing: format!("{existing:?}"),
            incoming: format!("{incoming:?}"),
        }
    }

    /// Prefix the field with its enclosing field, e.g. `schema.type`
    #[must_use]
    pub fn nested_in(mut self, parent: &str) -> Self {
        self.field = format!("{parent}.{}", self.field);
        self
    }
}

/// Merge one field. An unset side yields the other; equal values pass.
pub(crate) fn merge_field<T>(
    field: &str,
    existing: &T,
    incoming: &T,
    is_unset: impl Fn(&T) -> bool,
) -> Result<T, FieldConflict>
where
    T: Clone + PartialEq + Debug,
{
    if is_unset(incoming) || existing == incoming {
        Ok(existing.clone())
    } else if is_unset(existing) {
        Ok(incoming.clone())
    } else {
        Err(FieldConflict::new(field, existing, incoming))
    }
}

/// Like [`merge_field`], reporting a conflict by the values inside the options
pub(crate) fn merge_option<T>(
    field: &str,
    existing: &Option<T>,
    incoming: &Option<T>,
) -> Result<Option<T>, FieldConflict>
where
    T: Clone + PartialEq + Debug,
{
    match (existing, incoming) {
        (Some(a), Some(b)) if a != b => Err(FieldConflict::new(field, a, b)),
        (Some(_), _) => Ok(existing.clone()),
        (None, _) => Ok(incoming.clone()),
    }
}

pub(crate) fn merge_list<T>(
    field: &str,
    existing: &Vec<T>,
    incoming: &Vec<T>,
) -> Result<Vec<T>, FieldConflict>
where
    T: Clone + PartialEq + Debug,
{
    merge_field(field, existing, incoming, Vec::is_empty)
}
