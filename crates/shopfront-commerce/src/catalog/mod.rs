//! Product catalog and variant selection.

mod product;
mod selection;
mod source;
mod view;

pub use product::{Product, ProductVariant};
pub use selection::{
    selection_key, Selection, SelectionPolicy, SelectionSnapshot, VariantSelector,
};
pub use source::{ProductSource, StaticProductSource};
pub use view::{SelectionSlot, SelectionView};

#[cfg(test)]
pub(crate) use product::fixtures;
