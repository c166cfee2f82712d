//! In-memory reference environment
//!
//! Every object wraps its native data in an `Rc<RefCell<...>>`. Children are
//! owned by their parents; the way back up is a `Weak` pointer, so dropping
//! a font releases everything below it. UFO files are read and written
//! through norad (see [`ufo`]).

/// Declares a cloneable handle around shared native data.
macro_rules! native_handle {
    ($(#[$meta:meta])* $handle:ident => $data:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $handle(pub(crate) std::rc::Rc<std::cell::RefCell<$data>>);

        impl $handle {
            pub(crate) fn from_data(data: $data) -> Self {
                Self(std::rc::Rc::new(std::cell::RefCell::new(data)))
            }

            pub(crate) fn downgrade(&self) -> std::rc::Weak<std::cell::RefCell<$data>> {
                std::rc::Rc::downgrade(&self.0)
            }

            pub(crate) fn upgrade(weak: &std::rc::Weak<std::cell::RefCell<$data>>) -> Option<Self> {
                weak.upgrade().map(Self)
            }

            pub(crate) fn address(&self) -> usize {
                std::rc::Rc::as_ptr(&self.0) as *const () as usize
            }
        }

        impl std::fmt::Debug for $handle {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&crate::objects::BaseObject::repr(self))
            }
        }
    };
}

mod dicts;
mod font;
mod glyph;
mod layer;
mod outline;
pub mod ufo;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::objects::Environment;

pub use dicts::{MemoryFeatures, MemoryGroups, MemoryInfo, MemoryKerning, MemoryLib};
pub use font::MemoryFont;
pub use glyph::MemoryGlyph;
pub use layer::MemoryLayer;
pub use outline::{MemoryAnchor, MemoryComponent, MemoryContour, MemoryGuideline, MemoryPoint};

/// Name of the layer a new font starts with
pub const DEFAULT_LAYER_NAME: &str = "public.default";

const IDENTIFIER_LENGTH: usize = 10;

/// The in-memory environment
#[derive(Clone, Copy, Debug, Default)]
pub struct Memory;

impl Environment for Memory {
    type Font = MemoryFont;
    type Layer = MemoryLayer;
    type Glyph = MemoryGlyph;
    type Contour = MemoryContour;
    type Point = MemoryPoint;
    type Component = MemoryComponent;
    type Anchor = MemoryAnchor;
    type Guideline = MemoryGuideline;
    type Info = MemoryInfo;
    type Groups = MemoryGroups;
    type Kerning = MemoryKerning;
    type Features = MemoryFeatures;
    type Lib = MemoryLib;
}

/// A random alphanumeric identifier that is not in `taken`
pub(crate) fn make_identifier(taken: &HashSet<String>) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let identifier: String = (0..IDENTIFIER_LENGTH)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect();
        if !taken.contains(&identifier) {
            return identifier;
        }
    }
}

#[cfg(test)]
mod identifier_tests {
    use super::*;

    #[test]
    fn test_identifiers_are_fresh() {
        let mut taken = HashSet::new();
        for _ in 0..50 {
            let identifier = make_identifier(&taken);
            assert_eq!(identifier.len(), IDENTIFIER_LENGTH);
            assert!(identifier.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(taken.insert(identifier));
        }
    }
}
