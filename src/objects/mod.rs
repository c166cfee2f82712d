//! The font object model
//!
//! Each object is described by two traits. The `*Backend` trait lists the
//! `raw_*` hooks an environment implements, some of them with fallbacks
//! composed from other calls. The `Base*` trait is implemented for every
//! backend and carries the fixed public behavior: normalization, parent
//! bookkeeping and lookups. Scripts only ever call `Base*` methods.
//!
//! An [`Environment`] ties the concrete object types of one backend
//! together, so that a glyph knows which contour type it hands out and a
//! contour knows which glyph type is its parent.

pub mod anchor;
pub mod base;
pub mod component;
pub mod contour;
pub mod dict;
pub mod features;
pub mod font;
pub mod font_lib;
pub mod glyph;
pub mod groups;
pub mod guideline;
pub mod info;
pub mod kerning;
pub mod layer;
pub mod math;
pub mod pen;
pub mod point;
pub mod segment;

pub use anchor::{AnchorBackend, BaseAnchor};
pub use base::{BaseObject, Transformation};
pub use component::{BaseComponent, ComponentBackend};
pub use contour::{BaseContour, ContourBackend};
pub use dict::{BaseDict, DictBackend, DictKind};
pub use features::{BaseFeatures, FeaturesBackend};
pub use font::{BaseFont, FontBackend};
pub use font_lib::{BaseLib, LibBackend, LibParent};
pub use glyph::{BaseGlyph, GlyphBackend};
pub use groups::{BaseGroups, GroupsBackend};
pub use guideline::{BaseGuideline, GuidelineBackend, GuidelineParent};
pub use info::{BaseInfo, InfoBackend};
pub use kerning::{BaseKerning, KerningBackend};
pub use layer::{BaseLayer, LayerBackend};
pub use math::MathGlyph;
pub use pen::{PointPen, RecordingPointPen};
pub use point::{BasePoint, PointBackend};
pub use segment::Segment;

/// The concrete object types of one backend
pub trait Environment: Sized + 'static {
    type Font: FontBackend<Env = Self>;
    type Layer: LayerBackend<Env = Self>;
    type Glyph: GlyphBackend<Env = Self>;
    type Contour: ContourBackend<Env = Self>;
    type Point: PointBackend<Env = Self>;
    type Component: ComponentBackend<Env = Self>;
    type Anchor: AnchorBackend<Env = Self>;
    type Guideline: GuidelineBackend<Env = Self>;
    type Info: InfoBackend<Env = Self>;
    type Groups: GroupsBackend<Env = Self>;
    type Kerning: KerningBackend<Env = Self>;
    type Features: FeaturesBackend<Env = Self>;
    type Lib: LibBackend<Env = Self>;
}

pub type FontOf<E> = <E as Environment>::Font;
pub type LayerOf<E> = <E as Environment>::Layer;
pub type GlyphOf<E> = <E as Environment>::Glyph;
pub type ContourOf<E> = <E as Environment>::Contour;
pub type PointOf<E> = <E as Environment>::Point;
pub type ComponentOf<E> = <E as Environment>::Component;
pub type AnchorOf<E> = <E as Environment>::Anchor;
pub type GuidelineOf<E> = <E as Environment>::Guideline;
pub type InfoOf<E> = <E as Environment>::Info;
pub type GroupsOf<E> = <E as Environment>::Groups;
pub type KerningOf<E> = <E as Environment>::Kerning;
pub type FeaturesOf<E> = <E as Environment>::Features;
pub type LibOf<E> = <E as Environment>::Lib;

/// Everything a script needs in scope to call the public API
pub mod prelude {
    pub use super::{
        BaseAnchor, BaseComponent, BaseContour, BaseDict, BaseFeatures, BaseFont, BaseGlyph,
        BaseGroups, BaseGuideline, BaseInfo, BaseKerning, BaseLayer, BaseLib, BaseObject,
        BasePoint, Environment, PointPen, Segment, Transformation,
    };
    pub use crate::geometry::{Color, PointType, SegmentType};
}
