//! Interactive hierarchy visualization core.
//!
//! Pipeline: hierarchy (collapse state) → layout (positions) → scene
//! (identity-joined transitions) → frames the UI layer paints, with the
//! viewport transform on top. `TreeView` is the public surface.

pub mod layout;
pub mod scene;
pub mod tween;
pub mod view;
pub mod viewport;

pub use view::TreeView;
