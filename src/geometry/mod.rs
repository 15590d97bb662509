pub mod artboard;
pub mod transform;

pub use artboard::{
    artboard_rect, bounding_rect_in_artboard_space, clamp_group_to_artboard, clamp_to_artboard,
    containment_delta, origin_in_artboard_space, with_identity_viewport,
};
pub use transform::Matrix;
