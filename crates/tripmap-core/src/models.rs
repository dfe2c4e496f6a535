pub mod geometry;
pub mod poi;
pub mod region;
pub mod zone;

pub use geometry::{LatLon, MapView};
pub use poi::Poi;
pub use region::Region;
pub use zone::Zone;
