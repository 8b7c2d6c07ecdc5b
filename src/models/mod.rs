pub mod cargo;
pub mod offer;
pub mod route;
pub mod transport;

pub use cargo::{Cargo, CreateCargoRequest};
pub use offer::{CreateOfferRequest, Offer};
pub use route::{CountrySegment, CreateRouteRequest, EmptyDriving, Location, Route};
pub use transport::TransportType;
