pub mod car;
pub mod driver;
pub mod manufacturer;
pub mod session;

pub use car::{Car, NewCar};
pub use driver::{Driver, NewDriver};
pub use manufacturer::{Manufacturer, NewManufacturer};
pub use session::Session;
