//! Demo scenes shipped with the binary

mod brownian;
mod cars;

pub use brownian::BrownianScene;
pub use cars::CarsScene;
