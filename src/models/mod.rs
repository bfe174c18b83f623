mod feature;
mod license;
mod subscription;

pub use feature::*;
pub use license::*;
pub use subscription::*;
