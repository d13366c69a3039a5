pub mod builders;
pub mod fields;
pub mod json;
pub mod operators;
pub mod predicate;
pub mod values;

pub use self::fields::*;
pub use self::operators::*;
pub use self::predicate::*;
pub use self::values::*;
