pub mod product;
pub mod user;

pub use product::{NewProduct, Product, ProductChanges};
pub use user::{NewUser, User, UserChanges, UserProfile};
