//! Resource records and their create/update input shapes.

pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use category::{Category, NewCategory};
pub use order::{order_total, NewOrder, Order, OrderPatch, TAX_MULTIPLIER};
pub use product::{
    CatalogProduct, CatalogProductView, NewCatalogProduct, NewProduct, Product, ProductFilter,
    ProductPatch,
};
pub use user::{NewUser, User, UserPatch};
