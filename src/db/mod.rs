pub mod util;

mod store;
mod memory;
mod postgres;
mod article;
pub use self::{
  store::*,
  memory::*,
  postgres::*,
  article::*,
};

mod service;
pub use service::*;
