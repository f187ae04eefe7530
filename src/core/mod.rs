pub mod aggregate;
pub mod classify;
pub mod converter;
pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod rules;
pub mod validate;

pub use crate::domain::model::{BatchResult, DeliveryReceipt, OutputUser, RawUser};
pub use crate::domain::ports::{ConfigProvider, Delivery, Pipeline, Storage};
pub use crate::utils::error::Result;
